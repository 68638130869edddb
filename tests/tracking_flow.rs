//! End-to-end tracking flows: hooks feeding the store, resolver reading it.

mod common;

use std::sync::Arc;

use common::{Page, TestHost, test_state};
use url_tracker::application::services::RedirectOutcome;
use url_tracker::infrastructure::persistence::InMemoryTrackerRepository;

fn setup() -> (TestHost, url_tracker::AppState) {
    let repository = Arc::new(InMemoryTrackerRepository::new());
    let host = TestHost::new(Arc::clone(&repository));
    let state = test_state(repository, false);
    (host, state)
}

#[tokio::test]
async fn test_new_object_produces_no_mapping() {
    let (mut host, state) = setup();

    host.save(Page::at(1, "/a/")).await;

    let outcome = state.resolver.resolve("/a/").await.unwrap();
    assert_eq!(outcome, RedirectOutcome::PassThrough);
}

#[tokio::test]
async fn test_unchanged_url_produces_no_mapping() {
    let (mut host, state) = setup();

    host.save(Page::at(1, "/a/")).await;
    host.save(Page::at(1, "/a/")).await;

    let outcome = state.resolver.resolve("/a/").await.unwrap();
    assert_eq!(outcome, RedirectOutcome::PassThrough);
}

#[tokio::test]
async fn test_url_change_redirects_old_to_new() {
    let (mut host, state) = setup();

    host.save(Page::at(1, "/a/")).await;
    host.save(Page::at(1, "/b/")).await;

    let outcome = state.resolver.resolve("/a/").await.unwrap();
    assert_eq!(outcome, RedirectOutcome::Redirect("/b/".to_string()));
}

#[tokio::test]
async fn test_chains_collapse_to_newest_url() {
    let (mut host, state) = setup();

    host.save(Page::at(1, "/a/")).await;
    host.save(Page::at(1, "/b/")).await;
    host.save(Page::at(1, "/c/")).await;

    // Both historical URLs resolve straight to the newest one, no hops.
    assert_eq!(
        state.resolver.resolve("/a/").await.unwrap(),
        RedirectOutcome::Redirect("/c/".to_string())
    );
    assert_eq!(
        state.resolver.resolve("/b/").await.unwrap(),
        RedirectOutcome::Redirect("/c/".to_string())
    );
}

#[tokio::test]
async fn test_chain_collapse_spans_objects() {
    let (mut host, state) = setup();

    // A second object inherits the URL the first one vacated.
    host.save(Page::at(1, "/a/")).await;
    host.save(Page::at(1, "/b/")).await;

    host.save(Page::at(2, "/x/")).await;
    host.save(Page::at(2, "/a/")).await;

    // "/a/" is live again: its old-URL record was purged, no redirect loop.
    assert_eq!(
        state.resolver.resolve("/a/").await.unwrap(),
        RedirectOutcome::PassThrough
    );
    assert_eq!(
        state.resolver.resolve("/x/").await.unwrap(),
        RedirectOutcome::Redirect("/a/".to_string())
    );
}

#[tokio::test]
async fn test_url_becoming_current_again_passes_through() {
    let (mut host, state) = setup();

    host.save(Page::at(1, "/a/")).await;
    host.save(Page::at(1, "/b/")).await;
    host.save(Page::at(1, "/a/")).await;

    assert_eq!(
        state.resolver.resolve("/a/").await.unwrap(),
        RedirectOutcome::PassThrough
    );
    assert_eq!(
        state.resolver.resolve("/b/").await.unwrap(),
        RedirectOutcome::Redirect("/a/".to_string())
    );
}

#[tokio::test]
async fn test_unresolvable_new_url_turns_prior_gone() {
    let (mut host, state) = setup();

    host.save(Page::at(1, "/a/")).await;
    host.save(Page::unrouted(1)).await;

    assert_eq!(
        state.resolver.resolve("/a/").await.unwrap(),
        RedirectOutcome::Gone
    );
}

#[tokio::test]
async fn test_deleted_object_turns_urls_gone() {
    let (mut host, state) = setup();

    host.save(Page::at(1, "/a/")).await;
    host.delete(1).await;

    assert_eq!(
        state.resolver.resolve("/a/").await.unwrap(),
        RedirectOutcome::Gone
    );
}

#[tokio::test]
async fn test_deleting_a_moved_object_turns_whole_chain_gone() {
    let (mut host, state) = setup();

    host.save(Page::at(1, "/a/")).await;
    host.save(Page::at(1, "/b/")).await;
    host.delete(1).await;

    assert_eq!(
        state.resolver.resolve("/a/").await.unwrap(),
        RedirectOutcome::Gone
    );
    assert_eq!(
        state.resolver.resolve("/b/").await.unwrap(),
        RedirectOutcome::Gone
    );
}

#[tokio::test]
async fn test_unknown_path_passes_through() {
    let (_host, state) = setup();

    assert_eq!(
        state.resolver.resolve("/never-seen/").await.unwrap(),
        RedirectOutcome::PassThrough
    );
}
