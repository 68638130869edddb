//! Old-URL lookup for not-found requests.

use std::sync::Arc;

use tracing::warn;

use crate::domain::repositories::TrackerRepository;
use crate::error::AppError;
use crate::utils::append_slash::{insert_trailing_slash, path_has_trailing_slash};

/// Outcome of resolving a not-found request path against the old-URL store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// The path was never an old URL; the surrounding not-found response
    /// stands unchanged.
    PassThrough,
    /// The path relocated; answer with `301 Moved Permanently`. The permanent
    /// status is load-bearing for SEO and must never degrade to a temporary
    /// redirect.
    Redirect(String),
    /// The resource behind the path was intentionally removed; answer 410.
    Gone,
}

/// Resolves request paths that fell through the routing table to a redirect
/// decision. Lookups hit a unique index on the old-URL column, keeping the
/// added latency on 404 traffic to a single indexed query (two with the
/// append-slash retry).
pub struct RedirectResolver {
    repository: Arc<dyn TrackerRepository>,
    append_slash: bool,
}

impl RedirectResolver {
    /// Creates a resolver. `append_slash` mirrors the host framework's
    /// trailing-slash convention: on a lookup miss for a path without a
    /// trailing slash, the lookup is retried with one appended.
    pub fn new(repository: Arc<dyn TrackerRepository>, append_slash: bool) -> Self {
        Self {
            repository,
            append_slash,
        }
    }

    /// Resolves a full request path (including any query string).
    ///
    /// Absence is a normal outcome ([`RedirectOutcome::PassThrough`]), never
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the store is unreachable.
    pub async fn resolve(&self, full_path: &str) -> Result<RedirectOutcome, AppError> {
        let mut targets = self.repository.resolve_targets(full_path).await?;

        if targets.is_none() && self.append_slash && !path_has_trailing_slash(full_path) {
            let slashed = insert_trailing_slash(full_path);
            targets = self.repository.resolve_targets(&slashed).await?;
        }

        let Some(targets) = targets else {
            return Ok(RedirectOutcome::PassThrough);
        };

        // Targets arrive sorted and de-duplicated; taking the first makes the
        // multi-target tie-break deterministic (lexicographically smallest).
        match targets.split_first() {
            None => Ok(RedirectOutcome::Gone),
            Some((target, rest)) => {
                if !rest.is_empty() {
                    warn!(
                        old_url = %full_path,
                        chosen = %target,
                        candidates = targets.len(),
                        "old URL has multiple live targets; picked the smallest"
                    );
                }
                Ok(RedirectOutcome::Redirect(target.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockTrackerRepository;

    fn resolver(repo: MockTrackerRepository, append_slash: bool) -> RedirectResolver {
        RedirectResolver::new(Arc::new(repo), append_slash)
    }

    #[tokio::test]
    async fn test_unknown_path_passes_through() {
        let mut repo = MockTrackerRepository::new();
        repo.expect_resolve_targets()
            .times(1)
            .returning(|_| Ok(None));

        let outcome = resolver(repo, false).resolve("/nowhere/").await.unwrap();
        assert_eq!(outcome, RedirectOutcome::PassThrough);
    }

    #[tokio::test]
    async fn test_known_path_redirects() {
        let mut repo = MockTrackerRepository::new();
        repo.expect_resolve_targets()
            .withf(|url| url == "/initial")
            .times(1)
            .returning(|_| Ok(Some(vec!["/new_target".to_string()])));

        let outcome = resolver(repo, false).resolve("/initial").await.unwrap();
        assert_eq!(
            outcome,
            RedirectOutcome::Redirect("/new_target".to_string())
        );
    }

    #[tokio::test]
    async fn test_no_live_target_is_gone() {
        let mut repo = MockTrackerRepository::new();
        repo.expect_resolve_targets()
            .times(1)
            .returning(|_| Ok(Some(vec![])));

        let outcome = resolver(repo, false).resolve("/initial").await.unwrap();
        assert_eq!(outcome, RedirectOutcome::Gone);
    }

    #[tokio::test]
    async fn test_append_slash_retry() {
        let mut repo = MockTrackerRepository::new();
        repo.expect_resolve_targets()
            .withf(|url| url == "/initial?foo")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_resolve_targets()
            .withf(|url| url == "/initial/?foo")
            .times(1)
            .returning(|_| Ok(Some(vec!["/new_target/".to_string()])));

        let outcome = resolver(repo, true).resolve("/initial?foo").await.unwrap();
        assert_eq!(
            outcome,
            RedirectOutcome::Redirect("/new_target/".to_string())
        );
    }

    #[tokio::test]
    async fn test_no_retry_when_append_slash_disabled() {
        let mut repo = MockTrackerRepository::new();
        repo.expect_resolve_targets()
            .withf(|url| url == "/initial")
            .times(1)
            .returning(|_| Ok(None));

        let outcome = resolver(repo, false).resolve("/initial").await.unwrap();
        assert_eq!(outcome, RedirectOutcome::PassThrough);
    }

    #[tokio::test]
    async fn test_no_retry_when_path_already_slashed() {
        let mut repo = MockTrackerRepository::new();
        repo.expect_resolve_targets()
            .withf(|url| url == "/initial/")
            .times(1)
            .returning(|_| Ok(None));

        let outcome = resolver(repo, true).resolve("/initial/").await.unwrap();
        assert_eq!(outcome, RedirectOutcome::PassThrough);
    }

    #[tokio::test]
    async fn test_multiple_targets_picks_smallest() {
        let mut repo = MockTrackerRepository::new();
        repo.expect_resolve_targets().times(1).returning(|_| {
            Ok(Some(vec![
                "/alpha/".to_string(),
                "/beta/".to_string(),
            ]))
        });

        let outcome = resolver(repo, false).resolve("/initial/").await.unwrap();
        assert_eq!(outcome, RedirectOutcome::Redirect("/alpha/".to_string()));
    }
}
