//! Application services: change tracking and redirect resolution.

mod change_tracker;
mod redirect_resolver;

pub use change_tracker::{PriorUrls, UrlChangeTracker};
pub use redirect_resolver::{RedirectOutcome, RedirectResolver};
