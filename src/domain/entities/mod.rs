//! Domain entities for the old-URL store.
//!
//! Old URLs themselves travel as plain path strings; their identity lives in
//! the store's unique `old_urls` table, not in a separate entity type.

mod tracked_method;

pub use tracked_method::{MethodKey, TrackedMethod};
