//! Tracked-method entity grouping the URL history of one accessor.

use chrono::{DateTime, Utc};

use crate::domain::tracked::UrlTracked;

/// Identifies one URL accessor on one content object:
/// `(content_type, object_id, method_name)`.
///
/// Content objects are referenced by identifier only; the store never owns
/// them and nothing cascades from the host's persistence into this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    pub content_type: String,
    pub object_id: String,
    pub method_name: String,
}

impl MethodKey {
    pub fn new(
        content_type: impl Into<String>,
        object_id: impl Into<String>,
        method_name: impl Into<String>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            object_id: object_id.into(),
            method_name: method_name.into(),
        }
    }

    /// Builds the key for one accessor of a tracked object.
    pub fn of<T: UrlTracked>(object: &T, method_name: &str) -> Self {
        Self::new(T::content_type(), object.object_id(), method_name)
    }
}

impl std::fmt::Display for MethodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}).{}",
            self.content_type, self.object_id, self.method_name
        )
    }
}

/// Per-accessor URL record: the latest resolved URL plus the set of old URLs
/// that used to resolve to it (held in the join table, not inlined here).
///
/// `current_url = None` (or empty) means the resource is gone and every
/// associated old URL answers 410. A record whose old-URL set is empty
/// carries no information and is dropped by repository maintenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedMethod {
    pub id: i64,
    pub key: MethodKey,
    pub current_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TrackedMethod {
    pub fn new(
        id: i64,
        key: MethodKey,
        current_url: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            key,
            current_url,
            created_at,
        }
    }

    /// Returns true when the record marks its old URLs as permanently gone.
    pub fn is_gone(&self) -> bool {
        self.current_url.as_deref().is_none_or(str::is_empty)
    }
}
