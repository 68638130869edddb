//! Capability contract for content types whose URLs are tracked.
//!
//! Tracked types declare an ordered list of named URL accessors as plain
//! function pointers. No reflection or string-based dispatch is involved:
//! an accessor that exists in the list is guaranteed to be callable, so the
//! only per-call failure mode is [`UnresolvableUrl`].

use crate::error::UnresolvableUrl;

/// One named URL accessor on a tracked type.
///
/// `resolve` returns the object's URL for this accessor, or
/// [`UnresolvableUrl`] when the URL cannot currently be produced (missing
/// routing parameters, unpublished content, and so on). Unresolvable is a
/// normal state, not an error condition.
pub struct UrlMethod<T: ?Sized> {
    pub name: &'static str,
    pub resolve: fn(&T) -> Result<String, UnresolvableUrl>,
}

impl<T: ?Sized> Clone for UrlMethod<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            resolve: self.resolve,
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for UrlMethod<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlMethod").field("name", &self.name).finish()
    }
}

/// Contract implemented by content types that want their URL history tracked.
///
/// The conventional single-accessor setup names its method `absolute_url`:
///
/// ```
/// use url_tracker::domain::tracked::{UrlMethod, UrlTracked};
/// use url_tracker::error::UnresolvableUrl;
///
/// struct Project {
///     id: i64,
///     slug: Option<String>,
/// }
///
/// impl UrlTracked for Project {
///     fn content_type() -> &'static str {
///         "project"
///     }
///
///     fn object_id(&self) -> String {
///         self.id.to_string()
///     }
///
///     fn url_methods() -> Vec<UrlMethod<Self>> {
///         vec![UrlMethod {
///             name: "absolute_url",
///             resolve: |p| match &p.slug {
///                 Some(slug) => Ok(format!("/projects/{slug}/")),
///                 None => Err(UnresolvableUrl),
///             },
///         }]
///     }
/// }
/// ```
pub trait UrlTracked: Send + Sync {
    /// Stable name identifying this content type in the store.
    fn content_type() -> &'static str
    where
        Self: Sized;

    /// Primary identifier of this object within its content type.
    fn object_id(&self) -> String;

    /// Ordered list of URL accessors. Must be non-empty with unique names;
    /// validated by the registrar, not here.
    fn url_methods() -> Vec<UrlMethod<Self>>
    where
        Self: Sized;
}
