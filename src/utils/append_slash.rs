//! Trailing-slash handling for old-URL lookups.
//!
//! Old URLs are stored as full request paths including the query string, so
//! the retry slash has to land on the path component, never after the query.

/// Returns true when the path component of `full_path` ends with `/`.
pub fn path_has_trailing_slash(full_path: &str) -> bool {
    let path = full_path.split('?').next().unwrap_or(full_path);
    path.ends_with('/')
}

/// Inserts a trailing slash into the path component, preserving the query
/// string: `/a?x=1` becomes `/a/?x=1`.
pub fn insert_trailing_slash(full_path: &str) -> String {
    match full_path.find('?') {
        Some(idx) => format!("{}/{}", &full_path[..idx], &full_path[idx..]),
        None => format!("{full_path}/"),
    }
}
