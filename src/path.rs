//! Path normalization and segment handling.
//!
//! Lookups by path ignore empty segments, so `"/filling"`, `"filling/"` and
//! `"//filling"` all name the same route. The helpers here are the single
//! place where that rule lives.

use crate::error::RouteError;
use std::borrow::Cow;

/// Path of the tree root. The only path allowed to contain a slash.
pub const ROOT_PATH: &str = "/";

/// Normalize a path: leading slash, no trailing slash, no empty segments.
///
/// Returns `Cow` so that already-normalized paths are not reallocated.
///
/// # Examples
///
/// ```
/// use shell_navigator::normalize_path;
///
/// assert_eq!(normalize_path("/filling"), "/filling");
/// assert_eq!(normalize_path("filling/"), "/filling");
/// assert_eq!(normalize_path("//a//b"), "/a/b");
/// assert_eq!(normalize_path(""), "/");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if path == ROOT_PATH {
        return Cow::Borrowed(path);
    }

    let clean = path.starts_with('/') && !path.ends_with('/') && !path.contains("//");
    if clean {
        return Cow::Borrowed(path);
    }

    let segments = split_path(path);
    if segments.is_empty() {
        Cow::Borrowed(ROOT_PATH)
    } else {
        Cow::Owned(format!("/{}", segments.join("/")))
    }
}

/// Split a path into its non-empty segments.
///
/// ```
/// use shell_navigator::split_path;
///
/// assert_eq!(split_path("/filling/x"), vec!["filling", "x"]);
/// assert!(split_path("/").is_empty());
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Split a location such as `"/filling?from=Govern"` into path and query.
///
/// The query part excludes the `?`; a missing query yields `""`.
pub fn split_location(location: &str) -> (&str, &str) {
    match location.split_once('?') {
        Some((path, query)) => (path, query),
        None => (location, ""),
    }
}

/// Join a parent's full path and a child segment.
pub(crate) fn join_path(parent: &str, segment: &str) -> String {
    if parent == ROOT_PATH {
        format!("/{segment}")
    } else {
        format!("{parent}/{segment}")
    }
}

/// Check that `path` is a usable segment for a non-root node.
pub(crate) fn validate_child_segment(path: &str) -> Result<(), RouteError> {
    let reason = if path.is_empty() {
        "child paths must not be empty"
    } else if path == ROOT_PATH {
        "'/' is only permitted at the tree root"
    } else if path.contains('/') {
        "child paths are a single segment without slashes"
    } else if path.contains('?') {
        "paths must not carry a query string"
    } else {
        return Ok(());
    };

    Err(RouteError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    })
}
