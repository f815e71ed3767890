//! Error types for route registration, lookup, redirects and view loading.
//!
//! Every fallible operation in the crate returns [`RouteError`]. The variants
//! fall into three groups:
//!
//! - **Construction** ([`DuplicateName`](RouteError::DuplicateName),
//!   [`DuplicatePath`](RouteError::DuplicatePath),
//!   [`InvalidPath`](RouteError::InvalidPath),
//!   [`MissingTitle`](RouteError::MissingTitle),
//!   [`MissingName`](RouteError::MissingName)): the route table is
//!   malformed and startup should abort.
//! - **Lookup** ([`NotFound`](RouteError::NotFound)): the caller may recover,
//!   for example by showing a fallback view.
//! - **Navigation** ([`UnknownTarget`](RouteError::UnknownTarget),
//!   [`RedirectLoop`](RouteError::RedirectLoop),
//!   [`ViewLoad`](RouteError::ViewLoad)): returned to whoever asked for the
//!   navigation. An unknown redirect target is a configuration defect and is
//!   never turned into a silent fallback.
//!
//! # Examples
//!
//! ```
//! use shell_navigator::RouteError;
//!
//! let err = RouteError::UnknownTarget { name: "Nonexistent".into() };
//! assert!(err.is_configuration_defect());
//! assert_eq!(err.to_string(), "Redirect target not registered: Nonexistent");
//! ```

use std::fmt;

/// Failure reported by a [`ViewLoader`](crate::ViewLoader).
///
/// The registry treats loaded views as opaque, so a loader only gets to say
/// *why* it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLoadError {
    message: String,
}

impl ViewLoadError {
    /// Create a load error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message supplied by the loader.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ViewLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ViewLoadError {}

/// Errors produced by the route tree, the redirect resolver and the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Another node anywhere in the tree already uses this name.
    DuplicateName { name: String },

    /// A sibling under the same parent already occupies this path segment.
    DuplicatePath { parent: String, path: String },

    /// The path segment is not acceptable at this position.
    InvalidPath { path: String, reason: String },

    /// A non-root node was registered without a `title`.
    MissingTitle { name: String },

    /// A node was registered with an empty name.
    MissingName { path: String },

    /// No node matches the requested name or path.
    NotFound { target: String },

    /// A redirect resolved to a name that is not registered.
    UnknownTarget { name: String },

    /// Redirects kept chaining past the allowed depth.
    RedirectLoop { name: String, depth: usize },

    /// The deferred view for a route failed to load.
    ViewLoad { name: String, source: ViewLoadError },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::DuplicateName { name } => {
                write!(f, "Route name already registered: {}", name)
            }
            RouteError::DuplicatePath { parent, path } => {
                write!(f, "Path '{}' already used under route '{}'", path, parent)
            }
            RouteError::InvalidPath { path, reason } => {
                write!(f, "Invalid route path '{}': {}", path, reason)
            }
            RouteError::MissingTitle { name } => {
                write!(f, "Route '{}' has no title", name)
            }
            RouteError::MissingName { path } => {
                write!(f, "Route at path '{}' has no name", path)
            }
            RouteError::NotFound { target } => {
                write!(f, "Route not found: {}", target)
            }
            RouteError::UnknownTarget { name } => {
                write!(f, "Redirect target not registered: {}", name)
            }
            RouteError::RedirectLoop { name, depth } => {
                write!(
                    f,
                    "Redirect loop detected (depth {}) at route '{}'",
                    depth, name
                )
            }
            RouteError::ViewLoad { name, source } => {
                write!(f, "Failed to load view for route '{}': {}", name, source)
            }
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteError::ViewLoad { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl RouteError {
    /// `true` for errors raised while building the route table.
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            RouteError::DuplicateName { .. }
                | RouteError::DuplicatePath { .. }
                | RouteError::InvalidPath { .. }
                | RouteError::MissingTitle { .. }
                | RouteError::MissingName { .. }
        )
    }

    /// `true` for plain lookup misses the caller can recover from.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RouteError::NotFound { .. })
    }

    /// `true` when the error points at a broken route configuration rather
    /// than at something a user could reach by typing a URL.
    pub fn is_configuration_defect(&self) -> bool {
        self.is_construction()
            || matches!(
                self,
                RouteError::UnknownTarget { .. } | RouteError::RedirectLoop { .. }
            )
    }
}
