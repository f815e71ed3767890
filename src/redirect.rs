//! Redirect resolution.
//!
//! A route may carry a [`RedirectSpec`] that forwards any navigation landing
//! on it. The spec is either a fixed [`RedirectTarget`] or a closure that
//! computes one from a [`RedirectContext`] each time the route is visited.
//! Computed targets are never cached because they may depend on the time or
//! on the incoming query.
//!
//! Whatever the spec produces is checked against the tree. A target that is
//! not registered is an [`UnknownTarget`](crate::RouteError::UnknownTarget)
//! error; the resolver never falls back to another route.
//!
//! # Example
//!
//! ```
//! use shell_navigator::{
//!     QueryParams, RedirectContext, RedirectResolver, RedirectSpec, RedirectTarget,
//!     RouteMeta, RouteNode, RouteTree, ViewLoader,
//! };
//!
//! let tree = RouteTree::new(
//!     RouteNode::new("/", "root", ViewLoader::ready(()))
//!         .child(RouteNode::new("demo", "Demo", ViewLoader::ready(())).meta(RouteMeta::titled("技术栈"))),
//! )
//! .unwrap();
//!
//! let spec = RedirectSpec::to("Demo");
//! let target = RedirectResolver::resolve(&tree, &spec, &RedirectContext::new()).unwrap();
//! assert_eq!(target, RedirectTarget::new("Demo"));
//!
//! let missing = RedirectSpec::to("Nonexistent");
//! assert!(RedirectResolver::resolve(&tree, &missing, &RedirectContext::new()).is_err());
//! ```

use crate::error::RouteError;
use crate::params::QueryParams;
use crate::tree::RouteTree;
use crate::{debug_log, error_log};
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Where a redirect sends the navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    /// Name of the destination route.
    pub name: String,
    /// Query parameters carried to the destination.
    pub params: QueryParams,
}

impl RedirectTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: QueryParams::new(),
        }
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Add a single query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key, value);
        self
    }
}

/// Input available to a computed redirect.
#[derive(Debug, Clone)]
pub struct RedirectContext {
    /// When the redirect is being resolved.
    pub now: SystemTime,
    /// Query parameters of the navigation that hit the redirect.
    pub query: QueryParams,
    /// Name of the route the user is leaving, if any.
    pub from: Option<String>,
}

impl RedirectContext {
    /// Context stamped with the current time and no query.
    pub fn new() -> Self {
        Self {
            now: SystemTime::now(),
            query: QueryParams::new(),
            from: None,
        }
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_from(mut self, from: Option<String>) -> Self {
        self.from = from;
        self
    }

    /// Pin the clock, mostly useful in tests.
    pub fn at(mut self, now: SystemTime) -> Self {
        self.now = now;
        self
    }

    /// Milliseconds since the Unix epoch, `0` for clocks set before it.
    pub fn timestamp_millis(&self) -> u128 {
        self.now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default()
    }
}

impl Default for RedirectContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Closure computing a redirect target at navigation time.
pub type RedirectFn = Arc<dyn Fn(&RedirectContext) -> RedirectTarget + Send + Sync>;

/// Redirect rule attached to a route.
#[derive(Clone)]
pub enum RedirectSpec {
    /// Always the same destination.
    Static(RedirectTarget),
    /// Destination computed on every visit.
    Deferred(RedirectFn),
}

impl RedirectSpec {
    /// Static redirect without parameters.
    pub fn to(name: impl Into<String>) -> Self {
        Self::Static(RedirectTarget::new(name))
    }

    pub fn target(target: RedirectTarget) -> Self {
        Self::Static(target)
    }

    /// Redirect computed by `f` each time it is resolved.
    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn(&RedirectContext) -> RedirectTarget + Send + Sync + 'static,
    {
        Self::Deferred(Arc::new(f))
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }

    /// The fixed target, `None` for computed redirects.
    pub fn static_target(&self) -> Option<&RedirectTarget> {
        match self {
            Self::Static(target) => Some(target),
            Self::Deferred(_) => None,
        }
    }
}

impl fmt::Debug for RedirectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(target) => f.debug_tuple("Static").field(target).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Turns a [`RedirectSpec`] into a validated [`RedirectTarget`].
pub struct RedirectResolver;

impl RedirectResolver {
    /// Resolve `spec` against `tree`.
    ///
    /// Static specs are returned as declared; computed specs are invoked
    /// exactly once with `context`. Either way the target must name a
    /// registered route.
    pub fn resolve<V>(
        tree: &RouteTree<V>,
        spec: &RedirectSpec,
        context: &RedirectContext,
    ) -> Result<RedirectTarget, RouteError> {
        let target = match spec {
            RedirectSpec::Static(target) => target.clone(),
            RedirectSpec::Deferred(compute) => compute(context),
        };

        Self::validate(tree, &target)?;
        debug_log!(
            "Redirect resolved to '{}' with {} param(s)",
            target.name,
            target.params.len()
        );
        Ok(target)
    }

    /// Check that `target` names a registered route.
    pub fn validate<V>(tree: &RouteTree<V>, target: &RedirectTarget) -> Result<(), RouteError> {
        if tree.contains(&target.name) {
            Ok(())
        } else {
            error_log!("Redirect target '{}' is not a registered route", target.name);
            Err(RouteError::UnknownTarget {
                name: target.name.clone(),
            })
        }
    }
}
