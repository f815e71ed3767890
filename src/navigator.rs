//! Shell-facing navigation.
//!
//! [`Navigator`] owns a frozen [`RouteTree`] and drives navigations for the
//! application shell:
//!
//! 1. resolve the request (`{ path }` or `{ name, params }`) to a route,
//! 2. follow redirects, at most [`MAX_REDIRECT_DEPTH`] hops,
//! 3. load the route's view through the tree's memo,
//! 4. apply the result only if no newer navigation started meanwhile.
//!
//! Step 4 gives last-navigation-wins ordering: a slow load that finishes
//! after a newer navigation returns [`NavigationOutcome::Superseded`] and
//! leaves the shell untouched.
//!
//! The shell reads what to render from [`ActiveRoute`]: the view plus the
//! route's [`ShellChrome`] (`title`, `hide_theme_toggle`, `hide_tabbar`).
//!
//! # Example
//!
//! ```
//! use shell_navigator::{
//!     Navigator, RedirectSpec, RedirectTarget, RouteMeta, RouteNode, RouteTree, ViewLoader,
//! };
//!
//! let tree = RouteTree::new(
//!     RouteNode::new("/", "root", ViewLoader::ready("layout"))
//!         .redirect(RedirectSpec::target(RedirectTarget::new("Filling").param("from", "Govern")))
//!         .child(
//!             RouteNode::new("filling", "Filling", ViewLoader::ready("filling"))
//!                 .meta(RouteMeta::titled("数据填报").hide_theme_toggle(true)),
//!         ),
//! )
//! .unwrap();
//!
//! let navigator = Navigator::new(tree).unwrap();
//! let outcome = pollster::block_on(navigator.push_path("/")).unwrap();
//! let active = outcome.active().unwrap();
//!
//! assert_eq!(active.name(), "Filling");
//! assert_eq!(active.location.href(), "/filling?from=Govern");
//! assert!(active.chrome.hide_theme_toggle);
//! ```

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, ResolutionCache};
use crate::error::RouteError;
use crate::meta::ShellChrome;
use crate::params::QueryParams;
#[cfg(feature = "cache")]
use crate::path::normalize_path;
use crate::path::split_location;
use crate::redirect::{RedirectContext, RedirectResolver};
use crate::tree::{RouteRecord, RouteTree};
use crate::{debug_log, error_log, info_log, trace_log};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Maximum redirect hops before a navigation is declared a loop.
pub const MAX_REDIRECT_DEPTH: usize = 5;

// ============================================================================
// Requests and results
// ============================================================================

/// What the shell asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationRequest {
    /// A URL path, optionally with a `?query`.
    Path { path: String },
    /// A route name plus query parameters.
    Named { name: String, params: QueryParams },
}

impl NavigationRequest {
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path { path: path.into() }
    }

    pub fn named(name: impl Into<String>, params: QueryParams) -> Self {
        Self::Named {
            name: name.into(),
            params,
        }
    }
}

impl fmt::Display for NavigationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path { path } => write!(f, "path '{}'", path),
            Self::Named { name, params } if params.is_empty() => write!(f, "route '{}'", name),
            Self::Named { name, params } => {
                write!(f, "route '{}' ?{}", name, params.to_query_string())
            }
        }
    }
}

/// A resolved place in the application: route name, full path and params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub path: String,
    pub params: QueryParams,
}

impl Location {
    /// Path plus encoded query string, e.g. `"/filling?from=Govern"`.
    pub fn href(&self) -> String {
        if self.params.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.params.to_query_string())
        }
    }
}

/// Everything the shell needs to render the current route.
pub struct ActiveRoute<V> {
    pub location: Location,
    pub chrome: ShellChrome,
    pub view: Arc<V>,
}

impl<V> ActiveRoute<V> {
    pub fn name(&self) -> &str {
        &self.location.name
    }

    pub fn title(&self) -> &str {
        &self.chrome.title
    }

    pub fn params(&self) -> &QueryParams {
        &self.location.params
    }
}

impl<V> Clone for ActiveRoute<V> {
    fn clone(&self) -> Self {
        Self {
            location: self.location.clone(),
            chrome: self.chrome.clone(),
            view: Arc::clone(&self.view),
        }
    }
}

impl<V> fmt::Debug for ActiveRoute<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveRoute")
            .field("location", &self.location)
            .field("chrome", &self.chrome)
            .finish_non_exhaustive()
    }
}

/// Result of a navigation that did not fail.
pub enum NavigationOutcome<V> {
    /// The route became active.
    Applied(ActiveRoute<V>),
    /// A newer navigation started before this one finished; nothing changed.
    Superseded { name: String },
}

impl<V> NavigationOutcome<V> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }

    pub fn active(&self) -> Option<&ActiveRoute<V>> {
        match self {
            Self::Applied(active) => Some(active),
            Self::Superseded { .. } => None,
        }
    }
}

impl<V> fmt::Debug for NavigationOutcome<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied(active) => f.debug_tuple("Applied").field(active).finish(),
            Self::Superseded { name } => f.debug_struct("Superseded").field("name", name).finish(),
        }
    }
}

// ============================================================================
// History
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavigateOp {
    Push,
    Replace,
    Back,
    Forward,
}

/// Visited locations with a cursor. Empty until the first navigation lands.
#[derive(Debug, Default)]
struct History {
    entries: Vec<Location>,
    current: usize,
}

impl History {
    fn push(&mut self, location: Location) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.current + 1);
        }
        self.entries.push(location);
        self.current = self.entries.len() - 1;
    }

    fn replace(&mut self, location: Location) {
        match self.entries.get_mut(self.current) {
            Some(entry) => *entry = location,
            None => self.push(location),
        }
    }

    fn peek_back(&self) -> Option<&Location> {
        self.current.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    fn peek_forward(&self) -> Option<&Location> {
        self.entries.get(self.current + 1)
    }

    fn back(&mut self, location: Location) {
        if self.peek_back().is_some() {
            self.current -= 1;
        }
        self.replace(location);
    }

    fn forward(&mut self, location: Location) {
        if self.peek_forward().is_some() {
            self.current += 1;
        }
        self.replace(location);
    }
}

struct ShellState<V> {
    active: Option<ActiveRoute<V>>,
    history: History,
}

// ============================================================================
// Navigator
// ============================================================================

/// Navigation driver over a frozen route tree.
pub struct Navigator<V> {
    tree: Arc<RouteTree<V>>,
    state: Mutex<ShellState<V>>,
    /// Bumped by every navigation; a navigation only applies if it still
    /// holds the latest id once its view is loaded.
    navigation_id: AtomicUsize,
    #[cfg(feature = "cache")]
    path_cache: Mutex<ResolutionCache>,
}

impl<V: Send + Sync + 'static> Navigator<V> {
    /// Freeze `tree` and validate its static redirects.
    ///
    /// A redirect pointing at an unregistered route fails here, at startup,
    /// rather than on the first visit.
    pub fn new(tree: RouteTree<V>) -> Result<Self, RouteError> {
        tree.validate_redirects()?;
        info_log!("Navigator ready with {} routes", tree.len());

        Ok(Self {
            tree: Arc::new(tree),
            state: Mutex::new(ShellState {
                active: None,
                history: History::default(),
            }),
            navigation_id: AtomicUsize::new(0),
            #[cfg(feature = "cache")]
            path_cache: Mutex::new(ResolutionCache::new()),
        })
    }

    /// Resize the path cache. Existing entries are dropped.
    #[cfg(feature = "cache")]
    pub fn with_cache_capacity(self, capacity: usize) -> Self {
        Self {
            path_cache: Mutex::new(ResolutionCache::with_capacity(capacity)),
            ..self
        }
    }

    pub fn tree(&self) -> &RouteTree<V> {
        &self.tree
    }

    /// Shared handle to the frozen tree.
    pub fn tree_handle(&self) -> Arc<RouteTree<V>> {
        Arc::clone(&self.tree)
    }

    // ========================================================================
    // Navigation ids
    // ========================================================================

    pub fn navigation_id(&self) -> usize {
        self.navigation_id.load(Ordering::SeqCst)
    }

    fn start_navigation(&self) -> usize {
        self.navigation_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_navigation_current(&self, nav_id: usize) -> bool {
        self.navigation_id() == nav_id
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigate and record the destination as a new history entry.
    pub async fn navigate(&self, request: NavigationRequest) -> Result<NavigationOutcome<V>, RouteError> {
        self.navigate_with(request, NavigateOp::Push).await
    }

    pub async fn push_path(&self, path: &str) -> Result<NavigationOutcome<V>, RouteError> {
        self.navigate(NavigationRequest::path(path)).await
    }

    pub async fn push_named(
        &self,
        name: &str,
        params: QueryParams,
    ) -> Result<NavigationOutcome<V>, RouteError> {
        self.navigate(NavigationRequest::named(name, params)).await
    }

    /// Navigate and overwrite the current history entry.
    pub async fn replace(&self, request: NavigationRequest) -> Result<NavigationOutcome<V>, RouteError> {
        self.navigate_with(request, NavigateOp::Replace).await
    }

    /// Re-navigate to the previous history entry, `None` if there is none.
    pub async fn back(&self) -> Option<Result<NavigationOutcome<V>, RouteError>> {
        let target = self.lock_state().history.peek_back().cloned()?;
        Some(self.navigate_with(named_request(target), NavigateOp::Back).await)
    }

    /// Re-navigate to the next history entry, `None` if there is none.
    pub async fn forward(&self) -> Option<Result<NavigationOutcome<V>, RouteError>> {
        let target = self.lock_state().history.peek_forward().cloned()?;
        Some(self.navigate_with(named_request(target), NavigateOp::Forward).await)
    }

    async fn navigate_with(
        &self,
        request: NavigationRequest,
        op: NavigateOp,
    ) -> Result<NavigationOutcome<V>, RouteError> {
        let nav_id = self.start_navigation();
        info_log!("Navigation {:?} #{}: {}", op, nav_id, request);

        let (mut record, mut params) = self.resolve_request(&request)?;

        let mut depth = 0;
        while let Some(spec) = record.redirect() {
            if depth >= MAX_REDIRECT_DEPTH {
                error_log!(
                    "Redirect loop detected (depth {}) at route '{}'",
                    depth,
                    record.name()
                );
                return Err(RouteError::RedirectLoop {
                    name: record.name().to_string(),
                    depth,
                });
            }

            let context = RedirectContext::new()
                .with_query(params)
                .with_from(self.current_name());
            let target = RedirectResolver::resolve(&self.tree, spec, &context)?;
            debug_log!("Redirecting '{}' -> '{}'", record.name(), target.name);

            record = self.tree.resolve_by_name(&target.name)?;
            params = target.params;
            depth += 1;
        }

        let loaded = self.tree.load_record_view(record).await;

        let mut state = self.lock_state();
        if !self.is_navigation_current(nav_id) {
            debug_log!(
                "Navigation #{} to '{}' superseded by #{}",
                nav_id,
                record.name(),
                self.navigation_id()
            );
            return Ok(NavigationOutcome::Superseded {
                name: record.name().to_string(),
            });
        }

        let view = loaded?;
        let location = Location {
            name: record.name().to_string(),
            path: record.full_path().to_string(),
            params,
        };

        match op {
            NavigateOp::Push => state.history.push(location.clone()),
            NavigateOp::Replace => state.history.replace(location.clone()),
            NavigateOp::Back => state.history.back(location.clone()),
            NavigateOp::Forward => state.history.forward(location.clone()),
        }

        let active = ActiveRoute {
            location,
            chrome: record.chrome(),
            view,
        };
        state.active = Some(active.clone());

        info_log!("Navigation #{} complete: '{}'", nav_id, active.location.href());
        Ok(NavigationOutcome::Applied(active))
    }

    fn resolve_request(
        &self,
        request: &NavigationRequest,
    ) -> Result<(&RouteRecord<V>, QueryParams), RouteError> {
        match request {
            NavigationRequest::Path { path } => {
                let (path, query) = split_location(path);
                let record = self.resolve_path(path)?;
                Ok((record, QueryParams::from_query_string(query)))
            }
            NavigationRequest::Named { name, params } => {
                Ok((self.tree.resolve_by_name(name)?, params.clone()))
            }
        }
    }

    #[cfg(feature = "cache")]
    fn resolve_path(&self, path: &str) -> Result<&RouteRecord<V>, RouteError> {
        let normalized = normalize_path(path);

        let cached = self.lock_cache().get(&normalized);
        if let Some(record) = cached.and_then(|id| self.tree.get(id)) {
            return Ok(record);
        }

        let record = self.tree.resolve_path(&normalized)?;
        self.lock_cache().insert(normalized.into_owned(), record.id());
        Ok(record)
    }

    #[cfg(not(feature = "cache"))]
    fn resolve_path(&self, path: &str) -> Result<&RouteRecord<V>, RouteError> {
        self.tree.resolve_path(path)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The route the shell should currently render.
    pub fn active(&self) -> Option<ActiveRoute<V>> {
        self.lock_state().active.clone()
    }

    /// Chrome settings of the active route.
    pub fn chrome(&self) -> Option<ShellChrome> {
        self.lock_state()
            .active
            .as_ref()
            .map(|active| active.chrome.clone())
    }

    pub fn current_name(&self) -> Option<String> {
        self.lock_state()
            .active
            .as_ref()
            .map(|active| active.location.name.clone())
    }

    /// Build the URL of a named route with `params` as its query string.
    pub fn url_for(&self, name: &str, params: &QueryParams) -> Result<String, RouteError> {
        let record = self.tree.resolve_by_name(name)?;
        let location = Location {
            name: name.to_string(),
            path: record.full_path().to_string(),
            params: params.clone(),
        };
        trace_log!("url_for('{}') = '{}'", name, location.href());
        Ok(location.href())
    }

    /// Snapshot of the history entries, oldest first.
    pub fn history(&self) -> Vec<Location> {
        self.lock_state().history.entries.clone()
    }

    pub fn can_go_back(&self) -> bool {
        self.lock_state().history.peek_back().is_some()
    }

    pub fn can_go_forward(&self) -> bool {
        self.lock_state().history.peek_forward().is_some()
    }

    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats().clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, ShellState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(feature = "cache")]
    fn lock_cache(&self) -> MutexGuard<'_, ResolutionCache> {
        self.path_cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> fmt::Debug for Navigator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("tree", &self.tree)
            .field("navigation_id", &self.navigation_id)
            .finish_non_exhaustive()
    }
}

fn named_request(location: Location) -> NavigationRequest {
    NavigationRequest::Named {
        name: location.name,
        params: location.params,
    }
}
