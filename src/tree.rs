//! The route registry.
//!
//! Routes are declared as [`RouteNode`]s and registered into a
//! [`RouteTree`], which stores them as [`RouteRecord`]s in an arena indexed
//! by [`RouteId`]. Registration validates incrementally:
//!
//! - names are unique across the whole tree,
//! - sibling paths are unique under the same parent,
//! - child paths are single segments, and only the root may be `"/"`,
//! - every non-root route has a title.
//!
//! A failed registration leaves the tree exactly as it was.
//!
//! Once handed to a [`Navigator`](crate::Navigator) the tree is frozen; only
//! the view memo changes after that.
//!
//! # Example
//!
//! ```
//! use shell_navigator::{lazy_view, RouteMeta, RouteNode, RouteTree, ViewLoadError};
//!
//! fn page(name: &'static str) -> shell_navigator::ViewLoader<&'static str> {
//!     lazy_view(move || async move { Ok::<_, ViewLoadError>(name) })
//! }
//!
//! let tree = RouteTree::new(
//!     RouteNode::new("/", "root", page("layout")).children(vec![
//!         RouteNode::new("test", "Test", page("test")).meta(RouteMeta::titled("测试页")),
//!         RouteNode::new("filling", "Filling", page("filling"))
//!             .meta(RouteMeta::titled("数据填报").hide_theme_toggle(true)),
//!     ]),
//! )
//! .unwrap();
//!
//! assert_eq!(tree.resolve_path("/filling").unwrap().name(), "Filling");
//! assert!(tree.metadata_of("Filling").unwrap().hide_theme_toggle);
//! ```

use crate::error::RouteError;
use crate::meta::{RouteMeta, ShellChrome};
use crate::path::{join_path, split_path, validate_child_segment, ROOT_PATH};
use crate::redirect::{RedirectResolver, RedirectSpec};
use crate::view::{lazy_view, ViewCache, ViewLoader};
use crate::{debug_log, info_log, trace_log, warn_log, ViewLoadError};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Stable identity of a registered route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(usize);

impl RouteId {
    /// The tree root is always the first record.
    pub const ROOT: RouteId = RouteId(0);

    /// Position of the record in registration order.
    pub const fn index(self) -> usize {
        self.0
    }
}

// ============================================================================
// Declaration
// ============================================================================

/// Declarative description of a route, consumed by [`RouteTree::register`].
pub struct RouteNode<V> {
    path: String,
    name: String,
    view: ViewLoader<V>,
    meta: RouteMeta,
    children: Vec<RouteNode<V>>,
    redirect: Option<RedirectSpec>,
}

impl<V> RouteNode<V> {
    /// Bind `path` to a deferred view under a unique `name`.
    pub fn new(path: impl Into<String>, name: impl Into<String>, view: ViewLoader<V>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            view,
            meta: RouteMeta::default(),
            children: Vec::new(),
            redirect: None,
        }
    }

    /// Shorthand for [`new`](Self::new) with an async closure as the view.
    pub fn lazy<F, Fut>(path: impl Into<String>, name: impl Into<String>, produce: F) -> Self
    where
        V: Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, ViewLoadError>> + Send + 'static,
    {
        Self::new(path, name, lazy_view(produce))
    }

    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Append one child.
    pub fn child(mut self, child: RouteNode<V>) -> Self {
        self.children.push(child);
        self
    }

    /// Append children, keeping declaration order.
    pub fn children(mut self, children: Vec<RouteNode<V>>) -> Self {
        self.children.extend(children);
        self
    }

    /// Navigations landing on this route are forwarded according to `spec`.
    pub fn redirect(mut self, spec: RedirectSpec) -> Self {
        self.redirect = Some(spec);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<V> fmt::Debug for RouteNode<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteNode")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("meta", &self.meta)
            .field("children", &self.children)
            .field("redirect", &self.redirect)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Registered form
// ============================================================================

/// A route as stored in the tree.
pub struct RouteRecord<V> {
    id: RouteId,
    parent: Option<RouteId>,
    children: Vec<RouteId>,
    path: String,
    full_path: String,
    name: String,
    view: ViewLoader<V>,
    meta: RouteMeta,
    redirect: Option<RedirectSpec>,
}

impl<V> RouteRecord<V> {
    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn parent(&self) -> Option<RouteId> {
        self.parent
    }

    /// Child ids in declaration order.
    pub fn children(&self) -> &[RouteId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The segment this route was declared with.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Absolute path from the root, e.g. `"/filling"`.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn view(&self) -> &ViewLoader<V> {
        &self.view
    }

    /// Metadata as declared.
    pub fn meta(&self) -> &RouteMeta {
        &self.meta
    }

    /// Metadata with defaults applied.
    pub fn chrome(&self) -> ShellChrome {
        self.meta.effective(&self.name)
    }

    pub fn redirect(&self) -> Option<&RedirectSpec> {
        self.redirect.as_ref()
    }
}

impl<V> fmt::Debug for RouteRecord<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("full_path", &self.full_path)
            .field("children", &self.children)
            .field("meta", &self.meta)
            .field("redirect", &self.redirect)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// RouteTree
// ============================================================================

/// Hierarchical registry of routes with a per-route view memo.
pub struct RouteTree<V> {
    records: Vec<RouteRecord<V>>,
    names: HashMap<String, RouteId>,
    views: ViewCache<V>,
}

impl<V> RouteTree<V> {
    /// Create a tree from its root and register the root's declared children.
    ///
    /// The root must use the path `"/"`. It may omit a title.
    pub fn new(root: RouteNode<V>) -> Result<Self, RouteError> {
        if root.path != ROOT_PATH {
            return Err(RouteError::InvalidPath {
                path: root.path,
                reason: "the tree root must use '/'".to_string(),
            });
        }

        let RouteNode {
            path,
            name,
            view,
            meta,
            children,
            redirect,
        } = root;

        info_log!("Registered root route '{}' (name: '{}')", path, name);

        let mut tree = Self {
            records: vec![RouteRecord {
                id: RouteId::ROOT,
                parent: None,
                children: Vec::new(),
                full_path: path.clone(),
                path,
                name: name.clone(),
                view,
                meta,
                redirect,
            }],
            names: HashMap::from([(name, RouteId::ROOT)]),
            views: ViewCache::new(),
        };

        for child in children {
            tree.register(child, None)?;
        }

        Ok(tree)
    }

    /// Register `node` (and its declared children) under the route named
    /// `parent`, or under the root when `parent` is `None`.
    ///
    /// The whole subtree is validated before anything is inserted.
    pub fn register(&mut self, node: RouteNode<V>, parent: Option<&str>) -> Result<RouteId, RouteError> {
        let parent_id = match parent {
            Some(name) => self.resolve_by_name(name)?.id,
            None => RouteId::ROOT,
        };

        let validation = {
            let mut seen = HashSet::new();
            self.validate_node(&node, Some(parent_id), &mut seen)
        };
        if let Err(err) = validation {
            warn_log!("Rejected route '{}': {}", node.name, err);
            return Err(err);
        }

        Ok(self.insert_node(node, parent_id))
    }

    fn validate_node<'a>(
        &self,
        node: &'a RouteNode<V>,
        parent: Option<RouteId>,
        seen: &mut HashSet<&'a str>,
    ) -> Result<(), RouteError> {
        validate_child_segment(&node.path)?;

        if node.name.is_empty() {
            return Err(RouteError::MissingName {
                path: node.path.clone(),
            });
        }

        if node.meta.title.as_deref().map_or(true, str::is_empty) {
            return Err(RouteError::MissingTitle {
                name: node.name.clone(),
            });
        }

        if self.names.contains_key(&node.name) || !seen.insert(node.name.as_str()) {
            return Err(RouteError::DuplicateName {
                name: node.name.clone(),
            });
        }

        // Only the subtree root has registered siblings; deeper nodes are
        // checked against their declared siblings below.
        if let Some(parent) = parent {
            let parent = &self.records[parent.0];
            let taken = parent
                .children
                .iter()
                .any(|child| self.records[child.0].path == node.path);
            if taken {
                return Err(RouteError::DuplicatePath {
                    parent: parent.name.clone(),
                    path: node.path.clone(),
                });
            }
        }

        let mut sibling_paths = HashSet::new();
        for child in &node.children {
            if !sibling_paths.insert(child.path.as_str()) {
                return Err(RouteError::DuplicatePath {
                    parent: node.name.clone(),
                    path: child.path.clone(),
                });
            }
            self.validate_node(child, None, seen)?;
        }

        Ok(())
    }

    fn insert_node(&mut self, node: RouteNode<V>, parent: RouteId) -> RouteId {
        let RouteNode {
            path,
            name,
            view,
            meta,
            children,
            redirect,
        } = node;

        let id = RouteId(self.records.len());
        let full_path = join_path(&self.records[parent.0].full_path, &path);
        info_log!("Registered route '{}' (name: '{}')", full_path, name);

        self.records.push(RouteRecord {
            id,
            parent: Some(parent),
            children: Vec::new(),
            path,
            full_path,
            name: name.clone(),
            view,
            meta,
            redirect,
        });
        self.records[parent.0].children.push(id);
        self.names.insert(name, id);

        for child in children {
            self.insert_node(child, id);
        }

        id
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Find the route carrying `name`.
    pub fn resolve_by_name(&self, name: &str) -> Result<&RouteRecord<V>, RouteError> {
        match self.names.get(name) {
            Some(id) => Ok(&self.records[id.0]),
            None => {
                debug_log!("No route named '{}'", name);
                Err(RouteError::NotFound {
                    target: name.to_string(),
                })
            }
        }
    }

    /// Walk the tree one segment per level, starting at the root's children.
    ///
    /// Leading and trailing slashes are normalized: an element such as
    /// `"/filling/"` is split first and empty segments are skipped. No
    /// segments at all resolves the root.
    pub fn resolve_by_path<S: AsRef<str>>(&self, segments: &[S]) -> Result<&RouteRecord<V>, RouteError> {
        let mut current = &self.records[RouteId::ROOT.0];
        let mut walked = String::new();

        for segment in segments.iter().flat_map(|s| split_path(s.as_ref())) {
            walked.push('/');
            walked.push_str(segment);

            let next = current
                .children
                .iter()
                .map(|child| &self.records[child.0])
                .find(|child| child.path == segment);

            match next {
                Some(child) => {
                    trace_log!("Segment '{}' matched route '{}'", segment, child.name);
                    current = child;
                }
                None => {
                    debug_log!("Segment '{}' has no match under '{}'", segment, current.name);
                    return Err(RouteError::NotFound { target: walked });
                }
            }
        }

        Ok(current)
    }

    /// Split a raw path such as `"/filling/"` and resolve it.
    pub fn resolve_path(&self, path: &str) -> Result<&RouteRecord<V>, RouteError> {
        self.resolve_by_path(&split_path(path))
    }

    /// Effective metadata for the route named `name`.
    pub fn metadata_of(&self, name: &str) -> Result<ShellChrome, RouteError> {
        self.resolve_by_name(name).map(RouteRecord::chrome)
    }

    pub fn get(&self, id: RouteId) -> Option<&RouteRecord<V>> {
        self.records.get(id.0)
    }

    pub fn root(&self) -> &RouteRecord<V> {
        &self.records[RouteId::ROOT.0]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Number of registered routes, root included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// A tree always has its root, so it is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Depth-first traversal in declaration order, yielding `(depth, record)`.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            tree: self,
            stack: vec![(0, RouteId::ROOT)],
        }
    }

    /// Check every static redirect target against the registered names.
    ///
    /// Deferred redirects can only be checked when they run.
    pub fn validate_redirects(&self) -> Result<(), RouteError> {
        for record in &self.records {
            if let Some(target) = record.redirect.as_ref().and_then(RedirectSpec::static_target) {
                RedirectResolver::validate(self, target)?;
            }
        }
        Ok(())
    }

    /// `true` once the view for `name` is memoized.
    pub fn is_view_loaded(&self, name: &str) -> bool {
        self.names
            .get(name)
            .is_some_and(|id| self.views.is_loaded(*id))
    }

    /// Indented outline of the tree for debugging.
    #[cfg(debug_assertions)]
    pub fn debug_string(&self) -> String {
        self.iter()
            .map(|(depth, record)| {
                format!(
                    "{}{} ({})",
                    "  ".repeat(depth),
                    record.full_path,
                    record.name
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<V: Send + Sync + 'static> RouteTree<V> {
    /// Load the view of the route named `name`, going through the memo.
    pub async fn load_view(&self, name: &str) -> Result<Arc<V>, RouteError> {
        let record = self.resolve_by_name(name)?;
        self.load_record_view(record).await
    }

    /// Load the view of an already-resolved record.
    pub async fn load_record_view(&self, record: &RouteRecord<V>) -> Result<Arc<V>, RouteError> {
        self.views
            .get_or_load(record.id, &record.view)
            .await
            .map_err(|source| {
                warn_log!("View for route '{}' failed to load: {}", record.name, source);
                RouteError::ViewLoad {
                    name: record.name.clone(),
                    source,
                }
            })
    }
}

impl<V> fmt::Debug for RouteTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTree")
            .field("records", &self.records)
            .field("views", &self.views)
            .finish()
    }
}

/// Depth-first iterator returned by [`RouteTree::iter`].
pub struct Iter<'a, V> {
    tree: &'a RouteTree<V>,
    stack: Vec<(usize, RouteId)>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (usize, &'a RouteRecord<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, id) = self.stack.pop()?;
        let record = &self.tree.records[id.0];
        self.stack
            .extend(record.children.iter().rev().map(|child| (depth + 1, *child)));
        Some((depth, record))
    }
}
