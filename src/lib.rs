//! Hierarchical route registry for application shells.
//!
//! `shell-navigator` maps URL path segments to lazily loaded views, attaches
//! per-route presentation metadata, and resolves landing redirects that carry
//! query parameters. It is generic over the view type and never renders
//! anything itself.
//!
//! # Building blocks
//!
//! | Type | Role |
//! |------|------|
//! | [`RouteNode`] | Declarative route: path, unique name, deferred view, metadata, children, redirect |
//! | [`RouteTree`] | Validating registry with name/path lookup and a per-route view memo |
//! | [`RedirectSpec`] / [`RedirectResolver`] | Static or computed redirects, checked against the tree |
//! | [`Navigator`] | Drives navigations with last-navigation-wins ordering and history |
//! | [`ShellChrome`] | Effective metadata the shell uses to show or hide its chrome |
//!
//! # Example
//!
//! ```
//! use shell_navigator::{
//!     lazy_view, Navigator, RedirectSpec, RedirectTarget, RouteMeta, RouteNode, RouteTree,
//!     ViewLoadError,
//! };
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Page {
//!     Layout,
//!     Test,
//!     Filling,
//! }
//!
//! let tree = RouteTree::new(
//!     RouteNode::lazy("/", "root", || async { Ok::<_, ViewLoadError>(Page::Layout) })
//!         .redirect(RedirectSpec::deferred(|ctx| {
//!             RedirectTarget::new("Filling").with_params(ctx.query.clone().with("from", "Govern"))
//!         }))
//!         .children(vec![
//!             RouteNode::new("test", "Test", lazy_view(|| async { Ok::<_, ViewLoadError>(Page::Test) }))
//!                 .meta(RouteMeta::titled("测试页")),
//!             RouteNode::new("filling", "Filling", lazy_view(|| async { Ok::<_, ViewLoadError>(Page::Filling) }))
//!                 .meta(RouteMeta::titled("数据填报").hide_theme_toggle(true)),
//!         ]),
//! )
//! .unwrap();
//!
//! let navigator = Navigator::new(tree).unwrap();
//! let outcome = pollster::block_on(navigator.push_path("/?userId=1")).unwrap();
//!
//! let active = outcome.active().unwrap();
//! assert_eq!(*active.view, Page::Filling);
//! assert_eq!(active.params().get("userId"), Some("1"));
//! assert!(active.chrome.hide_theme_toggle);
//! assert!(!active.chrome.hide_tabbar);
//! ```
//!
//! # Features
//!
//! | Feature | Default | Effect |
//! |---------|---------|--------|
//! | `log` | yes | diagnostics through the `log` crate |
//! | `tracing` | no | diagnostics through `tracing` instead |
//! | `cache` | yes | LRU cache of path resolutions in [`Navigator`] |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod logging;

#[cfg(feature = "cache")]
pub mod cache;
pub mod error;
pub mod meta;
pub mod navigator;
pub mod params;
pub mod path;
pub mod redirect;
pub mod tree;
pub mod view;

pub use error::{RouteError, ViewLoadError};
pub use meta::{MetaValue, RouteMeta, ShellChrome};
pub use navigator::{
    ActiveRoute, Location, NavigationOutcome, NavigationRequest, Navigator, MAX_REDIRECT_DEPTH,
};
pub use params::QueryParams;
pub use path::{normalize_path, split_location, split_path};
pub use redirect::{RedirectContext, RedirectFn, RedirectResolver, RedirectSpec, RedirectTarget};
pub use tree::{RouteId, RouteNode, RouteRecord, RouteTree};
pub use view::{lazy_view, ViewCache, ViewFuture, ViewLoader};
