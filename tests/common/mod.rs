//! Shared fixtures for integration tests.
//!
//! `shell_routes()` reproduces the application's route table: a root layout
//! at `/` that redirects to `Filling`, and four pages beneath it.

#![allow(dead_code)]

use shell_navigator::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Stand-in for a loaded view module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page(pub &'static str);

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn page(name: &'static str) -> ViewLoader<Page> {
    ViewLoader::ready(Page(name))
}

/// Loader that counts how often it was invoked.
pub fn counted_page(name: &'static str, calls: &Arc<AtomicUsize>) -> ViewLoader<Page> {
    let calls = Arc::clone(calls);
    lazy_view(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<_, ViewLoadError>(Page(name)) }
    })
}

/// Loader that blocks until `gate` gets a permit. Permits are returned, so
/// once opened the gate stays open.
pub fn gated_page(name: &'static str, gate: &Arc<Semaphore>, calls: &Arc<AtomicUsize>) -> ViewLoader<Page> {
    let gate = Arc::clone(gate);
    let calls = Arc::clone(calls);
    lazy_view(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        let gate = Arc::clone(&gate);
        async move {
            match gate.acquire().await {
                Ok(_permit) => Ok(Page(name)),
                Err(_) => Err(ViewLoadError::new("gate closed")),
            }
        }
    })
}

/// Query parameters the landing redirect injects.
pub fn landing_params() -> QueryParams {
    QueryParams::from_pairs([
        ("from", "Govern"),
        ("token", "1234567890"),
        ("userId", "1"),
        ("fillId", "abcdefg"),
    ])
}

pub fn landing_redirect() -> RedirectSpec {
    RedirectSpec::deferred(|_ctx| RedirectTarget::new("Filling").with_params(landing_params()))
}

/// The four application pages, in declaration order.
pub fn pages(filling: ViewLoader<Page>) -> Vec<RouteNode<Page>> {
    vec![
        RouteNode::new("test", "Test", page("test")).meta(RouteMeta::titled("测试页")),
        RouteNode::new("filling", "Filling", filling)
            .meta(RouteMeta::titled("数据填报").hide_theme_toggle(true)),
        RouteNode::new("tools", "Tools", page("tools")).meta(RouteMeta::titled("工具")),
        RouteNode::new("demo", "Demo", page("demo")).meta(RouteMeta::titled("技术栈")),
    ]
}

pub fn shell_routes_with(filling: ViewLoader<Page>) -> RouteTree<Page> {
    RouteTree::new(
        RouteNode::new("/", "root", page("layout"))
            .redirect(landing_redirect())
            .children(pages(filling)),
    )
    .expect("fixture route table is valid")
}

pub fn shell_routes() -> RouteTree<Page> {
    shell_routes_with(page("filling"))
}

pub fn names(tree: &RouteTree<Page>) -> Vec<String> {
    tree.iter().map(|(_, r)| r.name().to_string()).collect()
}
