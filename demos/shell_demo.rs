//! Shell Demo - headless walk through the application route table
//!
//! Registers the four shell pages, lands on `/` (which redirects to the
//! filling page with its query parameters), then moves around and prints
//! what the shell would render at each step.
//!
//! Run with `RUST_LOG=debug cargo run --example shell_demo` to see the
//! router's own diagnostics.

use shell_navigator::{
    lazy_view, NavigationOutcome, Navigator, QueryParams, RedirectSpec, RedirectTarget,
    RouteError, RouteMeta, RouteNode, RouteTree, ViewLoadError, ViewLoader,
};

#[derive(Debug)]
enum Page {
    Layout,
    Test,
    Filling,
    Tools,
    Demo,
}

fn view(page: fn() -> Page) -> ViewLoader<Page> {
    lazy_view(move || async move {
        println!("  (loading {:?} view)", page());
        Ok::<_, ViewLoadError>(page())
    })
}

fn build_tree() -> Result<RouteTree<Page>, RouteError> {
    RouteTree::new(
        RouteNode::new("/", "root", view(|| Page::Layout))
            .redirect(RedirectSpec::deferred(|ctx| {
                RedirectTarget::new("Filling").with_params(
                    ctx.query
                        .clone()
                        .with("from", "Govern")
                        .with("token", "1234567890")
                        .with("userId", "1")
                        .with("fillId", "abcdefg"),
                )
            }))
            .children(vec![
                RouteNode::new("test", "Test", view(|| Page::Test))
                    .meta(RouteMeta::titled("测试页")),
                RouteNode::new("filling", "Filling", view(|| Page::Filling))
                    .meta(RouteMeta::titled("数据填报").hide_theme_toggle(true)),
                RouteNode::new("tools", "Tools", view(|| Page::Tools))
                    .meta(RouteMeta::titled("工具")),
                RouteNode::new("demo", "Demo", view(|| Page::Demo))
                    .meta(RouteMeta::titled("技术栈")),
            ]),
    )
}

fn report(step: &str, result: Result<NavigationOutcome<Page>, RouteError>) {
    match result {
        Ok(NavigationOutcome::Applied(active)) => println!(
            "{step}: {} [{}] view={:?} theme_toggle={} tabbar={}",
            active.location.href(),
            active.title(),
            active.view,
            !active.chrome.hide_theme_toggle,
            !active.chrome.hide_tabbar,
        ),
        Ok(NavigationOutcome::Superseded { name }) => {
            println!("{step}: navigation to '{name}' was superseded");
        }
        Err(err) => println!("{step}: error: {err}"),
    }
}

fn main() -> Result<(), RouteError> {
    env_logger::init();

    let navigator = Navigator::new(build_tree()?)?;

    #[cfg(debug_assertions)]
    println!("Routes:\n{}\n", navigator.tree().debug_string());

    pollster::block_on(async {
        report("land", navigator.push_path("/").await);
        report("tools", navigator.push_path("/tools").await);
        report(
            "demo",
            navigator
                .push_named("Demo", QueryParams::new().with("tab", "stack"))
                .await,
        );
        report("missing", navigator.push_path("/filling/x").await);

        if let Some(result) = navigator.back().await {
            report("back", result);
        }
        // Filling was already loaded on landing; no loader runs here.
        report("filling", navigator.push_path("/filling").await);
    });

    let trail: Vec<String> = navigator.history().iter().map(|l| l.href()).collect();
    println!("\nHistory: {}", trail.join(" -> "));
    println!("Test view loaded: {}", navigator.tree().is_view_loaded("Test"));

    #[cfg(feature = "cache")]
    {
        let stats = navigator.cache_stats();
        println!(
            "Path cache: {} hits, {} misses ({:.0}% hit rate)",
            stats.hits,
            stats.misses,
            stats.hit_rate() * 100.0
        );
    }

    Ok(())
}
