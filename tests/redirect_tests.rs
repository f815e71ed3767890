//! Redirect resolution against the application route table.

mod common;

use common::*;
use shell_navigator::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

#[test]
fn test_static_demo_redirect_returned_unchanged() {
    let tree = shell_routes();
    let spec = RedirectSpec::target(RedirectTarget::new("Demo"));

    let target = RedirectResolver::resolve(&tree, &spec, &RedirectContext::new()).unwrap();
    assert_eq!(target.name, "Demo");
    assert!(target.params.is_empty());
}

#[test]
fn test_unknown_target_is_an_error() {
    let tree = shell_routes();
    let spec = RedirectSpec::target(
        RedirectTarget::new("Nonexistent").param("token", "1234567890"),
    );

    let result = RedirectResolver::resolve(&tree, &spec, &RedirectContext::new());
    assert!(matches!(
        result,
        Err(RouteError::UnknownTarget { ref name }) if name == "Nonexistent"
    ));
    assert!(result.unwrap_err().is_configuration_defect());
}

#[test]
fn test_landing_redirect_carries_params() {
    let tree = shell_routes();
    let spec = tree.root().redirect().unwrap();

    let target = RedirectResolver::resolve(&tree, spec, &RedirectContext::new()).unwrap();
    assert_eq!(target.name, "Filling");
    assert_eq!(target.params, landing_params());
    assert_eq!(
        target.params.to_query_string(),
        "fillId=abcdefg&from=Govern&token=1234567890&userId=1"
    );
}

#[test]
fn test_deferred_spec_runs_once_per_resolution() {
    let tree = shell_routes();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let spec = RedirectSpec::deferred(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        RedirectTarget::new("Tools")
    });

    for expected in 1..=3 {
        RedirectResolver::resolve(&tree, &spec, &RedirectContext::new()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), expected);
    }
}

#[test]
fn test_deferred_spec_is_not_cached_across_visits() {
    let tree = shell_routes();
    let spec = RedirectSpec::deferred(|ctx| {
        RedirectTarget::new("Filling").param("t", ctx.timestamp_millis().to_string())
    });

    let first = RedirectContext::new().at(UNIX_EPOCH + Duration::from_millis(1_000));
    let second = RedirectContext::new().at(UNIX_EPOCH + Duration::from_millis(2_000));

    let a = RedirectResolver::resolve(&tree, &spec, &first).unwrap();
    let b = RedirectResolver::resolve(&tree, &spec, &second).unwrap();
    assert_eq!(a.params.get("t"), Some("1000"));
    assert_eq!(b.params.get("t"), Some("2000"));
}

#[test]
fn test_deferred_unknown_target_validated_like_static() {
    let tree = shell_routes();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let spec = RedirectSpec::deferred(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        RedirectTarget::new("Nonexistent")
    });

    let err = RedirectResolver::resolve(&tree, &spec, &RedirectContext::new()).unwrap_err();
    assert!(matches!(err, RouteError::UnknownTarget { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_context_exposes_origin() {
    let tree = shell_routes();
    let spec = RedirectSpec::deferred(|ctx| match ctx.from.as_deref() {
        Some("Demo") => RedirectTarget::new("Tools"),
        _ => RedirectTarget::new("Filling"),
    });

    let from_demo = RedirectContext::new().with_from(Some("Demo".to_string()));
    assert_eq!(
        RedirectResolver::resolve(&tree, &spec, &from_demo).unwrap().name,
        "Tools"
    );
    assert_eq!(
        RedirectResolver::resolve(&tree, &spec, &RedirectContext::new())
            .unwrap()
            .name,
        "Filling"
    );
}
