//! Registration and lookup behaviour of `RouteTree`.

mod common;

use common::*;
use shell_navigator::*;

#[test]
fn test_scenario_filling_by_path() {
    init_logger();
    let tree = shell_routes();

    let filling = tree.resolve_by_path(&["filling"]).unwrap();
    assert_eq!(filling.name(), "Filling");
    assert!(filling.is_leaf());

    assert_eq!(tree.resolve_by_path(&["/filling/"]).unwrap().id(), filling.id());

    let err = tree.resolve_by_path(&["filling", "x"]).unwrap_err();
    assert_eq!(
        err,
        RouteError::NotFound {
            target: "/filling/x".to_string()
        }
    );
}

#[test]
fn test_every_name_resolves_to_its_node() {
    let tree = shell_routes();
    for name in ["root", "Test", "Filling", "Tools", "Demo"] {
        assert_eq!(tree.resolve_by_name(name).unwrap().name(), name);
    }
    assert!(tree.resolve_by_name("Nope").unwrap_err().is_not_found());
}

#[test]
fn test_path_and_name_resolution_agree() {
    let mut tree = shell_routes();
    tree.register(
        RouteNode::new("json", "JsonTool", page("json")).meta(RouteMeta::titled("JSON")),
        Some("Tools"),
    )
    .unwrap();

    for (_, record) in tree.iter() {
        let by_path = tree.resolve_path(record.full_path()).unwrap();
        let by_name = tree.resolve_by_name(record.name()).unwrap();
        assert_eq!(by_path.id(), by_name.id(), "mismatch for {}", record.full_path());
    }
}

#[test]
fn test_slashes_are_normalized() {
    let tree = shell_routes();
    for path in ["/demo", "demo", "/demo/", "//demo//"] {
        assert_eq!(tree.resolve_path(path).unwrap().name(), "Demo", "path {path}");
    }
    assert_eq!(tree.resolve_path("/").unwrap().name(), "root");
}

#[test]
fn test_duplicate_name_leaves_tree_unchanged() {
    let mut tree = shell_routes();
    let before = names(&tree);

    let err = tree
        .register(
            RouteNode::new("other", "Demo", page("other")).meta(RouteMeta::titled("Other")),
            None,
        )
        .unwrap_err();

    assert_eq!(
        err,
        RouteError::DuplicateName {
            name: "Demo".to_string()
        }
    );
    assert_eq!(names(&tree), before);
    assert!(tree.resolve_path("/other").is_err());
}

#[test]
fn test_duplicate_sibling_path() {
    let mut tree = shell_routes();
    let err = tree
        .register(
            RouteNode::new("demo", "Demo2", page("demo2")).meta(RouteMeta::titled("Demo 2")),
            None,
        )
        .unwrap_err();

    assert_eq!(
        err,
        RouteError::DuplicatePath {
            parent: "root".to_string(),
            path: "demo".to_string()
        }
    );
    assert!(!tree.contains("Demo2"));
}

#[test]
fn test_same_path_under_different_parents_is_allowed() {
    let mut tree = shell_routes();
    tree.register(
        RouteNode::new("demo", "ToolsDemo", page("tools-demo")).meta(RouteMeta::titled("Demo")),
        Some("Tools"),
    )
    .unwrap();

    assert_eq!(tree.resolve_path("/tools/demo").unwrap().name(), "ToolsDemo");
    assert_eq!(tree.resolve_path("/demo").unwrap().name(), "Demo");
}

#[test]
fn test_invalid_child_paths() {
    let mut tree = shell_routes();
    for path in ["", "/", "/about", "a/b"] {
        let err = tree
            .register(
                RouteNode::new(path, "Bad", page("bad")).meta(RouteMeta::titled("Bad")),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, RouteError::InvalidPath { .. }), "path {path:?}");
    }
}

#[test]
fn test_failed_subtree_registers_nothing() {
    let mut tree = shell_routes();
    let before = tree.len();

    let subtree = RouteNode::new("admin", "Admin", page("admin"))
        .meta(RouteMeta::titled("Admin"))
        .children(vec![
            RouteNode::new("users", "Users", page("users")).meta(RouteMeta::titled("Users")),
            RouteNode::new("audit", "Test", page("audit")).meta(RouteMeta::titled("Audit")),
        ]);

    assert!(tree.register(subtree, None).is_err());
    assert_eq!(tree.len(), before);
    assert!(!tree.contains("Admin"));
    assert!(!tree.contains("Users"));
}

#[test]
fn test_metadata_defaults_and_overrides() {
    let mut tree = shell_routes();
    tree.register(
        RouteNode::new("report", "Report", page("report"))
            .meta(RouteMeta::titled("Report").hide_tabbar(true)),
        None,
    )
    .unwrap();

    let report = tree.metadata_of("Report").unwrap();
    assert_eq!(report.title, "Report");
    assert!(report.hide_tabbar);
    assert!(!report.hide_theme_toggle);

    let filling = tree.metadata_of("Filling").unwrap();
    assert_eq!(filling.title, "数据填报");
    assert!(filling.hide_theme_toggle);
    assert!(!filling.hide_tabbar);

    let demo = tree.metadata_of("Demo").unwrap();
    assert!(!demo.hide_theme_toggle);
    assert!(!demo.hide_tabbar);

    assert!(tree.metadata_of("Missing").unwrap_err().is_not_found());
}

#[test]
fn test_declaration_order_is_kept() {
    let tree = shell_routes();
    assert_eq!(names(&tree), vec!["root", "Test", "Filling", "Tools", "Demo"]);

    let depths: Vec<usize> = tree.iter().map(|(depth, _)| depth).collect();
    assert_eq!(depths, vec![0, 1, 1, 1, 1]);
}

#[test]
fn test_static_redirect_validation() {
    let tree = RouteTree::new(
        RouteNode::new("/", "root", page("layout"))
            .redirect(RedirectSpec::to("Nonexistent"))
            .children(pages(page("filling"))),
    )
    .unwrap();

    assert_eq!(
        tree.validate_redirects().unwrap_err(),
        RouteError::UnknownTarget {
            name: "Nonexistent".to_string()
        }
    );
}
