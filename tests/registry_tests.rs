mod common;

use common::{Example, Tagged, UserPage};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use urlbind::{Registry, Route, RouteError, RouteOptions, DEFAULT_GROUP};

#[derive(Debug, Default, PartialEq, Route)]
struct ArticleById {
    #[url_path]
    id: Option<u32>,
}

#[derive(Debug, Default, PartialEq, Route)]
struct ArticleBySlug {
    #[url_path]
    slug: Option<String>,
}

#[derive(Debug, Default, Route)]
struct NeverRegistered {
    #[url_path]
    id: Option<u32>,
}

fn article_registry() -> Registry {
    let registry = Registry::new();
    registry
        .register::<ArticleById>("article", "/articles/{id}", &RouteOptions::default())
        .unwrap();
    registry
        .register::<ArticleBySlug>("article", "/articles/by-slug/{slug}", &RouteOptions::default())
        .unwrap();
    registry
}

#[test]
fn test_route_path_and_name() {
    let registry = article_registry();
    assert_eq!(registry.route_path::<ArticleById>().unwrap(), "/articles/{id}");
    assert_eq!(registry.route_name::<ArticleBySlug>().unwrap(), "article");
    assert_eq!(
        registry
            .route_name_of(&ArticleById { id: Some(1) })
            .unwrap(),
        "article"
    );
}

#[test]
fn test_unregistered_type_errors() {
    let registry = article_registry();
    assert!(matches!(
        registry.route_path::<NeverRegistered>(),
        Err(RouteError::Unregistered { .. })
    ));
    assert!(registry.from_url::<NeverRegistered>("/x/1").is_err());
    assert!(registry.to_relative_url(&NeverRegistered::default()).is_err());
    assert!(matches!(
        registry.register_declared::<NeverRegistered>(),
        Err(RouteError::Unregistered { .. })
    ));
}

#[test]
fn test_lookup_tries_candidates_in_registration_order() {
    let registry = article_registry();

    let matched = registry.lookup("/articles/7", None).unwrap();
    assert_eq!(matched.name, "article");
    assert_eq!(matched.group, DEFAULT_GROUP);
    assert!(matched.is::<ArticleById>());
    assert_eq!(matched.downcast::<ArticleById>().unwrap().id, Some(7));

    let matched = registry.lookup("/articles/by-slug/hello", None).unwrap();
    assert_eq!(
        matched.downcast_ref::<ArticleBySlug>().map(|a| a.slug.as_deref()),
        Some(Some("hello"))
    );
}

#[test]
fn test_lookup_first_match_wins() {
    let registry = Registry::new();
    registry
        .register::<ArticleBySlug>("any", "/a/{slug}", &RouteOptions::default())
        .unwrap();
    registry
        .register::<ArticleById>("any", "/a/{id}", &RouteOptions::default())
        .unwrap();
    // Both patterns match; the slug variant was registered first.
    let matched = registry.lookup("/a/5", None).unwrap();
    assert!(matched.is::<ArticleBySlug>());
}

#[test]
fn test_lookup_not_found() {
    let registry = article_registry();
    assert!(registry.lookup("/nothing/here", None).is_none());
    assert!(registry.lookup("/articles/7", Some("admin")).is_none());
}

#[test]
fn test_downcast_to_wrong_type_returns_match() {
    let registry = article_registry();
    let matched = registry.lookup("/articles/7", None).unwrap();
    let matched = matched.downcast::<ArticleBySlug>().unwrap_err();
    assert_eq!(matched.type_name, std::any::type_name::<ArticleById>());
}

#[test]
fn test_groups_are_separate() {
    let registry = Registry::new();
    registry
        .register::<ArticleById>("article", "/admin/articles/{id}", &RouteOptions::group("admin"))
        .unwrap();
    assert!(registry.lookup("/admin/articles/1", None).is_none());
    let matched = registry.lookup("/admin/articles/1", Some("admin")).unwrap();
    assert_eq!(matched.group, "admin");
    assert!(registry.defined_routes(None).is_empty());
    assert_eq!(registry.defined_routes(Some("admin")).len(), 1);
}

#[test]
fn test_defined_routes_keep_registration_order() {
    let registry = article_registry();
    registry
        .register::<Tagged>("tags", "/tags", &RouteOptions::default())
        .unwrap();
    let routes = registry.defined_routes(None);
    let names: Vec<&str> = routes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["article", "tags"]);
    let patterns: Vec<&str> = routes[0]
        .variants
        .iter()
        .map(|v| v.pattern.as_str())
        .collect();
    assert_eq!(patterns, vec!["/articles/{id}", "/articles/by-slug/{slug}"]);
}

#[test]
fn test_duplicate_registration_is_ignored() {
    let registry = article_registry();
    registry
        .register::<ArticleById>("article", "/elsewhere/{id}", &RouteOptions::default())
        .unwrap();
    assert_eq!(registry.defined_routes(None)[0].variants.len(), 2);
    assert_eq!(registry.route_path::<ArticleById>().unwrap(), "/articles/{id}");
}

#[test]
fn test_latest_pattern_wins_across_groups() {
    let registry = article_registry();
    registry
        .register::<ArticleById>("article", "/v2/articles/{id}", &RouteOptions::group("v2"))
        .unwrap();
    assert_eq!(registry.route_path::<ArticleById>().unwrap(), "/v2/articles/{id}");
}

#[test]
fn test_invalid_pattern_rejected_at_registration() {
    let registry = Registry::new();
    let err = registry
        .register::<ArticleById>("bad", "/articles/{id}/{id}", &RouteOptions::default())
        .unwrap_err();
    assert!(matches!(err, RouteError::InvalidPattern { .. }));
    assert!(registry.route_path::<ArticleById>().is_err());
}

#[test]
fn test_uncovered_placeholder_rejected_at_registration() {
    let registry = Registry::new();
    let err = registry
        .register::<ArticleById>("article", "/articles/{id}/{slug}", &RouteOptions::default())
        .unwrap_err();
    match err {
        RouteError::MissingPathField { key, .. } => assert_eq!(key, "slug"),
        other => panic!("expected MissingPathField, got {other:?}"),
    }
    assert!(registry.route_path::<ArticleById>().is_err());
}

#[test]
fn test_global_registry_round_trip() {
    urlbind::register_declared::<Example>().unwrap();
    urlbind::register_declared::<UserPage>().unwrap();

    assert_eq!(urlbind::route_path::<Example>().unwrap(), "/example/{name}");
    assert_eq!(urlbind::route_name::<UserPage>().unwrap(), "user");

    let route = UserPage {
        id: Some(3),
        page: 2,
        search: None,
    };
    let url = urlbind::to_relative_url(&route).unwrap();
    assert_eq!(url, "/users/3?page=2");
    assert_eq!(urlbind::from_url::<UserPage>(&url).unwrap(), route);

    let matched = urlbind::lookup("/example/Basic?happy", None).unwrap();
    assert_eq!(matched.name, "example");
    let example = matched.downcast::<Example>().unwrap();
    assert!(example.happy);
    assert!(urlbind::defined_routes(None)
        .iter()
        .any(|r| r.name == "user"));
}

#[test]
fn test_concurrent_registration_and_lookup() {
    let registry = Arc::new(Registry::new());
    let matches = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let matches = Arc::clone(&matches);
            thread::spawn(move || {
                if i % 2 == 0 {
                    registry
                        .register::<ArticleById>("article", "/articles/{id}", &RouteOptions::default())
                        .unwrap();
                } else {
                    registry
                        .register::<ArticleBySlug>(
                            "article",
                            "/articles/by-slug/{slug}",
                            &RouteOptions::default(),
                        )
                        .unwrap();
                }
                for _ in 0..50 {
                    if let Some(found) = registry.lookup("/articles/by-slug/x", None) {
                        matches.lock().push(found.type_name);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let routes = registry.defined_routes(None);
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].variants.len(), 2);
    assert!(matches
        .lock()
        .iter()
        .all(|name| *name == std::any::type_name::<ArticleBySlug>()));
}
