use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use scopetree::{DiError, Scope, factory, named, singleton, tagged, value};

// ======================
// Tag intersection decides inheritance at clone time
// ======================

#[test]
fn tagged_provider_is_inherited_only_by_intersecting_scopes() {
    static BUILDS: AtomicU32 = AtomicU32::new(0);

    let root = Scope::root();
    root.register(
        "logger",
        tagged(
            ["home"],
            singleton(factory(|_, _| BUILDS.fetch_add(1, Ordering::SeqCst))),
        ),
    )
    .unwrap();

    let home = root.create_scope_tagged(["home"]).unwrap();
    assert!(home.resolve("logger").is_ok());

    // Invalid at clone time: the provider never reaches the office scope,
    // and the root's own copy is invalid against its untagged options.
    let office = root.create_scope_tagged(["office"]).unwrap();
    assert!(matches!(
        office.resolve("logger"),
        Err(DiError::ProviderNotFound(_))
    ));
}

#[test]
fn one_shared_tag_is_enough_to_inherit() {
    let root = Scope::root();
    root.register("svc", tagged(["root"], value("tagged-value")))
        .unwrap();

    let both = root.create_scope_tagged(["root", "extra"]).unwrap();
    assert_eq!(*both.resolve_as::<&str>("svc").unwrap(), "tagged-value");

    let other = root.create_scope_tagged(["other"]).unwrap();
    assert!(other.resolve("svc").is_err());
}

#[test]
fn tagged_singletons_open_their_boundary_at_the_tagged_scope() {
    static BUILDS: AtomicU32 = AtomicU32::new(0);

    let root = Scope::root();
    root.register(
        "cache",
        tagged(
            ["worker"],
            singleton(factory(|_, _| BUILDS.fetch_add(1, Ordering::SeqCst))),
        ),
    )
    .unwrap();

    let worker_a = root.create_scope_tagged(["worker"]).unwrap();
    let worker_b = root.create_scope_tagged(["worker"]).unwrap();

    let in_a = worker_a.resolve("cache").unwrap();
    let in_b = worker_b.resolve("cache").unwrap();

    // Each tagged scope is a fresh boundary: distinct caches.
    assert!(!Arc::ptr_eq(&in_a, &in_b));
    assert_eq!(BUILDS.load(Ordering::SeqCst), 2);

    // Untagged descendants fall back to the tagged ancestor's cache.
    let below_a = worker_a.create_scope().unwrap();
    let shared = below_a.resolve("cache").unwrap();
    assert!(Arc::ptr_eq(&in_a, &shared));
}

// ======================
// Named providers: single-axis discrimination
// ======================

#[test]
fn named_provider_resolves_only_in_the_matching_scope() {
    let root = Scope::root();
    root.register("ctx", named("request", value("request-ctx")))
        .unwrap();

    let request = root.create_scope_named("request").unwrap();
    assert_eq!(*request.resolve_as::<&str>("ctx").unwrap(), "request-ctx");

    let session = root.create_scope_named("session").unwrap();
    assert!(matches!(
        session.resolve("ctx"),
        Err(DiError::ProviderNotFound(_))
    ));
}

#[test]
fn named_scopes_can_also_carry_tags() {
    let root = Scope::root();
    root.register("ctx", named("request", value("request-ctx")))
        .unwrap();
    root.register("audit", tagged(["traced"], value("audit-log")))
        .unwrap();

    let request = root
        .create_scope_named_tagged("request", ["traced"])
        .unwrap();

    assert_eq!(request.name(), Some("request"));
    assert!(request.tags().contains("traced"));
    assert_eq!(*request.resolve_as::<&str>("ctx").unwrap(), "request-ctx");
    assert_eq!(*request.resolve_as::<&str>("audit").unwrap(), "audit-log");
}
