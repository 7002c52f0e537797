use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use scopetree::{DiError, Scope, at_level, factory, level_range, singleton};

#[derive(Debug)]
struct Session {
    id: u32,
}

// ======================
// Singleton bounded to level 1: one instance per level-1 subtree
// ======================

#[test]
fn level_one_singleton_is_distinct_per_child_but_shared_below() {
    static BUILDS: AtomicU32 = AtomicU32::new(0);

    let root = Scope::root();
    root.register(
        "session",
        at_level(
            1,
            singleton(factory(|_, _| Session {
                id: BUILDS.fetch_add(1, Ordering::SeqCst),
            })),
        ),
    )
    .unwrap();

    let child_a = root.create_scope().unwrap();
    let child_b = root.create_scope().unwrap();

    let in_a = child_a.resolve_as::<Session>("session").unwrap();
    let in_b = child_b.resolve_as::<Session>("session").unwrap();
    assert!(!Arc::ptr_eq(&in_a, &in_b));
    assert_eq!(BUILDS.load(Ordering::SeqCst), 2);

    // A grandchild falls outside the range, so it delegates to its parent
    // and shares that parent's cached instance.
    let grandchild = child_a.create_scope().unwrap();
    let below_a = grandchild.resolve_as::<Session>("session").unwrap();
    assert!(Arc::ptr_eq(&in_a, &below_a));
    assert_eq!(BUILDS.load(Ordering::SeqCst), 2);
}

#[test]
fn out_of_range_scope_cannot_resolve_the_key() {
    let root = Scope::root();
    root.register("session", at_level(1, factory(|_, _| Session { id: 0 })))
        .unwrap();

    // Registered locally but invalid at level 0: delegation walks to the
    // empty scope and reports not-found.
    let err = root.resolve("session").unwrap_err();
    assert!(matches!(err, DiError::ProviderNotFound(_)));
}

#[test]
fn range_spans_are_inclusive() {
    let root = Scope::root();
    root.register(
        "svc",
        level_range(1, 2, factory(|_, _| String::from("svc"))),
    )
    .unwrap();

    let child = root.create_scope().unwrap();
    let grandchild = child.create_scope().unwrap();
    let great = grandchild.create_scope().unwrap();

    assert!(child.resolve("svc").is_ok());
    assert!(grandchild.resolve("svc").is_ok());
    // Level 3 is outside [1, 2]; nothing above level 2 holds the provider
    // either, but levels 1 and 2 do, so delegation still succeeds.
    assert!(great.resolve("svc").is_ok());
    assert!(matches!(root.resolve("svc"), Err(DiError::ProviderNotFound(_))));
}
