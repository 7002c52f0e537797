use scopetree::{DiError, Scope, value};

// ======================
// Override-by-depth: a child registration shadows the parent's
// ======================

#[test]
fn child_registration_shadows_the_parent() {
    let root = Scope::root();
    root.register("key1", value("parent-value")).unwrap();

    let child = root.create_scope().unwrap();
    child.register("key1", value("child-value")).unwrap();

    let at_root = root.resolve_as::<&str>("key1").unwrap();
    let at_child = child.resolve_as::<&str>("key1").unwrap();

    assert_eq!(*at_root, "parent-value");
    assert_eq!(*at_child, "child-value");
}

#[test]
fn shadowing_extends_to_descendants_without_touching_the_parent() {
    let root = Scope::root();
    root.register("key1", value("parent-value")).unwrap();

    let child = root.create_scope().unwrap();
    child.register("key1", value("child-value")).unwrap();
    let grandchild = child.create_scope().unwrap();

    assert_eq!(*grandchild.resolve_as::<&str>("key1").unwrap(), "child-value");
    assert_eq!(*root.resolve_as::<&str>("key1").unwrap(), "parent-value");
}

// ======================
// Not-found propagation
// ======================

#[test]
fn missing_key_raises_not_found_once_from_the_terminus() {
    let root = Scope::root();
    let deep = root
        .create_scope()
        .unwrap()
        .create_scope()
        .unwrap()
        .create_scope()
        .unwrap();

    let err = deep.resolve("missing").unwrap_err();
    match err {
        DiError::ProviderNotFound(key) => assert_eq!(key.to_string(), "missing"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_root_resolves_nothing() {
    let root = Scope::root();
    assert!(matches!(
        root.resolve("missing"),
        Err(DiError::ProviderNotFound(_))
    ));
}

// ======================
// Repositories evolve independently after child creation
// ======================

#[test]
fn late_parent_registrations_are_not_retroactively_seeded() {
    use scopetree::{at_level, factory, singleton};

    let root = Scope::root();
    let child = root.create_scope().unwrap();

    // A plain key registered late is still reachable, but only through
    // live parent delegation, never by re-seeding the child's repository.
    root.register("late", value("added-after")).unwrap();
    assert_eq!(*child.resolve_as::<&str>("late").unwrap(), "added-after");

    // A boundary provider registered late never opens its cache boundary
    // at the already-created child: the child holds no clone, and the root
    // copy is invalid at level 0.
    root.register(
        "bounded",
        at_level(1, singleton(factory(|_, _| String::from("x")))),
    )
    .unwrap();
    assert!(matches!(
        child.resolve("bounded"),
        Err(DiError::ProviderNotFound(_))
    ));

    // A sibling created after the registration does get seeded.
    let late_child = root.create_scope().unwrap();
    assert!(late_child.resolve("bounded").is_ok());
}

#[test]
fn registration_returns_self_for_chaining() {
    let root = Scope::root();
    root.register("a", value(1u32))
        .unwrap()
        .register("b", value(2u32))
        .unwrap();

    assert_eq!(*root.resolve_as::<u32>("a").unwrap(), 1);
    assert_eq!(*root.resolve_as::<u32>("b").unwrap(), 2);
}

#[test]
fn register_unique_rejects_a_busy_key() {
    let root = Scope::root();
    root.register_unique("cfg", value(1u32)).unwrap();
    let err = root.register_unique("cfg", value(2u32)).unwrap_err();
    assert!(matches!(err, DiError::KeyBusy(_)));

    // Plain register keeps overwrite semantics.
    root.register("cfg", value(3u32)).unwrap();
    assert_eq!(*root.resolve_as::<u32>("cfg").unwrap(), 3);
}
