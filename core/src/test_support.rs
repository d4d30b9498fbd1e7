//! Fixture hierarchies shared by unit tests.

use crate::class::{ClassDef, Expr, Hierarchy, MethodDef};
use crate::val::Domain;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fruit -> Citrus -> Lemon, only Fruit and Citrus declare `overrideMe`.
pub fn fruit_defs() -> Vec<ClassDef> {
    vec![
        ClassDef::new("Fruit").method(MethodDef::expr("overrideMe", 0, Expr::lit("fruit"))),
        ClassDef::new("Citrus")
            .extends("Fruit")
            .method(MethodDef::expr("overrideMe", 0, Expr::lit("citrus"))),
        ClassDef::new("Lemon").extends("Citrus"),
    ]
}

pub fn fruit_hierarchy() -> Hierarchy {
    init_tracing();
    Hierarchy::build(fruit_defs()).expect("fruit hierarchy is well formed")
}

/// Two unrelated classes that construct each other, plus a driver class whose
/// `test1`..`test4` methods exercise every cross-domain direction.
pub fn two_classes_defs() -> Vec<ClassDef> {
    let via_other =
        |ctor: &str, other: &str, domain: Domain| Expr::invoke(Expr::alloc(ctor, Some(domain)), other, vec![]);
    vec![
        ClassDef::new("Unmanaged")
            .field("str", "unmanaged")
            .method(MethodDef::expr(
                "newManaged",
                0,
                Expr::alloc("Managed", Some(Domain::Managed)),
            ))
            .method(MethodDef::expr("getString", 0, Expr::lit("unmanaged-got"))),
        ClassDef::new("Managed")
            .field("str", "managed")
            .method(MethodDef::expr(
                "newUnmanaged",
                0,
                Expr::alloc("Unmanaged", Some(Domain::Unmanaged)),
            ))
            .method(MethodDef::expr("getString", 0, Expr::lit("managed-got"))),
        ClassDef::new("TwoClasses")
            .method(MethodDef::expr(
                "test1",
                0,
                Expr::get(via_other("Managed", "newUnmanaged", Domain::Managed), "str"),
            ))
            .method(MethodDef::expr(
                "test2",
                0,
                Expr::get(via_other("Unmanaged", "newManaged", Domain::Unmanaged), "str"),
            ))
            .method(MethodDef::expr(
                "test3",
                0,
                Expr::invoke(via_other("Managed", "newUnmanaged", Domain::Managed), "getString", vec![]),
            ))
            .method(MethodDef::expr(
                "test4",
                0,
                Expr::invoke(via_other("Unmanaged", "newManaged", Domain::Unmanaged), "getString", vec![]),
            )),
    ]
}

pub fn two_classes_hierarchy() -> Hierarchy {
    init_tracing();
    Hierarchy::build(two_classes_defs()).expect("two-classes hierarchy is well formed")
}
