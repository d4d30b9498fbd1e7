use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use vdisp_core::{ClassDef, Dispatcher, Domain, Expr, Hierarchy, InstanceStore, MethodDef, Signature};

// C0 declares `level` and nothing below overrides it, so a leaf call goes
// through an entry inherited across the whole chain.
fn build_chain(depth: usize) -> Hierarchy {
    let defs = (0..depth).map(|i| {
        let def = ClassDef::new(format!("C{}", i)).field(format!("f{}", i), i as i64);
        let def = if i == 0 {
            def.method(MethodDef::expr("level", 0, Expr::lit(0i64)))
        } else {
            def.extends(format!("C{}", i - 1))
        };
        def.method(MethodDef::expr(format!("own{}", i), 0, Expr::get(Expr::This, format!("f{}", i))))
    });
    Hierarchy::build(defs).unwrap()
}

fn bench_deep_chain_dispatch(c: &mut Criterion) {
    let hierarchy = build_chain(64);
    let store = InstanceStore::new();
    let dispatcher = Dispatcher::new(&hierarchy, &store);
    let leaf = dispatcher.allocate("C63", Domain::Managed).unwrap();
    let as_root = dispatcher.reference(leaf, "C0").unwrap();
    let level = Signature::new("level", 0);

    c.bench_function("dispatch_inherited_64_levels", |b| {
        b.iter(|| {
            let result = dispatcher.invoke(black_box(&as_root), &level, &[]).unwrap();
            black_box(result);
        })
    });

    let exact = dispatcher.exact_reference(leaf).unwrap();
    let own = Signature::new("own63", 0);
    c.bench_function("dispatch_field_read_body", |b| {
        b.iter(|| {
            let result = dispatcher.invoke(black_box(&exact), &own, &[]).unwrap();
            black_box(result);
        })
    });
}

fn bench_hierarchy_build(c: &mut Criterion) {
    c.bench_function("build_hierarchy_64_levels", |b| {
        b.iter(|| black_box(build_chain(64)));
    });
}

criterion_group!(benches, bench_deep_chain_dispatch, bench_hierarchy_build);
criterion_main!(benches);
