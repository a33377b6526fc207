use criterion::{Criterion, criterion_group, criterion_main};
use flag_context::{AttributeRef, Context, ContextKind, Value, json};
use std::hint::black_box;

fn sample_context() -> Context {
    Context::builder("user-key")
        .name("Alice")
        .set("email", "alice@example.com")
        .set(
            "address",
            Value::object_from([("street", "Main St"), ("city", "Springfield")]),
        )
        .set("groups", Value::array_of(["beta", "admin", "ops"]))
        .private_attributes(["email"])
        .build()
}

fn benchmark_attribute_ref_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("attribute_ref");

    group.bench_function("literal_interned", |b| {
        b.iter(|| black_box(AttributeRef::from_literal(black_box("email"))))
    });

    group.bench_function("path_three_components", |b| {
        b.iter(|| black_box(AttributeRef::from_path(black_box("/address/street~1line/0"))))
    });

    group.finish();
}

fn benchmark_context_lookup(c: &mut Criterion) {
    let context = sample_context();
    let nested = AttributeRef::from_path("/groups/1");
    let top = AttributeRef::from_literal("email");

    c.bench_function("get_value_by_ref_nested", |b| {
        b.iter(|| black_box(context.get_value_by_ref(black_box(&nested))))
    });

    c.bench_function("get_value_by_ref_top_level", |b| {
        b.iter(|| black_box(context.get_value_by_ref(black_box(&top))))
    });
}

fn benchmark_context_construction(c: &mut Criterion) {
    let user = sample_context();
    let org = Context::create_with_kind(ContextKind::of("org"), "org-key");
    let device = Context::create_with_kind(ContextKind::of("device"), "device key");

    c.bench_function("build_single", |b| b.iter(|| black_box(sample_context())));

    c.bench_function("create_multi_three_kinds", |b| {
        b.iter(|| {
            let multi = Context::create_multi(black_box(&[user.clone(), org.clone(), device.clone()]));
            black_box(multi.fully_qualified_key().len())
        })
    });
}

fn benchmark_serialization(c: &mut Criterion) {
    let context = sample_context();
    let text = json::serialize(&context).unwrap();

    let mut group = c.benchmark_group("context_json");

    group.bench_function("serialize", |b| {
        b.iter(|| black_box(json::serialize(black_box(&context)).unwrap()))
    });

    group.bench_function("deserialize", |b| {
        b.iter(|| black_box(json::deserialize::<Context>(black_box(&text)).unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_attribute_ref_parsing,
    benchmark_context_lookup,
    benchmark_context_construction,
    benchmark_serialization
);
criterion_main!(benches);
