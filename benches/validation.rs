use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use intake::domain::{CustomField, FormSchema};
use intake::form::FieldRegistry;

fn schema(custom_fields: usize) -> FormSchema {
    FormSchema {
        name: "bench".to_string(),
        company_name: "Acme".to_string(),
        description: String::new(),
        fields: (0..custom_fields)
            .map(|i| CustomField::new(format!("field_{}", i)))
            .collect(),
    }
}

fn benchmark_build_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_registry");
    for n in [0, 10, 100] {
        let schema = schema(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &schema, |b, schema| {
            b.iter(|| FieldRegistry::for_schema(black_box(schema)));
        });
    }
    group.finish();
}

fn benchmark_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    for n in [0, 10, 100] {
        let registry = FieldRegistry::for_schema(&schema(n));
        let mut draft = registry.empty_draft();
        draft.set("name", "Alice");
        draft.set("phoneNumber", "+15551234567");
        draft.set("emailAddress", "alice@example.com");

        group.bench_with_input(BenchmarkId::from_parameter(n), &draft, |b, draft| {
            b.iter(|| registry.validate(black_box(draft)));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_build_registry, benchmark_validate);
criterion_main!(benches);
