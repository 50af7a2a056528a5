//! Validation engine benchmarks
//!
//! Measures rule normalization, registry dispatch and full validation runs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use formrule::{FieldData, RuleRegistry, RuleSpec, Validator};

const NO_MESSAGES: [(&str, &str); 0] = [];

fn form(fields: usize) -> (FieldData, RuleSpec) {
    let mut data = FieldData::new();
    let mut rules = RuleSpec::new();
    for i in 0..fields {
        let field = format!("field_{i}");
        data.insert(field.clone(), vec![format!("{}", i + 1)]);
        rules.insert(field, ["required", "int", "gte:1", "max:100000"]);
    }
    (data, rules)
}

/// Benchmark turning rule documents into a normalized spec
fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    group.bench_function("pipes", |b| {
        b.iter(|| {
            RuleSpec::from_pipes(black_box([
                ("name", "required|min:2|max:32"),
                ("email", "required|email"),
                ("age", "nullable|int|gte:18"),
            ]))
        })
    });

    group.bench_function("json", |b| {
        let value = serde_json::json!({
            "name": "required|min:2|max:32",
            "email": ["required", "email"],
            "age": "nullable|int|gte:18",
        });
        b.iter(|| RuleSpec::from_json(black_box(&value)).unwrap())
    });

    group.finish();
}

/// Benchmark rule name resolution
fn bench_resolve(c: &mut Criterion) {
    let registry = RuleRegistry::builtin();
    c.bench_function("resolve_builtin", |b| {
        b.iter(|| registry.resolve(black_box("numeric")).is_some())
    });
}

/// Benchmark full validation runs by form size
fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    let validator = Validator::builtin();

    for fields in [1, 10, 50] {
        let (data, rules) = form(fields);
        group.bench_with_input(BenchmarkId::new("passing", fields), &fields, |b, _| {
            b.iter(|| validator.validate(black_box(&data), &rules, NO_MESSAGES).unwrap())
        });
    }

    let (mut data, rules) = form(10);
    data.insert("field_3".to_string(), vec!["abc".to_string()]);
    group.bench_function("failing_with_messages", |b| {
        b.iter(|| {
            validator
                .validate(
                    black_box(&data),
                    &rules,
                    [("field_3", "field 3 is wrong"), ("field_3.int", "whole numbers")],
                )
                .unwrap()
        })
    });

    data.remove("field_7");
    group.bench_function("missing_field", |b| {
        b.iter(|| validator.validate(black_box(&data), &rules, NO_MESSAGES).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_resolve, bench_validate);
criterion_main!(benches);
