// Schema compilation and execution benchmarks
// Run with: cargo bench -p sieve-validator

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use sieve_validator::schema::SchemaCompiler;
use sieve_validator::{Record, RuleRegistry, ValidationOptions, Validator};

#[derive(Record)]
struct Address {
    #[record(validator = "required|len(5)|numeric")]
    zip: Option<String>,

    #[record(validator = "required|min(2)", filter = "trim")]
    city: Option<String>,
}

#[derive(Record)]
struct Signup {
    #[record(validator = "required|email", filter = "trim|lower")]
    email: Option<String>,

    #[record(validator = "min(18)|max(130)")]
    age: u32,

    #[record(validator = "enum(free,pro,team)")]
    plan: String,

    #[record(validator = "min(1000)", trigger = "update")]
    id: u64,

    #[record(nested)]
    address: Address,
}

fn signup() -> Signup {
    Signup {
        email: Some("ada@example.com".to_owned()),
        age: 36,
        plan: "pro".to_owned(),
        id: 0,
        address: Address {
            zip: Some("12345".to_owned()),
            city: Some("London".to_owned()),
        },
    }
}

/// Benchmark compiling a nested schema from scratch
fn bench_compile(c: &mut Criterion) {
    let registry = RuleRegistry::with_builtins();
    let options = ValidationOptions::default();
    let compiler = SchemaCompiler::new(&registry, &options);

    c.bench_function("compile_nested_schema", |b| {
        b.iter(|| black_box(compiler.compile::<Signup>()));
    });
}

/// Benchmark validating against a cached schema (hot path)
fn bench_validate(c: &mut Criterion) {
    let validator = Validator::builder()
        .registry(Arc::new(RuleRegistry::with_builtins()))
        .build()
        .expect("default options are valid");
    validator.compile::<Signup>().expect("schema compiles");

    c.bench_function("validate_valid_record", |b| {
        b.iter(|| {
            let mut record = signup();
            black_box(validator.validate(black_box(&mut record)))
        });
    });

    c.bench_function("validate_invalid_record", |b| {
        b.iter(|| {
            let mut record = signup();
            record.age = 12;
            record.email = None;
            black_box(validator.validate_for(black_box(&mut record), "update"))
        });
    });
}

criterion_group!(benches, bench_compile, bench_validate);
criterion_main!(benches);
