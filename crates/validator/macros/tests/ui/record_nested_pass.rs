use sieve_validator::{FieldAccess, Record, RuleRegistry, Validator};
use std::sync::Arc;

#[derive(Record)]
struct Address {
    #[record(validator = "required")]
    city: Option<String>,
}

#[derive(Record)]
struct Customer {
    #[record(nested)]
    address: Address,

    #[record(filter = "trim")]
    name: String,
}

#[derive(Record)]
struct Envelope<T: Record> {
    #[record(nested)]
    body: T,
}

fn main() {
    let shape = Customer::shape();
    assert!(matches!(shape.fields[0].access, FieldAccess::Nested(_)));

    let validator = Validator::builder()
        .registry(Arc::new(RuleRegistry::with_builtins()))
        .build()
        .unwrap();

    let mut envelope = Envelope {
        body: Customer {
            address: Address { city: None },
            name: "  Ada ".to_owned(),
        },
    };
    let result = validator.validate(&mut envelope);
    assert!(!result.is_valid());
    assert_eq!(envelope.body.name, "Ada");
}
