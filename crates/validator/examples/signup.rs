//! Signup form validation with sieve-validator

use sieve_validator::{Record, ValidationOptions, Validator, ValidatorRule};

#[derive(Debug, Record)]
struct Address {
    #[record(validator = "required|len(5)|numeric", label = "ZIP code")]
    zip: Option<String>,
}

#[derive(Debug, Record)]
struct Signup {
    #[record(validator = "required|email", filter = "trim|lower")]
    email: Option<String>,

    #[record(validator = "min(18)|max(130)", label = "Age")]
    age: u32,

    #[record(validator = "even", trigger = "update")]
    revision: u64,

    #[record(nested)]
    address: Address,
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let validator = Validator::new(ValidationOptions::new().with_qualified_labels(true))
        .expect("default tag names are valid");
    validator
        .register_validator(
            "even",
            ValidatorRule::new(|ctx| {
                let n = ctx.value().and_then(|v| v.as_i128());
                Ok(n.is_none_or(|n| n % 2 == 0))
            }),
        )
        .expect("`even` is not a built-in");
    validator.registry().freeze();

    if let Err(e) = validator.compile::<Signup>() {
        eprintln!("✗ Broken schema: {e}");
        return;
    }

    let mut signup = Signup {
        email: Some("  Ada@Example.com".to_owned()),
        age: 16,
        revision: 3,
        address: Address {
            zip: Some("12a45".to_owned()),
        },
    };

    let result = validator.validate_for(&mut signup, "create");
    for error in result.field_errors() {
        println!("✗ {error}");
    }
    println!("email after filters: {:?}", signup.email);

    let result = validator.validate_for(&mut signup, "update");
    match result.to_json() {
        Ok(json) => println!("\n{json:#}"),
        Err(e) => println!("✗ Error: {e}"),
    }
}
