//! End-to-end validation of derived records.

mod common;

use common::{fields, isolated, messages};
use pretty_assertions::assert_eq;
use sieve_validator::schema::SchemaCompiler;
use sieve_validator::{Record, RuleRegistry, StructuralError, ValidationOptions};

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Record)]
struct Person {
    #[record(validator = "min(18)|max(65)")]
    age: i64,
}

#[derive(Record)]
struct Greeting {
    #[record(filter = "trim")]
    name: Option<String>,
}

#[derive(Record)]
struct Entity {
    #[record(validator = "min(1000)", trigger = "update")]
    id: i64,
}

#[derive(Record)]
struct Inner {
    #[record(validator = "min(18)")]
    age: i32,
}

#[derive(Record)]
struct Outer {
    #[record(nested)]
    inner: Inner,

    #[record(validator = "min(10)")]
    bar: i32,
}

#[derive(Record)]
struct Nickname {
    #[record(validator = "min(10)", filter = "trim")]
    nick: String,
}

#[derive(Record)]
struct Contact {
    #[record(validator = "required|email", filter = "trim|lower")]
    email: Option<String>,

    #[record(validator = "min(3)", trigger = "create, update")]
    handle: String,

    #[record(validator = "required")]
    phone: Option<String>,
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn below_minimum_reports_one_error() {
    let validator = isolated(ValidationOptions::default());
    let mut person = Person { age: 16 };

    let result = validator.validate(&mut person);

    assert!(!result.is_valid());
    assert_eq!(fields(&result), vec!["age"]);
    assert_eq!(messages(&result), vec!["age must be greater than or equal to 18"]);
}

#[test]
fn filter_trims_optional_string_in_place() {
    let validator = isolated(ValidationOptions::default());
    let mut greeting = Greeting {
        name: Some(" hi ".to_owned()),
    };

    let result = validator.validate(&mut greeting);

    assert!(result.is_valid());
    assert_eq!(greeting.name.as_deref(), Some("hi"));
}

#[test]
fn update_only_field_is_excluded_on_create() {
    let validator = isolated(ValidationOptions::default());
    let mut entity = Entity { id: 0 };

    assert!(validator.validate_for(&mut entity, "create").is_valid());
}

#[test]
fn update_only_field_runs_on_update() {
    let validator = isolated(ValidationOptions::default());
    let mut entity = Entity { id: 0 };

    let result = validator.validate_for(&mut entity, "update");

    assert_eq!(fields(&result), vec!["id"]);
}

#[test]
fn update_only_field_is_excluded_by_default_trigger() {
    let validator = isolated(ValidationOptions::default());
    let mut entity = Entity { id: 0 };

    assert!(validator.validate(&mut entity).is_valid());
    assert!(validator.validate_for(&mut entity, "  ").is_valid());
}

#[test]
fn nested_fields_are_validated() {
    let validator = isolated(ValidationOptions::default());
    let mut outer = Outer {
        inner: Inner { age: 10 },
        bar: 15,
    };

    let result = validator.validate(&mut outer);

    assert_eq!(fields(&result), vec!["age"]);
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn compiling_twice_yields_equal_schemas() {
    let registry = RuleRegistry::with_builtins();
    let options = ValidationOptions::default();
    let compiler = SchemaCompiler::new(&registry, &options);

    let first = compiler.compile::<Outer>().unwrap();
    let second = compiler.compile::<Outer>().unwrap();

    assert_eq!(first, second);
    let paths: Vec<_> = first.fields().iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["bar", "inner.age"]);
}

#[test]
fn cached_schema_is_shared() {
    let validator = isolated(ValidationOptions::default());

    let first = validator.compile::<Contact>().unwrap();
    let second = validator.compile::<Contact>().unwrap();

    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(validator.cache().len(), 1);
}

#[test]
fn required_blocks_null_with_one_error() {
    let validator = isolated(ValidationOptions::default());
    let mut contact = Contact {
        email: None,
        handle: "ada".to_owned(),
        phone: None,
    };

    let result = validator.validate(&mut contact);

    assert_eq!(fields(&result), vec!["email", "phone"]);
    assert_eq!(messages(&result), vec!["email is required", "phone is required"]);
}

#[test]
fn filters_run_after_failing_validator() {
    let validator = isolated(ValidationOptions::default());
    let mut nickname = Nickname {
        nick: "  ada  ".to_owned(),
    };

    let result = validator.validate(&mut nickname);

    assert!(!result.is_valid());
    assert_eq!(nickname.nick, "ada");
}

#[test]
fn filter_chain_sees_previous_output() {
    let validator = isolated(ValidationOptions::default());
    let mut contact = Contact {
        email: Some("Ada@Example.COM".to_owned()),
        handle: "ada".to_owned(),
        phone: Some("555".to_owned()),
    };

    let result = validator.validate(&mut contact);

    assert!(result.is_valid(), "{result}");
    assert_eq!(contact.email.as_deref(), Some("ada@example.com"));
}

#[test]
fn validators_see_the_unfiltered_value() {
    let validator = isolated(ValidationOptions::default());
    let mut contact = Contact {
        email: Some(" ada@example.com".to_owned()),
        handle: "ada".to_owned(),
        phone: Some("555".to_owned()),
    };

    let result = validator.validate(&mut contact);

    assert_eq!(fields(&result), vec!["email"]);
    assert_eq!(contact.email.as_deref(), Some("ada@example.com"));
}

#[test]
fn trigger_list_entries_are_trimmed() {
    let validator = isolated(ValidationOptions::default());
    let mut contact = Contact {
        email: Some("ada@example.com".to_owned()),
        handle: "x".to_owned(),
        phone: Some("555".to_owned()),
    };

    assert_eq!(fields(&validator.validate_for(&mut contact, "update")), vec!["handle"]);
    assert_eq!(fields(&validator.validate_for(&mut contact, "create")), vec!["handle"]);
    assert!(validator.validate_for(&mut contact, "delete").is_valid());
}

#[test]
fn result_serializes_to_json() {
    let validator = isolated(ValidationOptions::default());
    let mut person = Person { age: 70 };

    let json = validator.validate(&mut person).to_json().unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "valid": false,
            "structural_error": null,
            "field_errors": [
                { "field": "age", "message": "age must be less than or equal to 65" }
            ],
        })
    );
}

#[test]
fn structural_error_is_never_a_field_error() {
    #[derive(Record)]
    struct Broken {
        #[record(validator = "no_such_rule")]
        value: i32,
    }

    let validator = isolated(ValidationOptions::default());
    let result = validator.validate(&mut Broken { value: 1 });

    assert!(!result.is_valid());
    assert!(result.field_errors().is_empty());
    assert!(matches!(
        result.structural_error(),
        Some(StructuralError::Compile(_))
    ));
}

#[test]
fn raw_identifier_fields_use_the_plain_name() {
    #[derive(Record)]
    struct Token {
        #[record(validator = "min(3)")]
        r#type: String,
    }

    let validator = isolated(ValidationOptions::default());
    let result = validator.validate(&mut Token {
        r#type: "x".to_owned(),
    });

    assert_eq!(fields(&result), vec!["type"]);
    assert_eq!(messages(&result), vec!["type must be at least 3 characters long"]);
}

#[test]
fn string_arguments_keep_leading_whitespace() {
    #[derive(Record)]
    struct Indented {
        #[record(validator = "starts_with( x)")]
        line: String,
    }

    let validator = isolated(ValidationOptions::default());

    assert!(validator.validate(&mut Indented { line: " x = 1".to_owned() }).is_valid());
    assert_eq!(
        fields(&validator.validate(&mut Indented { line: "x = 1".to_owned() })),
        vec!["line"]
    );
}
