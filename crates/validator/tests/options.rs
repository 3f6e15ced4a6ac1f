//! Engine options observed through whole validate calls.

mod common;

use common::{fields, isolated, messages};
use pretty_assertions::assert_eq;
use sieve_validator::{
    OptionsError, Record, TagNames, ValidationOptions, Validator, ValidatorRule,
};

#[derive(Record)]
struct Score {
    #[record(validator = "min(5)|max(1)", filter = "clamp(0,3)")]
    points: i32,

    #[record(validator = "max(10)")]
    bonus: i32,
}

#[derive(Record)]
struct Address {
    #[record(validator = "len(5)")]
    zip: String,
}

#[derive(Record)]
struct Customer {
    #[record(nested)]
    address: Address,

    #[record(validator = "required", label = "Customer name")]
    name: Option<String>,
}

#[derive(Record)]
struct Post {
    #[record(validator = "enum(draft,published)")]
    status: String,

    #[record(validator = "min(3)|alpha", message = "pick a proper slug")]
    slug: String,
}

#[derive(Record)]
struct Invoice {
    #[record(validator = "min(100)", flags = "allow_zero")]
    amount: u64,

    #[record(validator = "min(1)", flags = " allow_zero | ")]
    discount: Option<i32>,
}

#[test]
fn stop_on_first_error_keeps_only_the_first_failure_and_skips_filters() {
    let validator = isolated(ValidationOptions::new().with_stop_on_first_error(true));
    let mut score = Score {
        points: 3,
        bonus: 20,
    };

    let result = validator.validate(&mut score);

    assert_eq!(fields(&result), vec!["points", "bonus"]);
    assert_eq!(
        messages(&result),
        vec![
            "points must be greater than or equal to 5",
            "bonus must be less than or equal to 10",
        ]
    );
    assert_eq!(score.points, 3);
}

#[test]
fn all_failures_are_reported_by_default() {
    let validator = isolated(ValidationOptions::default());
    let mut score = Score {
        points: 4,
        bonus: 0,
    };

    let result = validator.validate(&mut score);

    assert_eq!(
        messages(&result),
        vec![
            "points must be greater than or equal to 5",
            "points must be less than or equal to 1",
        ]
    );
    assert_eq!(score.points, 3);
}

#[test]
fn qualified_labels_use_dotted_paths() {
    let validator = isolated(ValidationOptions::new().with_qualified_labels(true));
    let mut customer = Customer {
        address: Address {
            zip: "123".to_owned(),
        },
        name: None,
    };

    let result = validator.validate(&mut customer);

    assert_eq!(fields(&result), vec!["Customer name", "address.zip"]);
}

#[test]
fn bare_labels_by_default() {
    let validator = isolated(ValidationOptions::default());
    let mut customer = Customer {
        address: Address {
            zip: "123".to_owned(),
        },
        name: Some("Ada".to_owned()),
    };

    let result = validator.validate(&mut customer);

    assert_eq!(fields(&result), vec!["zip"]);
    assert_eq!(messages(&result), vec!["zip must be exactly 5 characters long"]);
}

#[test]
fn renamed_tags_are_read_from_their_new_keys() {
    #[derive(Record)]
    struct Renamed {
        #[record(check = "min(2)", name = "Level", validator = "max(0)")]
        level: i32,
    }

    let options = ValidationOptions::new().with_tag_names(TagNames {
        validator: "check".to_owned(),
        label: "name".to_owned(),
        ..TagNames::default()
    });
    let validator = isolated(options);

    let result = validator.validate(&mut Renamed { level: 1 });

    assert_eq!(fields(&result), vec!["Level"]);
    assert_eq!(messages(&result), vec!["Level must be greater than or equal to 2"]);
}

#[test]
fn conflicting_tag_names_are_rejected_at_build() {
    let options = ValidationOptions::new().with_tag_names(TagNames {
        label: "message".to_owned(),
        ..TagNames::default()
    });

    let err = Validator::new(options).unwrap_err();

    assert!(matches!(err, OptionsError::DuplicateTagName { .. }));
}

#[test]
fn allowed_values_are_hidden_unless_exposed() {
    let mut post = Post {
        status: "archived".to_owned(),
        slug: "news".to_owned(),
    };

    let hidden = isolated(ValidationOptions::default()).validate(&mut post);
    let shown = isolated(ValidationOptions::new().with_allowed_values_in_messages(true))
        .validate(&mut post);

    assert_eq!(messages(&hidden), vec!["status must be one of the allowed values"]);
    assert_eq!(messages(&shown), vec!["status must be one of: draft, published"]);
}

#[test]
fn message_tag_replaces_every_failure_message() {
    let validator = isolated(ValidationOptions::default());
    let mut post = Post {
        status: "draft".to_owned(),
        slug: "x1".to_owned(),
    };

    let result = validator.validate(&mut post);

    assert_eq!(
        messages(&result),
        vec!["pick a proper slug", "pick a proper slug"]
    );
}

#[test]
fn default_message_names_the_rule_when_exposed() {
    #[derive(Record)]
    struct Ticket {
        #[record(validator = "never")]
        seat: u32,
    }

    let quiet = isolated(ValidationOptions::default());
    let loud = isolated(ValidationOptions::new().with_rule_names_in_messages(true));
    for validator in [&quiet, &loud] {
        validator
            .register_validator("never", ValidatorRule::new(|_| Ok(false)))
            .unwrap();
    }

    let mut ticket = Ticket { seat: 1 };
    assert_eq!(
        messages(&quiet.validate(&mut ticket)),
        vec!["seat: field validation failed"]
    );
    assert_eq!(
        messages(&loud.validate(&mut ticket)),
        vec!["seat: field validation failed using rule never"]
    );
}

#[test]
fn allow_zero_skips_zero_and_null_values() {
    let validator = isolated(ValidationOptions::default());

    let mut empty = Invoice {
        amount: 0,
        discount: None,
    };
    assert!(validator.validate(&mut empty).is_valid());

    let mut zeroed = Invoice {
        amount: 0,
        discount: Some(0),
    };
    assert!(validator.validate(&mut zeroed).is_valid());

    let mut small = Invoice {
        amount: 5,
        discount: Some(-1),
    };
    assert_eq!(
        fields(&validator.validate(&mut small)),
        vec!["amount", "discount"]
    );
}

#[cfg(feature = "toml")]
#[test]
fn options_load_from_toml() {
    let options = ValidationOptions::from_toml_str(
        r#"
        stop_on_first_error = true
        expose_rule_names_in_default_messages = true

        [tag_names]
        validator = "rules"
        "#,
    )
    .unwrap();

    assert!(options.stop_on_first_error);
    assert!(options.expose_rule_names_in_default_messages);
    assert_eq!(options.tag_names.validator, "rules");
    assert_eq!(options.tag_names.filter, "filter");
}

#[cfg(feature = "toml")]
#[test]
fn toml_with_empty_tag_name_is_rejected() {
    let err = ValidationOptions::from_toml_str("[tag_names]\nfilter = \"\"").unwrap_err();
    assert!(matches!(err, OptionsError::EmptyTagName { channel: "filter" }));
}
