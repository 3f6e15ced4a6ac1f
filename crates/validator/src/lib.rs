//! # sieve-validator
//!
//! Declarative validation and normalization for structured records.
//!
//! Fields carry compact rule chains. The engine compiles a record type once
//! into a cached [`Schema`], then runs each field's validators and filters
//! against live records, collecting [`FieldError`]s and writing normalized
//! values back in place.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sieve_validator::{Record, validate};
//!
//! #[derive(Record)]
//! struct Signup {
//!     #[record(validator = "required|email", filter = "trim|lower")]
//!     email: Option<String>,
//!
//!     #[record(validator = "min(18)|max(65)", label = "Age")]
//!     age: u32,
//!
//!     #[record(validator = "min(1000)", trigger = "update")]
//!     id: u64,
//! }
//!
//! let mut signup = Signup { email: Some("  Ada@Example.com ".into()), age: 16, id: 0 };
//! let result = validate(&mut signup);
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.field_errors()[0].field, "Age");
//! assert_eq!(signup.email.as_deref(), Some("ada@example.com"));
//! ```
//!
//! ## Declarations
//!
//! | Tag         | Meaning                                              |
//! |-------------|------------------------------------------------------|
//! | `validator` | `\|`-separated validators, e.g. `required\|min(3)`   |
//! | `filter`    | `\|`-separated filters, e.g. `trim\|lower`           |
//! | `trigger`   | comma-separated activation triggers (default `all`)  |
//! | `message`   | fixed message replacing every validator message      |
//! | `label`     | display name used in field errors                    |
//! | `flags`     | `allow_zero`: skip the field when null or zero       |
//!
//! Tag names are configurable through [`TagNames`].
//!
//! ## Custom Rules
//!
//! ```rust,ignore
//! use sieve_validator::{ValidatorRule, register_validator};
//!
//! register_validator("even", ValidatorRule::new(|ctx| {
//!     Ok(ctx.value().and_then(|v| v.as_i128()).is_none_or(|n| n % 2 == 0))
//! }))?;
//! sieve_validator::freeze_rules();
//! ```

extern crate self as sieve_validator;

pub mod accessor;
pub mod context;
mod engine;
pub mod error;
mod executor;
pub mod options;
pub mod parser;
pub mod record;
pub mod registry;
pub mod result;
pub mod rules;
pub mod schema;
pub mod value;

pub use accessor::FieldAccessor;
pub use context::ValidationContext;
pub use engine::{Validator, ValidatorBuilder};
pub use error::{CompileError, RegistryError, RuleFault, RuleKind, StructuralError};
pub use options::{OptionsError, TagNames, ValidationOptions};
pub use parser::{ParseError, RuleDeclaration};
pub use record::{FieldAccess, FieldDecl, Record, RecordShape};
pub use registry::{
    Arity, FilterFn, FilterRule, RegistrationPolicy, Rule, RuleRegistry, ValidatorFn,
    ValidatorRule,
};
pub use result::{FieldError, ValidationFailure, ValidationResult};
pub use schema::{FieldFlag, FieldSpec, Schema};
pub use value::{FieldValue, Scalar, Shape, Slot, StoreError, Value, ValueKind};

#[cfg(feature = "derive")]
pub use sieve_validator_macros::Record;

use std::sync::Arc;

/// Validates `record` with the global [`Validator`].
pub fn validate<R: Record>(record: &mut R) -> ValidationResult {
    Validator::global().validate(record)
}

/// Validates `record` with the global [`Validator`], running only fields
/// active for `trigger`.
pub fn validate_for<R: Record>(record: &mut R, trigger: &str) -> ValidationResult {
    Validator::global().validate_for(record, trigger)
}

/// Compiles the schema of `R` with the global [`Validator`].
pub fn compile<R: Record>() -> Result<Arc<Schema>, CompileError> {
    Validator::global().compile::<R>()
}

/// Registers a validator on the global [`Validator`]'s registry.
pub fn register_validator(
    name: impl Into<String>,
    rule: ValidatorRule,
) -> Result<(), RegistryError> {
    Validator::global().register_validator(name, rule)
}

/// Registers a filter on the global [`Validator`]'s registry.
pub fn register_filter(name: impl Into<String>, rule: FilterRule) -> Result<(), RegistryError> {
    Validator::global().register_filter(name, rule)
}

/// Freezes the global [`Validator`]'s registry.
pub fn freeze_rules() {
    Validator::global().registry().freeze();
}
