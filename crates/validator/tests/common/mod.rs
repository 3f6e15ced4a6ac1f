use std::sync::Arc;

use sieve_validator::{RuleRegistry, ValidationOptions, Validator};

/// A validator on its own registry, so tests never share registrations.
pub fn isolated(options: ValidationOptions) -> Validator {
    Validator::builder()
        .registry(Arc::new(RuleRegistry::with_builtins()))
        .options(options)
        .build()
        .expect("valid options")
}

#[allow(dead_code)]
pub fn messages(result: &sieve_validator::ValidationResult) -> Vec<&str> {
    result
        .field_errors()
        .iter()
        .map(|e| e.message.as_str())
        .collect()
}

#[allow(dead_code)]
pub fn fields(result: &sieve_validator::ValidationResult) -> Vec<&str> {
    result
        .field_errors()
        .iter()
        .map(|e| e.field.as_str())
        .collect()
}
