//! Validation outcome and error aggregation.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::StructuralError;

// ============================================================================
// FIELD ERROR
// ============================================================================

/// One failing validator on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field label.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

/// Outcome of one validate call.
///
/// Valid iff there is no structural error and no field error. Field errors
/// keep schema order, and rule order within a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    structural_error: Option<StructuralError>,
    field_errors: Vec<FieldError>,
}

impl ValidationResult {
    /// A passing result.
    #[must_use]
    pub fn valid() -> Self {
        Self::default()
    }

    /// A result aborted by a structural error. Field errors gathered before
    /// the abort are kept.
    #[must_use]
    pub fn structural(error: StructuralError, field_errors: Vec<FieldError>) -> Self {
        Self {
            structural_error: Some(error),
            field_errors,
        }
    }

    /// A result carrying only field errors.
    #[must_use]
    pub fn from_field_errors(field_errors: Vec<FieldError>) -> Self {
        Self {
            structural_error: None,
            field_errors,
        }
    }

    /// Whether the record passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.structural_error.is_none() && self.field_errors.is_empty()
    }

    /// The structural error, if the call was aborted.
    #[must_use]
    pub fn structural_error(&self) -> Option<&StructuralError> {
        self.structural_error.as_ref()
    }

    /// Field errors in order.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// Field errors reported under `field`.
    pub fn errors_for<'s>(&'s self, field: &'s str) -> impl Iterator<Item = &'s FieldError> {
        self.field_errors.iter().filter(move |e| e.field == field)
    }

    /// Consumes the result, converting it into a `Result`.
    ///
    /// A structural error takes precedence over field errors.
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        match self.structural_error {
            Some(error) => Err(ValidationFailure::Structural(error)),
            None if self.field_errors.is_empty() => Ok(()),
            None => Err(ValidationFailure::Invalid(self.field_errors)),
        }
    }

    /// Renders the result as JSON.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 3)?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field(
            "structural_error",
            &self.structural_error.as_ref().map(ToString::to_string),
        )?;
        state.serialize_field("field_errors", &self.field_errors)?;
        state.end()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.structural_error {
            return write!(f, "structural error: {error}");
        }
        if self.field_errors.is_empty() {
            return f.write_str("valid");
        }
        for (i, error) in self.field_errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// A failed [`ValidationResult`] as an error value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    /// The record or its schema is broken.
    #[error(transparent)]
    Structural(StructuralError),

    /// One or more validators rejected the record.
    #[error("{} field error(s), first: {}", .0.len(), .0.first().map_or("", |e| e.message.as_str()))]
    Invalid(Vec<FieldError>),
}

// ============================================================================
// AGGREGATOR
// ============================================================================

/// Collects field errors across a validate call.
#[derive(Debug, Default)]
pub(crate) struct Aggregator {
    errors: Vec<FieldError>,
}

impl Aggregator {
    pub(crate) fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn finish(self) -> ValidationResult {
        ValidationResult::from_field_errors(self.errors)
    }

    pub(crate) fn abort(self, error: StructuralError) -> ValidationResult {
        ValidationResult::structural(error, self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_result_is_valid() {
        let result = ValidationResult::valid();
        assert!(result.is_valid());
        assert_eq!(result.to_string(), "valid");
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn structural_error_invalidates_without_field_errors() {
        let error = StructuralError::from(CompileError::EmptyTriggers {
            record: "app::Job",
            field: "id".into(),
        });
        let result = ValidationResult::structural(error, Vec::new());
        assert!(!result.is_valid());
        assert!(result.field_errors().is_empty());
        assert!(matches!(result.into_result(), Err(ValidationFailure::Structural(_))));
    }

    #[test]
    fn serializes_with_valid_flag() {
        let result = ValidationResult::from_field_errors(vec![FieldError::new("Age", "too young")]);
        assert_eq!(
            result.to_json().unwrap(),
            serde_json::json!({
                "valid": false,
                "structural_error": null,
                "field_errors": [{ "field": "Age", "message": "too young" }],
            })
        );
    }

    #[test]
    fn errors_for_filters_by_label() {
        let result = ValidationResult::from_field_errors(vec![
            FieldError::new("a", "1"),
            FieldError::new("b", "2"),
            FieldError::new("a", "3"),
        ]);
        let messages: Vec<_> = result.errors_for("a").map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["1", "3"]);
    }
}
