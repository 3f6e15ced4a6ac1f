//! Rule-chain execution against a live record.

use std::any::Any;

use crate::accessor::FieldAccessor;
use crate::context::ValidationContext;
use crate::error::StructuralError;
use crate::options::ValidationOptions;
use crate::result::{Aggregator, FieldError};
use crate::schema::{BoundValidator, FieldFlag, FieldSpec};

/// Runs compiled field specs against one record instance.
pub(crate) struct Executor<'a> {
    record: &'static str,
    options: &'a ValidationOptions,
}

impl<'a> Executor<'a> {
    pub(crate) fn new(record: &'static str, options: &'a ValidationOptions) -> Self {
        Self { record, options }
    }

    /// Runs one field: validators in order, then every filter in order.
    ///
    /// Validation failures are pushed onto `errors`. Faults, store failures
    /// and unresolvable fields abort with a structural error.
    pub(crate) fn run_field(
        &self,
        spec: &FieldSpec,
        root: &mut (dyn Any + 'static),
        errors: &mut Aggregator,
    ) -> Result<(), StructuralError> {
        let slot = spec.resolve(root).ok_or_else(|| StructuralError::Unreachable {
            record: self.record,
            field: spec.path.clone(),
        })?;
        let mut accessor = FieldAccessor::new(slot, spec.kind, spec.shape);
        let mut current = accessor.load();

        if spec.has_flag(FieldFlag::AllowZero)
            && current.as_ref().is_none_or(|value| spec.is_zero(value))
        {
            tracing::trace!(field = %spec.path, "zero value skipped");
            return Ok(());
        }

        for validator in &spec.validators {
            let mut ctx = ValidationContext::new(
                current.as_ref(),
                spec.kind,
                spec.shape,
                &validator.args,
                self.options,
            )
            .with_rule(&validator.name)
            .with_label(&spec.label);

            let passed =
                (validator.rule.func())(&mut ctx).map_err(|source| StructuralError::Rule {
                    field: spec.path.clone(),
                    source,
                })?;

            if !passed {
                let message = self.message_for(spec, validator, ctx.take_message());
                errors.push(FieldError::new(spec.label.clone(), message));
                if self.options.stop_on_first_error {
                    return Ok(());
                }
            }
        }

        for filter in &spec.filters {
            let output = {
                let mut ctx = ValidationContext::new(
                    current.as_ref(),
                    spec.kind,
                    spec.shape,
                    &filter.args,
                    self.options,
                )
                .with_rule(&filter.name)
                .with_label(&spec.label);

                (filter.rule.func())(&mut ctx).map_err(|source| StructuralError::Rule {
                    field: spec.path.clone(),
                    source,
                })?
            };

            if current.is_none() && output.is_some() {
                return Err(StructuralError::NullFabricated {
                    field: spec.path.clone(),
                    filter: filter.name.clone(),
                });
            }

            accessor.store(output).map_err(|source| StructuralError::Store {
                field: spec.path.clone(),
                filter: filter.name.clone(),
                source,
            })?;
            current = accessor.load();
        }

        Ok(())
    }

    /// Message priority: fixed template, then the rule's own message, then a
    /// generated default.
    fn message_for(
        &self,
        spec: &FieldSpec,
        validator: &BoundValidator,
        own: Option<String>,
    ) -> String {
        if let Some(template) = &spec.message {
            return template.clone();
        }
        if let Some(message) = own {
            return message;
        }
        let mut message = format!("{}: field validation failed", spec.label);
        if self.options.expose_rule_names_in_default_messages {
            message.push_str(" using rule ");
            message.push_str(&validator.name);
        }
        message
    }
}
