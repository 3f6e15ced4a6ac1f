//! Per-invocation rule context.

use std::str::FromStr;

use crate::error::RuleFault;
use crate::options::ValidationOptions;
use crate::value::{Shape, Value, ValueKind};

/// Everything a single validator or filter call can see.
///
/// A fresh context is built for every rule invocation. Null has already been
/// determined when the rule runs: [`value`](Self::value) is `None` for an
/// empty optional field. By convention a rule treats null as "not provided"
/// and passes (validators) or returns it unchanged (filters); only `required`
/// rejects it.
///
/// # Examples
///
/// ```rust,ignore
/// use sieve_validator::{RuleFault, ValidationContext};
///
/// fn even(ctx: &mut ValidationContext<'_>) -> Result<bool, RuleFault> {
///     let Some(value) = ctx.value() else { return Ok(true) };
///     let n = value.as_i128().ok_or_else(|| ctx.unsupported())?;
///     if n % 2 != 0 {
///         ctx.set_message(format!("{} must be even", ctx.label()));
///     }
///     Ok(n % 2 == 0)
/// }
/// ```
#[derive(Debug)]
pub struct ValidationContext<'a> {
    value: Option<&'a Value>,
    kind: ValueKind,
    shape: Shape,
    args: &'a [String],
    options: &'a ValidationOptions,
    rule: &'a str,
    label: &'a str,
    message: Option<String>,
}

impl<'a> ValidationContext<'a> {
    /// Creates a context for a value of the given kind and shape.
    pub fn new(
        value: Option<&'a Value>,
        kind: ValueKind,
        shape: Shape,
        args: &'a [String],
        options: &'a ValidationOptions,
    ) -> Self {
        Self {
            value,
            kind,
            shape,
            args,
            options,
            rule: "",
            label: "",
            message: None,
        }
    }

    /// Sets the name of the rule being invoked.
    #[must_use]
    pub fn with_rule(mut self, rule: &'a str) -> Self {
        self.rule = rule;
        self
    }

    /// Sets the field label used in messages.
    #[must_use]
    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    // ========================================================================
    // Value
    // ========================================================================

    /// The field's current value; `None` when null.
    #[must_use]
    pub fn value(&self) -> Option<&'a Value> {
        self.value
    }

    /// Whether the value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Whether the field can hold a null.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.shape.is_nullable()
    }

    /// Element kind of the field.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Wrapper shape of the field.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Fault for a value this rule cannot handle.
    #[must_use]
    pub fn unsupported(&self) -> RuleFault {
        RuleFault::UnsupportedKind {
            rule: self.rule.to_owned(),
            found: self.value.map_or(self.kind.as_str(), Value::type_label),
        }
    }

    // ========================================================================
    // Arguments
    // ========================================================================

    /// All static arguments.
    #[must_use]
    pub fn args(&self) -> &'a [String] {
        self.args
    }

    /// Number of static arguments.
    #[must_use]
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Raw argument at `index`.
    pub fn arg(&self, index: usize) -> Result<&'a str, RuleFault> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| RuleFault::MissingArgument {
                rule: self.rule.to_owned(),
                index,
            })
    }

    /// Parses the argument at `index`.
    ///
    /// `expected` names the target in the fault, e.g. `"number"`.
    pub fn parse_arg<T: FromStr>(
        &self,
        index: usize,
        expected: &'static str,
    ) -> Result<T, RuleFault> {
        let raw = self.arg(index)?;
        raw.trim().parse().map_err(|_| RuleFault::BadArgument {
            rule: self.rule.to_owned(),
            index,
            value: raw.to_owned(),
            expected,
        })
    }

    /// Argument at `index` as a number.
    pub fn number_arg(&self, index: usize) -> Result<f64, RuleFault> {
        self.parse_arg(index, "number")
    }

    /// Argument at `index` as a count or length.
    pub fn count_arg(&self, index: usize) -> Result<usize, RuleFault> {
        self.parse_arg(index, "non-negative integer")
    }

    // ========================================================================
    // Environment
    // ========================================================================

    /// Engine-wide options.
    #[must_use]
    pub fn options(&self) -> &'a ValidationOptions {
        self.options
    }

    /// Name the rule was invoked under.
    #[must_use]
    pub fn rule_name(&self) -> &'a str {
        self.rule
    }

    /// Display label of the field.
    #[must_use]
    pub fn label(&self) -> &'a str {
        self.label
    }

    // ========================================================================
    // Message
    // ========================================================================

    /// Sets the message reported if this validator fails.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// The message set so far, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub(crate) fn take_message(&mut self) -> Option<String> {
        self.message.take().filter(|m| !m.is_empty())
    }
}
