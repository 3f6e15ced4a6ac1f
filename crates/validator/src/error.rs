//! Error types.
//!
//! The engine keeps three kinds of failure apart:
//!
//! - **Structural errors** ([`CompileError`], [`RuleFault`], [`StructuralError`]):
//!   the schema or a rule is broken. They abort compilation or the current
//!   validate call and never appear among field errors.
//! - **Validation failures** ([`FieldError`](crate::FieldError)): a rule rejected
//!   a value. Always collected, never fatal.
//! - **Rule-internal errors** (for example a date that fails to parse): folded
//!   into the failing rule's message by the rule itself.
//!
//! [`RegistryError`] covers misuse of the rule registry.

use std::fmt;

use crate::parser::ParseError;
use crate::registry::Arity;
use crate::value::{StoreError, ValueKind};

/// Which registry partition a rule lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Returns pass/fail.
    Validator,
    /// Returns a replacement value.
    Filter,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Validator => "validator",
            Self::Filter => "filter",
        })
    }
}

// ============================================================================
// COMPILE ERROR
// ============================================================================

/// A record's declarations cannot be compiled into a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A rule chain is malformed.
    #[error("{record}.{field}: malformed {kind} declaration: {source}")]
    Declaration {
        /// Record type name.
        record: &'static str,
        /// Qualified field path.
        field: String,
        /// Channel the declaration was read from.
        kind: RuleKind,
        /// Parser diagnostic.
        #[source]
        source: ParseError,
    },

    /// A declaration names a rule the registry does not know.
    #[error("{kind} `{name}` referenced by {record}.{field} is not registered")]
    UnknownRule {
        /// Record type name.
        record: &'static str,
        /// Qualified field path.
        field: String,
        /// Partition that was searched.
        kind: RuleKind,
        /// Unknown rule name.
        name: String,
    },

    /// A rule was declared with the wrong number of arguments.
    #[error("{kind} `{name}` on {record}.{field} takes {expected} argument(s), got {found}")]
    Arity {
        /// Record type name.
        record: &'static str,
        /// Qualified field path.
        field: String,
        /// Rule partition.
        kind: RuleKind,
        /// Rule name.
        name: String,
        /// Accepted argument counts.
        expected: Arity,
        /// Declared argument count.
        found: usize,
    },

    /// A rule cannot handle the field's value kind.
    #[error("{kind} `{name}` does not support {value_kind} fields ({record}.{field})")]
    UnsupportedKind {
        /// Record type name.
        record: &'static str,
        /// Qualified field path.
        field: String,
        /// Rule partition.
        kind: RuleKind,
        /// Rule name.
        name: String,
        /// The field's element kind.
        value_kind: ValueKind,
    },

    /// The flags channel names an unknown flag.
    #[error("unknown flag `{flag}` on {record}.{field}")]
    UnknownFlag {
        /// Record type name.
        record: &'static str,
        /// Qualified field path.
        field: String,
        /// Unrecognised flag.
        flag: String,
    },

    /// The trigger channel is present but lists no triggers.
    #[error("empty trigger list on {record}.{field}")]
    EmptyTriggers {
        /// Record type name.
        record: &'static str,
        /// Qualified field path.
        field: String,
    },

    /// A nested record field carries a rule tag, which only leaf fields use.
    #[error("`{tag}` tag on nested record field {record}.{field}")]
    TagOnNested {
        /// Record type name.
        record: &'static str,
        /// Qualified field path.
        field: String,
        /// Offending tag key.
        tag: String,
    },
}

// ============================================================================
// RULE FAULT
// ============================================================================

/// A rule body was invoked in a way it cannot handle.
///
/// Distinct from a failed check: a fault means the schema or the rule is
/// wrong, not the data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleFault {
    /// The rule received a value of a kind it does not handle.
    #[error("rule `{rule}` does not support {found} values")]
    UnsupportedKind {
        /// Rule name.
        rule: String,
        /// Kind that was received.
        found: &'static str,
    },

    /// A required argument is missing.
    #[error("rule `{rule}` expects an argument at position {index}")]
    MissingArgument {
        /// Rule name.
        rule: String,
        /// Zero-based argument index.
        index: usize,
    },

    /// An argument could not be interpreted.
    #[error("rule `{rule}`: argument {index} (`{value}`) is not a valid {expected}")]
    BadArgument {
        /// Rule name.
        rule: String,
        /// Zero-based argument index.
        index: usize,
        /// Raw argument text.
        value: String,
        /// What the rule expected.
        expected: &'static str,
    },
}

// ============================================================================
// STRUCTURAL ERROR
// ============================================================================

/// Top-level failure of a validate call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// The record's schema could not be compiled.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A rule faulted while running.
    #[error("{field}: {source}")]
    Rule {
        /// Qualified field path.
        field: String,
        /// The fault.
        #[source]
        source: RuleFault,
    },

    /// A filter produced a value that cannot be stored in the field.
    #[error("{field}: filter `{filter}` produced an incompatible value: {source}")]
    Store {
        /// Qualified field path.
        field: String,
        /// Filter name.
        filter: String,
        /// Store diagnostic.
        #[source]
        source: StoreError,
    },

    /// A filter turned a null into a value.
    #[error("{field}: filter `{filter}` produced a value from null")]
    NullFabricated {
        /// Qualified field path.
        field: String,
        /// Filter name.
        filter: String,
    },

    /// The compiled accessor did not resolve on the record.
    #[error("{field}: field could not be resolved on {record}")]
    Unreachable {
        /// Record type name.
        record: &'static str,
        /// Qualified field path.
        field: String,
    },
}

// ============================================================================
// REGISTRY ERROR
// ============================================================================

/// Rule registration was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A rule with this name already exists and replacement is not allowed.
    #[error("a {kind} named `{name}` is already registered")]
    Duplicate {
        /// Partition.
        kind: RuleKind,
        /// Rule name.
        name: String,
    },

    /// The registry has been frozen.
    #[error("cannot register {kind} `{name}`: the rule registry is frozen")]
    Frozen {
        /// Partition.
        kind: RuleKind,
        /// Rule name.
        name: String,
    },

    /// The name cannot be referenced from a declaration.
    #[error("`{name}` is not a valid rule name")]
    InvalidName {
        /// Rejected name.
        name: String,
    },
}
