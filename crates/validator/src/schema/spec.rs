//! Compiled per-field metadata.

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use super::trigger;
use crate::parser::RuleArgs;
use crate::record::{Locate, Project};
use crate::registry::{FilterFn, Rule, ValidatorFn};
use crate::value::{Shape, Slot, Value, ValueKind};

/// Behavioural modifier read from the flags channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldFlag {
    /// Skip every rule when the value is null or equals the type's zero value.
    AllowZero,
}

impl FieldFlag {
    /// Name as written in a declaration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllowZero => "allow_zero",
        }
    }
}

impl FromStr for FieldFlag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allow_zero" => Ok(Self::AllowZero),
            _ => Err(()),
        }
    }
}

/// A rule declaration bound to its registered callable.
pub struct BoundRule<F: ?Sized> {
    /// Name the rule was declared under.
    pub name: String,
    /// Static arguments.
    pub args: RuleArgs,
    /// Callable and metadata captured at compile time.
    pub rule: Rule<F>,
}

/// A bound validator.
pub type BoundValidator = BoundRule<ValidatorFn>;

/// A bound filter.
pub type BoundFilter = BoundRule<FilterFn>;

impl<F: ?Sized> Clone for BoundRule<F> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            args: self.args.clone(),
            rule: self.rule.clone(),
        }
    }
}

impl<F: ?Sized> PartialEq for BoundRule<F> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args && self.rule.same_callable(&other.rule)
    }
}

impl<F: ?Sized> fmt::Debug for BoundRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundRule")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Everything the executor needs for one field.
#[derive(Clone)]
pub struct FieldSpec {
    /// Dotted path from the root record, e.g. `address.zip`.
    pub path: String,
    /// Field identifier.
    pub name: &'static str,
    /// Rust type of the field.
    pub type_name: &'static str,
    /// Element kind used for rule dispatch.
    pub kind: ValueKind,
    /// Wrapper shape.
    pub shape: Shape,
    /// Validators in declaration order.
    pub validators: Vec<BoundValidator>,
    /// Filters in declaration order.
    pub filters: Vec<BoundFilter>,
    /// Label used in field errors.
    pub label: String,
    /// Fixed message replacing every validator message.
    pub message: Option<String>,
    /// Activation triggers; `all` means always active.
    pub triggers: SmallVec<[String; 2]>,
    /// Behavioural flags.
    pub flags: SmallVec<[FieldFlag; 1]>,
    /// The type's zero value.
    pub zero: Value,
    pub(crate) route: SmallVec<[Project; 2]>,
    pub(crate) locate: Locate,
}

impl FieldSpec {
    /// Whether the field runs for `trigger`.
    #[must_use]
    pub fn is_active(&self, trigger: &str) -> bool {
        self.triggers
            .iter()
            .any(|t| t == trigger || t == trigger::ALL)
    }

    /// Whether `flag` is set.
    #[must_use]
    pub fn has_flag(&self, flag: FieldFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Whether `value` equals the field type's zero value.
    #[must_use]
    pub fn is_zero(&self, value: &Value) -> bool {
        *value == self.zero
    }

    /// Resolves the field's storage on a root record instance.
    pub(crate) fn resolve<'r>(
        &self,
        root: &'r mut (dyn Any + 'static),
    ) -> Option<&'r mut dyn Slot> {
        let mut current = root;
        for project in &self.route {
            current = project(current)?;
        }
        (self.locate)(current)
    }
}

impl PartialEq for FieldSpec {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.name == other.name
            && self.type_name == other.type_name
            && self.kind == other.kind
            && self.shape == other.shape
            && self.validators == other.validators
            && self.filters == other.filters
            && self.label == other.label
            && self.message == other.message
            && self.triggers == other.triggers
            && self.flags == other.flags
            && self.zero == other.zero
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("shape", &self.shape)
            .field("validators", &self.validators)
            .field("filters", &self.filters)
            .field("label", &self.label)
            .field("message", &self.message)
            .field("triggers", &self.triggers)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
