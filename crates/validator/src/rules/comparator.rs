//! Comparison operators and their message wording.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A binary comparison used by the ordering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `<=`
    LessThanOrEqual,
    /// `>=`
    GreaterThanOrEqual,
}

impl Comparator {
    /// Operator symbol.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThanOrEqual => ">=",
        }
    }

    /// Wording for numbers, e.g. "less than or equal".
    #[must_use]
    pub fn numeric_description(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::NotEqual => "not equal",
            Self::LessThan => "less than",
            Self::GreaterThan => "greater than",
            Self::LessThanOrEqual => "less than or equal",
            Self::GreaterThanOrEqual => "greater than or equal",
        }
    }

    /// Wording for dates and times, e.g. "at most".
    #[must_use]
    pub fn temporal_description(self) -> &'static str {
        match self {
            Self::Equal => "the same as",
            Self::NotEqual => "not the same as",
            Self::LessThan => "before",
            Self::GreaterThan => "after",
            Self::LessThanOrEqual => "at most",
            Self::GreaterThanOrEqual => "at least",
        }
    }

    /// Numeric wording ready to precede an operand ("equal to 3").
    #[must_use]
    pub fn numeric_phrase(self) -> &'static str {
        match self {
            Self::Equal => "equal to",
            Self::NotEqual => "not equal to",
            Self::LessThanOrEqual => "less than or equal to",
            Self::GreaterThanOrEqual => "greater than or equal to",
            other => other.numeric_description(),
        }
    }

    /// Whether `ordering` (left compared to right) satisfies the operator.
    #[must_use]
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Equal => ordering.is_eq(),
            Self::NotEqual => ordering.is_ne(),
            Self::LessThan => ordering.is_lt(),
            Self::GreaterThan => ordering.is_gt(),
            Self::LessThanOrEqual => ordering.is_le(),
            Self::GreaterThanOrEqual => ordering.is_ge(),
        }
    }

    /// Compares two partially ordered values; incomparable pairs fail.
    #[must_use]
    pub fn compare<T: PartialOrd + ?Sized>(self, left: &T, right: &T) -> bool {
        left.partial_cmp(right).is_some_and(|ordering| self.holds(ordering))
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Comparator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "=" => Self::Equal,
            "!=" => Self::NotEqual,
            "<" => Self::LessThan,
            ">" => Self::GreaterThan,
            "<=" => Self::LessThanOrEqual,
            ">=" => Self::GreaterThanOrEqual,
            other => return Err(format!("unknown comparator `{other}`")),
        })
    }
}
