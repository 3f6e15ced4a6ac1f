//! Built-in rule catalog.
//!
//! Every rule treats a null value as "not provided": validators pass and
//! filters return null. Only `required` rejects null. List fields are checked
//! (or mapped) element by element unless the rule is about the list itself
//! (`not_empty`, `min_items`, `max_items`).

mod comparator;
mod filters;
mod numeric;
mod presence;
mod set;
mod string;
mod temporal;

pub use comparator::Comparator;

use crate::error::RuleFault;
use crate::registry::{FilterRule, ValidatorRule};
use crate::value::{Value, ValueKind};

const STR: &[ValueKind] = &[ValueKind::Str];
const NUMERIC: &[ValueKind] = &[ValueKind::Int, ValueKind::Uint, ValueKind::Float];
const SIZED: &[ValueKind] = &[ValueKind::Int, ValueKind::Uint, ValueKind::Float, ValueKind::Str];

pub(crate) fn validators() -> Vec<(&'static str, ValidatorRule)> {
    let mut rules = Vec::new();
    rules.extend(presence::validators());
    rules.extend(numeric::validators());
    rules.extend(string::validators());
    rules.extend(set::validators());
    rules.extend(temporal::validators());
    rules
}

pub(crate) fn filters() -> Vec<(&'static str, FilterRule)> {
    filters::filters()
}

// ============================================================================
// ELEMENT HELPERS
// ============================================================================

/// Runs `check` on a scalar or on each element of a list. Null passes.
pub(crate) fn all_elements(
    value: Option<&Value>,
    mut check: impl FnMut(&Value) -> Result<bool, RuleFault>,
) -> Result<bool, RuleFault> {
    match value {
        None => Ok(true),
        Some(Value::List(items)) => {
            for item in items {
                if !check(item)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Some(value) => check(value),
    }
}

/// Maps a scalar or each element of a list. Null stays null.
pub(crate) fn map_elements(
    value: Option<&Value>,
    mut map: impl FnMut(&Value) -> Result<Value, RuleFault>,
) -> Result<Option<Value>, RuleFault> {
    match value {
        None => Ok(None),
        Some(Value::List(items)) => items
            .iter()
            .map(&mut map)
            .collect::<Result<Vec<_>, _>>()
            .map(|items| Some(Value::List(items))),
        Some(value) => map(value).map(Some),
    }
}
