//! Presence and collection-size rules.

use crate::context::ValidationContext;
use crate::error::RuleFault;
use crate::registry::{Arity, ValidatorRule};
use crate::value::Value;

/// Passes when the field holds a value. Non-nullable fields always pass.
fn required(ctx: &mut ValidationContext<'_>) -> Result<bool, RuleFault> {
    if ctx.is_null() {
        let message = format!("{} is required", ctx.label());
        ctx.set_message(message);
        return Ok(false);
    }
    Ok(true)
}

fn not_empty(ctx: &mut ValidationContext<'_>) -> Result<bool, RuleFault> {
    let empty = match ctx.value() {
        None => return Ok(true),
        Some(Value::Str(s)) => s.is_empty(),
        Some(Value::List(items)) => items.is_empty(),
        Some(_) => return Err(ctx.unsupported()),
    };
    if empty {
        let message = format!("{} must not be empty", ctx.label());
        ctx.set_message(message);
    }
    Ok(!empty)
}

fn item_count(ctx: &ValidationContext<'_>) -> Result<Option<usize>, RuleFault> {
    match ctx.value() {
        None => Ok(None),
        Some(Value::List(items)) => Ok(Some(items.len())),
        Some(_) => Err(ctx.unsupported()),
    }
}

fn min_items(ctx: &mut ValidationContext<'_>) -> Result<bool, RuleFault> {
    let min = ctx.count_arg(0)?;
    let Some(count) = item_count(ctx)? else {
        return Ok(true);
    };
    if count < min {
        let message = format!("{} must contain at least {min} item(s)", ctx.label());
        ctx.set_message(message);
        return Ok(false);
    }
    Ok(true)
}

fn max_items(ctx: &mut ValidationContext<'_>) -> Result<bool, RuleFault> {
    let max = ctx.count_arg(0)?;
    let Some(count) = item_count(ctx)? else {
        return Ok(true);
    };
    if count > max {
        let message = format!("{} must contain at most {max} item(s)", ctx.label());
        ctx.set_message(message);
        return Ok(false);
    }
    Ok(true)
}

pub(super) fn validators() -> Vec<(&'static str, ValidatorRule)> {
    vec![
        ("required", ValidatorRule::new(required).with_arity(Arity::NONE)),
        ("not_empty", ValidatorRule::new(not_empty).with_arity(Arity::NONE)),
        ("min_items", ValidatorRule::new(min_items).with_arity(Arity::exact(1))),
        ("max_items", ValidatorRule::new(max_items).with_arity(Arity::exact(1))),
    ]
}
