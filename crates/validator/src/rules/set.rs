//! Membership rules.
//!
//! Values are compared by their rendered form, so `enum(1,2,3)` works on
//! integer fields and `enum(draft,published)` on string fields alike.

use super::all_elements;
use crate::context::ValidationContext;
use crate::error::RuleFault;
use crate::registry::{Arity, ValidatorRule};
use crate::value::Value;

fn is_listed(ctx: &ValidationContext<'_>, value: &Value) -> Result<bool, RuleFault> {
    if matches!(value, Value::List(_)) {
        return Err(ctx.unsupported());
    }
    let rendered = value.to_string();
    Ok(ctx.args().iter().any(|allowed| *allowed == rendered))
}

fn membership_message(ctx: &ValidationContext<'_>, verb: &str, noun: &str) -> String {
    if ctx.options().expose_allowed_values_in_default_messages {
        format!("{} must {verb} one of: {}", ctx.label(), ctx.args().join(", "))
    } else {
        format!("{} must {verb} one of the {noun} values", ctx.label())
    }
}

fn one_of(ctx: &mut ValidationContext<'_>) -> Result<bool, RuleFault> {
    let passed = {
        let view: &ValidationContext<'_> = ctx;
        all_elements(view.value(), |value| is_listed(view, value))?
    };
    if !passed {
        let message = membership_message(ctx, "be", "allowed");
        ctx.set_message(message);
    }
    Ok(passed)
}

fn none_of(ctx: &mut ValidationContext<'_>) -> Result<bool, RuleFault> {
    let passed = {
        let view: &ValidationContext<'_> = ctx;
        all_elements(view.value(), |value| is_listed(view, value).map(|listed| !listed))?
    };
    if !passed {
        let message = membership_message(ctx, "not be", "excluded");
        ctx.set_message(message);
    }
    Ok(passed)
}

pub(super) fn validators() -> Vec<(&'static str, ValidatorRule)> {
    vec![
        ("enum", ValidatorRule::new(one_of).with_arity(Arity::at_least(1))),
        ("not_in", ValidatorRule::new(none_of).with_arity(Arity::at_least(1))),
    ]
}
