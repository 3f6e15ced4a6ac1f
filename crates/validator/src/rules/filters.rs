//! Built-in filters.

use super::{NUMERIC, STR, map_elements};
use crate::context::ValidationContext;
use crate::error::RuleFault;
use crate::registry::{Arity, FilterRule};
use crate::value::Value;

fn string_filter(transform: fn(&str) -> String) -> FilterRule {
    FilterRule::new(move |ctx| {
        let ctx: &ValidationContext<'_> = ctx;
        map_elements(ctx.value(), |value| {
            let s = value.as_str().ok_or_else(|| ctx.unsupported())?;
            Ok(Value::Str(transform(s)))
        })
    })
    .with_arity(Arity::NONE)
    .accepting(STR)
}

fn abs(ctx: &mut ValidationContext<'_>) -> Result<Option<Value>, RuleFault> {
    let ctx: &ValidationContext<'_> = ctx;
    map_elements(ctx.value(), |value| match value {
        Value::Int(n) => Ok(Value::Int(n.saturating_abs())),
        Value::Uint(n) => Ok(Value::Uint(*n)),
        Value::Float(n) => Ok(Value::Float(n.abs())),
        _ => Err(ctx.unsupported()),
    })
}

fn bounds_fault(ctx: &ValidationContext<'_>) -> RuleFault {
    RuleFault::BadArgument {
        rule: ctx.rule_name().to_owned(),
        index: 1,
        value: ctx.args().get(1).cloned().unwrap_or_default(),
        expected: "upper bound not below the lower bound",
    }
}

fn clamp(ctx: &mut ValidationContext<'_>) -> Result<Option<Value>, RuleFault> {
    let ctx: &ValidationContext<'_> = ctx;
    map_elements(ctx.value(), |value| match value {
        Value::Int(n) => {
            let (lo, hi): (i64, i64) =
                (ctx.parse_arg(0, "integer")?, ctx.parse_arg(1, "integer")?);
            if lo > hi {
                return Err(bounds_fault(ctx));
            }
            Ok(Value::Int((*n).clamp(lo, hi)))
        }
        Value::Uint(n) => {
            let (lo, hi): (u64, u64) = (
                ctx.parse_arg(0, "non-negative integer")?,
                ctx.parse_arg(1, "non-negative integer")?,
            );
            if lo > hi {
                return Err(bounds_fault(ctx));
            }
            Ok(Value::Uint((*n).clamp(lo, hi)))
        }
        Value::Float(n) => {
            let (lo, hi) = (ctx.number_arg(0)?, ctx.number_arg(1)?);
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(bounds_fault(ctx));
            }
            Ok(Value::Float(n.clamp(lo, hi)))
        }
        _ => Err(ctx.unsupported()),
    })
}

fn round(ctx: &mut ValidationContext<'_>) -> Result<Option<Value>, RuleFault> {
    let ctx: &ValidationContext<'_> = ctx;
    let digits: i32 = if ctx.arg_count() == 0 {
        0
    } else {
        ctx.parse_arg(0, "integer")?
    };
    let scale = 10_f64.powi(digits);
    if !scale.is_normal() {
        return Err(RuleFault::BadArgument {
            rule: ctx.rule_name().to_owned(),
            index: 0,
            value: digits.to_string(),
            expected: "digit count within f64 precision",
        });
    }
    map_elements(ctx.value(), |value| match value {
        Value::Float(n) => {
            let scaled = (n * scale).round() / scale;
            // Past the scale's reach the value has no digits left to drop.
            Ok(Value::Float(if scaled.is_finite() { scaled } else { *n }))
        }
        Value::Int(_) | Value::Uint(_) => Ok(value.clone()),
        _ => Err(ctx.unsupported()),
    })
}

fn truncate(ctx: &mut ValidationContext<'_>) -> Result<Option<Value>, RuleFault> {
    let ctx: &ValidationContext<'_> = ctx;
    let max = ctx.count_arg(0)?;
    map_elements(ctx.value(), |value| {
        let s = value.as_str().ok_or_else(|| ctx.unsupported())?;
        Ok(Value::Str(s.chars().take(max).collect()))
    })
}

pub(super) fn filters() -> Vec<(&'static str, FilterRule)> {
    vec![
        ("trim", string_filter(|s| s.trim().to_owned())),
        ("trim_start", string_filter(|s| s.trim_start().to_owned())),
        ("trim_end", string_filter(|s| s.trim_end().to_owned())),
        ("upper", string_filter(str::to_uppercase)),
        ("lower", string_filter(str::to_lowercase)),
        (
            "abs",
            FilterRule::new(abs).with_arity(Arity::NONE).accepting(NUMERIC),
        ),
        (
            "clamp",
            FilterRule::new(clamp).with_arity(Arity::exact(2)).accepting(NUMERIC),
        ),
        (
            "round",
            FilterRule::new(round)
                .with_arity(Arity::range(0, 1))
                .accepting(NUMERIC),
        ),
        (
            "truncate",
            FilterRule::new(truncate).with_arity(Arity::exact(1)).accepting(STR),
        ),
    ]
}
