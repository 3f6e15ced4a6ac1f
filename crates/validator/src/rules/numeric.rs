//! Ordering rules over numbers and string lengths.
//!
//! Numbers are compared as integers when both sides are integral and as
//! floats otherwise. Strings are measured in characters.

use std::cmp::Ordering;

use super::{Comparator, NUMERIC, SIZED, STR, all_elements};
use crate::context::ValidationContext;
use crate::error::RuleFault;
use crate::registry::{Arity, ValidatorRule};
use crate::value::Value;

/// A comparable magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    fn parse(raw: &str) -> Option<Self> {
        raw.parse::<i128>()
            .map(Self::Int)
            .ok()
            .or_else(|| raw.parse::<f64>().ok().map(Self::Float))
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Float(n) => n,
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

/// Whether the operand is a number or a string length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measure {
    Number,
    Length,
}

fn measure(value: &Value) -> Option<(Number, Measure)> {
    match value {
        Value::Int(n) => Some((Number::Int(i128::from(*n)), Measure::Number)),
        Value::Uint(n) => Some((Number::Int(i128::from(*n)), Measure::Number)),
        Value::Float(n) => Some((Number::Float(*n), Measure::Number)),
        Value::Str(s) => Some((Number::Int(s.chars().count() as i128), Measure::Length)),
        Value::Bool(_) | Value::List(_) => None,
    }
}

fn number_arg(ctx: &ValidationContext<'_>, index: usize) -> Result<Number, RuleFault> {
    let raw = ctx.arg(index)?;
    Number::parse(raw).ok_or_else(|| RuleFault::BadArgument {
        rule: ctx.rule_name().to_owned(),
        index,
        value: raw.to_owned(),
        expected: "number",
    })
}

/// Checks every element against `cmp` and the first argument, remembering
/// whether the failing element was a string.
fn compare_all(
    ctx: &ValidationContext<'_>,
    cmp: Comparator,
) -> Result<(bool, Measure), RuleFault> {
    let bound = number_arg(ctx, 0)?;
    let mut seen = Measure::Number;
    let passed = all_elements(ctx.value(), |value| {
        let (n, m) = measure(value).ok_or_else(|| ctx.unsupported())?;
        seen = m;
        Ok(cmp.compare(&n, &bound))
    })?;
    Ok((passed, seen))
}

fn bound_rule(cmp: Comparator, length_phrase: &'static str) -> ValidatorRule {
    ValidatorRule::new(move |ctx| {
        let (passed, measure) = compare_all(ctx, cmp)?;
        if !passed {
            let bound = ctx.arg(0)?;
            let message = match measure {
                Measure::Number => {
                    format!("{} must be {} {bound}", ctx.label(), cmp.numeric_phrase())
                }
                Measure::Length => {
                    format!("{} must be {length_phrase} {bound} characters long", ctx.label())
                }
            };
            ctx.set_message(message);
        }
        Ok(passed)
    })
    .with_arity(Arity::exact(1))
    .accepting(SIZED)
}

fn comparison(cmp: Comparator) -> ValidatorRule {
    ValidatorRule::new(move |ctx| {
        let (passed, _) = compare_all(ctx, cmp)?;
        if !passed {
            let bound = ctx.arg(0)?;
            let message = format!("{} must be {} {bound}", ctx.label(), cmp.numeric_phrase());
            ctx.set_message(message);
        }
        Ok(passed)
    })
    .with_arity(Arity::exact(1))
    .accepting(NUMERIC)
}

fn between(ctx: &mut ValidationContext<'_>) -> Result<bool, RuleFault> {
    let low = number_arg(ctx, 0)?;
    let high = number_arg(ctx, 1)?;
    let mut seen = Measure::Number;
    let passed = all_elements(ctx.value(), |value| {
        let (n, m) = measure(value).ok_or_else(|| ctx.unsupported())?;
        seen = m;
        Ok(Comparator::GreaterThanOrEqual.compare(&n, &low)
            && Comparator::LessThanOrEqual.compare(&n, &high))
    })?;
    if !passed {
        let suffix = if seen == Measure::Length { " characters long" } else { "" };
        let message = format!(
            "{} must be between {} and {}{suffix}",
            ctx.label(),
            ctx.arg(0)?,
            ctx.arg(1)?
        );
        ctx.set_message(message);
    }
    Ok(passed)
}

fn len(ctx: &mut ValidationContext<'_>) -> Result<bool, RuleFault> {
    let expected = ctx.count_arg(0)?;
    let passed = all_elements(ctx.value(), |value| {
        let s = value.as_str().ok_or_else(|| ctx.unsupported())?;
        Ok(s.chars().count() == expected)
    })?;
    if !passed {
        let message = format!("{} must be exactly {expected} characters long", ctx.label());
        ctx.set_message(message);
    }
    Ok(passed)
}

pub(super) fn validators() -> Vec<(&'static str, ValidatorRule)> {
    vec![
        ("min", bound_rule(Comparator::GreaterThanOrEqual, "at least")),
        ("max", bound_rule(Comparator::LessThanOrEqual, "at most")),
        (
            "between",
            ValidatorRule::new(between)
                .with_arity(Arity::exact(2))
                .accepting(SIZED),
        ),
        (
            "len",
            ValidatorRule::new(len).with_arity(Arity::exact(1)).accepting(STR),
        ),
        ("eq", comparison(Comparator::Equal)),
        ("ne", comparison(Comparator::NotEqual)),
        ("gt", comparison(Comparator::GreaterThan)),
        ("gte", comparison(Comparator::GreaterThanOrEqual)),
        ("lt", comparison(Comparator::LessThan)),
        ("lte", comparison(Comparator::LessThanOrEqual)),
    ]
}

#[cfg(test)]
mod tests {
    use super::super::testing::Call;
    use crate::error::RuleFault;
    use crate::value::{Value, ValueKind};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Int(16), "min", &["18"], false)]
    #[case(Value::Int(18), "min", &["18"], true)]
    #[case(Value::Uint(66), "max", &["65"], false)]
    #[case(Value::Float(2.5), "between", &["2", "3"], true)]
    #[case(Value::Int(9), "gt", &["9"], false)]
    #[case(Value::Int(-1), "lt", &["0"], true)]
    #[case(Value::Float(1.0), "eq", &["1"], true)]
    #[case(Value::Int(3), "ne", &["3"], false)]
    fn numeric_bounds(
        #[case] value: Value,
        #[case] rule: &'static str,
        #[case] args: &[&str],
        #[case] expected: bool,
    ) {
        let (passed, _) = Call::on(value).args(args).validate(rule).unwrap();
        assert_eq!(passed, expected);
    }

    #[test]
    fn large_unsigned_values_compare_exactly() {
        let (passed, _) = Call::on(Value::Uint(u64::MAX))
            .args(&["18446744073709551614"])
            .validate("gt")
            .unwrap();
        assert!(passed);
    }

    #[test]
    fn strings_are_measured_in_characters() {
        let (passed, message) = Call::on("héllo").args(&["6"]).validate("min").unwrap();
        assert!(!passed);
        assert_eq!(message.as_deref(), Some("field must be at least 6 characters long"));

        let (passed, _) = Call::on("héllo").args(&["5"]).validate("len").unwrap();
        assert!(passed);
    }

    #[test]
    fn numeric_message_uses_comparator_wording() {
        let (_, message) = Call::on(Value::Int(16)).args(&["18"]).validate("min").unwrap();
        assert_eq!(message.as_deref(), Some("field must be greater than or equal to 18"));
    }

    #[test]
    fn lists_are_checked_per_element() {
        let list = Value::List(vec![Value::Int(5), Value::Int(1)]);
        let (passed, _) = Call::on(list).args(&["2"]).validate("min").unwrap();
        assert!(!passed);
    }

    #[test]
    fn null_passes() {
        let (passed, message) = Call::null(ValueKind::Int).args(&["1"]).validate("min").unwrap();
        assert!(passed);
        assert_eq!(message, None);
    }

    #[test]
    fn bad_bound_is_a_fault() {
        let err = Call::on(Value::Int(1)).args(&["ten"]).validate("min").unwrap_err();
        assert!(matches!(err, RuleFault::BadArgument { index: 0, .. }));
    }

    #[test]
    fn booleans_are_unsupported() {
        let err = Call::on(true).args(&["1"]).validate("min").unwrap_err();
        assert!(matches!(err, RuleFault::UnsupportedKind { found: "bool", .. }));
    }
}
