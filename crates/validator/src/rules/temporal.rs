//! Date rules over string fields.
//!
//! A value that does not parse is a validation failure whose message carries
//! the parser's explanation. A bound argument that does not parse is a fault.

use chrono::NaiveDate;

use super::{Comparator, STR, all_elements};
use crate::context::ValidationContext;
use crate::error::RuleFault;
use crate::registry::{Arity, ValidatorRule};

const DEFAULT_FORMAT: &str = "%Y-%m-%d";

fn format_arg<'a>(ctx: &ValidationContext<'a>, index: usize) -> &'a str {
    ctx.args()
        .get(index)
        .map(String::as_str)
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FORMAT)
}

fn parse_value(value: &str, format: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, format)
        .map_err(|err| format!("`{value}` is not a date in format {format}: {err}"))
}

fn date(ctx: &mut ValidationContext<'_>) -> Result<bool, RuleFault> {
    let format = format_arg(ctx, 0);
    let mut failure = None;
    let passed = {
        let view: &ValidationContext<'_> = ctx;
        all_elements(view.value(), |value| {
            let s = value.as_str().ok_or_else(|| view.unsupported())?;
            match parse_value(s, format) {
                Ok(_) => Ok(true),
                Err(reason) => {
                    failure = Some(reason);
                    Ok(false)
                }
            }
        })?
    };
    if let Some(reason) = failure {
        let message = format!("{}: {reason}", ctx.label());
        ctx.set_message(message);
    }
    Ok(passed)
}

fn bounded(cmp: Comparator) -> ValidatorRule {
    ValidatorRule::new(move |ctx| {
        let format = format_arg(ctx, 1);
        let raw = ctx.arg(0)?;
        let bound = NaiveDate::parse_from_str(raw, format).map_err(|_| RuleFault::BadArgument {
            rule: ctx.rule_name().to_owned(),
            index: 0,
            value: raw.to_owned(),
            expected: "date",
        })?;

        let mut parse_failure = None;
        let passed = {
            let view: &ValidationContext<'_> = ctx;
            all_elements(view.value(), |value| {
                let s = value.as_str().ok_or_else(|| view.unsupported())?;
                match parse_value(s, format) {
                    Ok(date) => Ok(cmp.compare(&date, &bound)),
                    Err(reason) => {
                        parse_failure = Some(reason);
                        Ok(false)
                    }
                }
            })?
        };

        if !passed {
            let message = match parse_failure {
                Some(reason) => format!("{}: {reason}", ctx.label()),
                None => format!("{} must be {} {raw}", ctx.label(), cmp.temporal_description()),
            };
            ctx.set_message(message);
        }
        Ok(passed)
    })
    .with_arity(Arity::range(1, 2))
    .accepting(STR)
}

pub(super) fn validators() -> Vec<(&'static str, ValidatorRule)> {
    vec![
        (
            "date",
            ValidatorRule::new(date)
                .with_arity(Arity::range(0, 1))
                .accepting(STR),
        ),
        ("before", bounded(Comparator::LessThan)),
        ("after", bounded(Comparator::GreaterThan)),
    ]
}

#[cfg(test)]
mod tests {
    use super::super::testing::Call;
    use crate::error::RuleFault;
    use pretty_assertions::assert_eq;

    #[test]
    fn date_uses_iso_format_by_default() {
        assert!(Call::on("2024-02-29").validate("date").unwrap().0);
        assert!(!Call::on("2023-02-29").validate("date").unwrap().0);
    }

    #[test]
    fn date_parse_errors_are_folded_into_the_message() {
        let (passed, message) = Call::on("29/02/2024").validate("date").unwrap();
        assert!(!passed);
        let message = message.unwrap();
        assert!(message.starts_with("field: `29/02/2024` is not a date in format %Y-%m-%d"));
    }

    #[test]
    fn custom_format() {
        assert!(Call::on("29/02/2024").args(&["%d/%m/%Y"]).validate("date").unwrap().0);
    }

    #[test]
    fn before_and_after_use_temporal_wording() {
        let (passed, message) = Call::on("2024-06-01")
            .args(&["2024-01-01"])
            .validate("before")
            .unwrap();
        assert!(!passed);
        assert_eq!(message.as_deref(), Some("field must be before 2024-01-01"));

        assert!(Call::on("2024-06-01").args(&["2024-01-01"]).validate("after").unwrap().0);
    }

    #[test]
    fn unparseable_bound_is_a_fault() {
        let err = Call::on("2024-06-01").args(&["soon"]).validate("after").unwrap_err();
        assert!(matches!(err, RuleFault::BadArgument { expected: "date", .. }));
    }
}
