//! String content rules.

use std::sync::LazyLock;

use super::{STR, all_elements};
use crate::context::ValidationContext;
use crate::error::RuleFault;
use crate::registry::{Arity, ValidatorRule};

static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

type Check = fn(&ValidationContext<'_>, &str) -> Result<bool, RuleFault>;

fn check_strings(ctx: &ValidationContext<'_>, check: Check) -> Result<bool, RuleFault> {
    all_elements(ctx.value(), |value| {
        let s = value.as_str().ok_or_else(|| ctx.unsupported())?;
        check(ctx, s)
    })
}

/// Builds a validator that applies `check` to each string element.
fn content_rule(
    check: Check,
    describe: fn(&ValidationContext<'_>) -> Result<String, RuleFault>,
    arity: Arity,
) -> ValidatorRule {
    ValidatorRule::new(move |ctx| {
        let passed = check_strings(ctx, check)?;
        if !passed {
            let message = describe(ctx)?;
            ctx.set_message(message);
        }
        Ok(passed)
    })
    .with_arity(arity)
    .accepting(STR)
}

fn is_uuid(s: &str) -> bool {
    uuid::Uuid::try_parse(s).is_ok()
}

pub(super) fn validators() -> Vec<(&'static str, ValidatorRule)> {
    vec![
        (
            "alpha",
            content_rule(
                |_, s| Ok(s.chars().all(char::is_alphabetic)),
                |ctx| Ok(format!("{} must contain only letters", ctx.label())),
                Arity::NONE,
            ),
        ),
        (
            "alphanum",
            content_rule(
                |_, s| Ok(s.chars().all(char::is_alphanumeric)),
                |ctx| Ok(format!("{} must contain only letters and digits", ctx.label())),
                Arity::NONE,
            ),
        ),
        (
            "numeric",
            content_rule(
                |_, s| Ok(!s.is_empty() && s.chars().all(|c| c.is_ascii_digit())),
                |ctx| Ok(format!("{} must contain only digits", ctx.label())),
                Arity::NONE,
            ),
        ),
        (
            "email",
            content_rule(
                |_, s| Ok(EMAIL_REGEX.is_match(s)),
                |ctx| Ok(format!("{} must be a valid email address", ctx.label())),
                Arity::NONE,
            ),
        ),
        (
            "uuid",
            content_rule(
                |_, s| Ok(is_uuid(s)),
                |ctx| Ok(format!("{} must be a valid UUID", ctx.label())),
                Arity::NONE,
            ),
        ),
        (
            "starts_with",
            content_rule(
                |ctx, s| Ok(s.starts_with(ctx.arg(0)?)),
                |ctx| Ok(format!("{} must start with \"{}\"", ctx.label(), ctx.arg(0)?)),
                Arity::exact(1),
            ),
        ),
        (
            "ends_with",
            content_rule(
                |ctx, s| Ok(s.ends_with(ctx.arg(0)?)),
                |ctx| Ok(format!("{} must end with \"{}\"", ctx.label(), ctx.arg(0)?)),
                Arity::exact(1),
            ),
        ),
        (
            "contains",
            content_rule(
                |ctx, s| Ok(s.contains(ctx.arg(0)?)),
                |ctx| Ok(format!("{} must contain \"{}\"", ctx.label(), ctx.arg(0)?)),
                Arity::exact(1),
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::super::testing::Call;
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("abc", "alpha", true)]
    #[case("ab1", "alpha", false)]
    #[case("ab1", "alphanum", true)]
    #[case("ab 1", "alphanum", false)]
    #[case("0042", "numeric", true)]
    #[case("", "numeric", false)]
    #[case("user@example.com", "email", true)]
    #[case("user@", "email", false)]
    #[case("67e55044-10b1-426f-9247-bb680e5fe0c8", "uuid", true)]
    #[case("not-a-uuid", "uuid", false)]
    fn content_checks(#[case] input: &str, #[case] rule: &'static str, #[case] expected: bool) {
        let (passed, _) = Call::on(input).validate(rule).unwrap();
        assert_eq!(passed, expected);
    }

    #[test]
    fn affix_rules_use_their_argument() {
        let call = Call::on("sieve-core").args(&["sieve"]);
        assert!(call.validate("starts_with").unwrap().0);
        assert!(!call.validate("ends_with").unwrap().0);
        assert!(call.validate("contains").unwrap().0);

        let (_, message) = call.validate("ends_with").unwrap();
        assert_eq!(message.as_deref(), Some("field must end with \"sieve\""));
    }

    #[test]
    fn every_list_element_must_match() {
        let list = Value::List(vec!["a@b.io".into(), "nope".into()]);
        let (passed, message) = Call::on(list).validate("email").unwrap();
        assert!(!passed);
        assert_eq!(message.as_deref(), Some("field must be a valid email address"));
    }
}
