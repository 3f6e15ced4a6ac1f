//! Trigger selection.

use super::{FieldSpec, Schema};

/// Reserved trigger: a field carrying it runs for every token. Fields gated on
/// other triggers do not run when validating with it.
pub const ALL: &str = "all";

/// Normalises a caller-supplied activation token; absent or blank means [`ALL`].
#[must_use]
pub fn normalize(trigger: Option<&str>) -> &str {
    match trigger.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => ALL,
    }
}

/// Fields of `schema` that run for `trigger`, in schema order.
pub fn select<'s>(schema: &'s Schema, trigger: &'s str) -> impl Iterator<Item = &'s FieldSpec> {
    schema
        .fields()
        .iter()
        .filter(move |spec| spec.is_active(trigger))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "all")]
    #[case(Some(""), "all")]
    #[case(Some("  "), "all")]
    #[case(Some(" update "), "update")]
    fn normalizes_tokens(#[case] input: Option<&str>, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }
}
