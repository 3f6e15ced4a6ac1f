//! Compile-time tests for sieve-validator-macros.
//!
//! These tests use trybuild to verify that `#[derive(Record)]` produces
//! code that compiles against the runtime crate.

#[test]
fn test_record_derive() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/record_pass.rs");
}

#[test]
fn test_record_derive_nested() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/record_nested_pass.rs");
}
