//! Shared helpers for parsing `#[record(...)]` and reporting errors.

pub mod attrs;
pub mod diag;
