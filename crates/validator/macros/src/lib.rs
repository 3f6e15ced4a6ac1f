//! Derive macro for `sieve-validator` records.
//!
//! `#[derive(Record)]` implements `sieve_validator::Record` for a struct with
//! named fields, turning each field's `#[record(...)]` attribute into a
//! field declaration the schema compiler understands.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

extern crate proc_macro;

use proc_macro::TokenStream;

mod record;
mod support;

/// Derive macro for the `Record` trait.
///
/// # Field Attributes
///
/// - `key = "..."` - Raw tag passed to the schema compiler. The default
///   keys are `validator`, `filter`, `trigger`, `message`, `label` and
///   `flags`; renamed keys configured through `TagNames` work the same way.
/// - `nested` - The field is itself a `Record` whose fields are flattened
///   into this one's schema.
/// - `skip` - The field is never described.
///
/// Fields without tags are not described, so their types need no
/// `FieldValue` impl.
///
/// # Example
///
/// ```ignore
/// #[derive(Record)]
/// pub struct Signup {
///     #[record(validator = "required|email", filter = "trim|lower")]
///     email: Option<String>,
///
///     #[record(validator = "min(18)", label = "Age", trigger = "create")]
///     age: u32,
///
///     #[record(nested)]
///     address: Address,
///
///     session: SessionHandle,
/// }
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive(input)
}
