//! Compiled schemas.
//!
//! A [`Schema`] is the flattened, ordered list of [`FieldSpec`]s for one
//! record type. It is produced by the [`SchemaCompiler`], memoised in a
//! [`SchemaCache`], and narrowed per call by [`trigger::select`].

mod cache;
mod compiler;
mod spec;
pub mod trigger;

use std::any::TypeId;

pub use cache::SchemaCache;
pub use compiler::SchemaCompiler;
pub use spec::{BoundFilter, BoundRule, BoundValidator, FieldFlag, FieldSpec};

/// Compiled rule chains of one record type.
#[derive(Debug, Clone)]
pub struct Schema {
    type_name: &'static str,
    type_id: TypeId,
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub(crate) fn new(type_name: &'static str, type_id: TypeId, fields: Vec<FieldSpec>) -> Self {
        Self {
            type_name,
            type_id,
            fields,
        }
    }

    /// Rust type name of the record.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type identity the schema is cached under.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Field specs in execution order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a field by its dotted path.
    #[must_use]
    pub fn field(&self, path: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.path == path)
    }

    /// Number of rule-bearing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field carries rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.fields == other.fields
    }
}
