//! Schema cache keyed by record type.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;

use super::{Schema, SchemaCompiler};
use crate::error::CompileError;
use crate::record::Record;

/// Concurrent map from record type to its compiled schema.
///
/// Entries are populated lazily and never evicted. Two threads compiling the
/// same type at once both do the work; the last insert wins and every reader
/// sees a complete schema either way.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: DashMap<TypeId, Arc<Schema>>,
}

impl SchemaCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached schema for `type_id`, if any.
    #[must_use]
    pub fn get(&self, type_id: TypeId) -> Option<Arc<Schema>> {
        self.entries.get(&type_id).map(|entry| Arc::clone(entry.value()))
    }

    /// Stores a schema, replacing any previous entry for its type.
    pub fn insert(&self, schema: Schema) -> Arc<Schema> {
        let schema = Arc::new(schema);
        self.entries.insert(schema.type_id(), Arc::clone(&schema));
        tracing::debug!(record = schema.type_name(), "cached record schema");
        schema
    }

    /// Returns the cached schema of `R`, compiling it on a miss.
    ///
    /// Failed compilations are not cached.
    pub fn get_or_compile<R: Record>(
        &self,
        compiler: &SchemaCompiler<'_>,
    ) -> Result<Arc<Schema>, CompileError> {
        if let Some(schema) = self.get(TypeId::of::<R>()) {
            tracing::trace!(record = schema.type_name(), "schema cache hit");
            return Ok(schema);
        }
        let schema = compiler.compile::<R>()?;
        Ok(self.insert(schema))
    }

    /// Number of cached schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
