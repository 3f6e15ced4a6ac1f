//! Value accessor for a single field.

use crate::value::{Shape, Slot, StoreError, Value, ValueKind};

/// Live view of one field's storage location.
///
/// The executor resolves an accessor once per field and then reads the
/// current value before each rule and writes filter output back through it.
pub struct FieldAccessor<'r> {
    slot: &'r mut dyn Slot,
    kind: ValueKind,
    shape: Shape,
}

impl<'r> FieldAccessor<'r> {
    /// Wraps a resolved storage slot.
    pub fn new(slot: &'r mut dyn Slot, kind: ValueKind, shape: Shape) -> Self {
        Self { slot, kind, shape }
    }

    /// Element kind of the field.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Wrapper shape of the field.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Whether the field can hold a null at all.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.shape.is_nullable()
    }

    /// Whether the field is currently null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.is_nullable() && self.slot.read().is_none()
    }

    /// Current value with wrappers stripped; `None` when null.
    #[must_use]
    pub fn load(&self) -> Option<Value> {
        self.slot.read()
    }

    /// Writes a value back, keeping the field's declared type.
    pub fn store(&mut self, value: Option<Value>) -> Result<(), StoreError> {
        self.slot.write(value)
    }
}

impl std::fmt::Debug for FieldAccessor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("kind", &self.kind)
            .field("shape", &self.shape)
            .field("value", &self.slot.read())
            .finish()
    }
}
