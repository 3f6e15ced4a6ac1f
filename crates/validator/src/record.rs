//! Record introspection.
//!
//! A [`Record`] describes itself once per type through a [`RecordShape`]: its
//! fields in declaration order, the raw tags attached to each, and plain
//! function pointers that resolve a field's storage on a live instance. The
//! schema compiler consumes the shape; nothing here knows about rules.
//!
//! The shape is normally generated with `#[derive(Record)]`:
//!
//! ```rust,ignore
//! use sieve_validator::Record;
//!
//! #[derive(Record)]
//! struct Signup {
//!     #[record(validator = "required|email", filter = "trim|lower")]
//!     email: Option<String>,
//!
//!     #[record(validator = "min(18)", label = "Age")]
//!     age: u32,
//!
//!     #[record(nested)]
//!     address: Address,
//! }
//! ```

use std::any::Any;
use std::fmt;

use crate::value::{FieldValue, Shape, Slot, Value, ValueKind};

/// Resolves a leaf field's storage on a type-erased record.
///
/// Returns `None` when the record is not of the expected type.
pub type Locate = for<'a> fn(&'a mut (dyn Any + 'static)) -> Option<&'a mut dyn Slot>;

/// Resolves a nested record on a type-erased parent record.
pub type Project =
    for<'a> fn(&'a mut (dyn Any + 'static)) -> Option<&'a mut (dyn Any + 'static)>;

/// A structured type whose fields can carry rule declarations.
pub trait Record: Any {
    /// Describes the record's fields in declaration order.
    fn shape() -> RecordShape;
}

/// Field-level description of one record type.
#[derive(Clone)]
pub struct RecordShape {
    /// Fully-qualified Rust type name, for diagnostics.
    pub type_name: &'static str,
    /// Fields in declaration order.
    pub fields: Vec<FieldDecl>,
}

impl RecordShape {
    /// Starts an empty shape for `R`.
    #[must_use]
    pub fn of<R: Record>() -> Self {
        Self {
            type_name: std::any::type_name::<R>(),
            fields: Vec::new(),
        }
    }

    /// Appends a field declaration.
    #[must_use]
    pub fn field(mut self, decl: FieldDecl) -> Self {
        self.fields.push(decl);
        self
    }
}

impl fmt::Debug for RecordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordShape")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// One declared field and its raw tags.
#[derive(Clone, Copy)]
pub struct FieldDecl {
    /// Field identifier as written in the source.
    pub name: &'static str,
    /// Raw `key = "value"` tags in attribute order.
    pub tags: &'static [(&'static str, &'static str)],
    /// How to reach the field's value.
    pub access: FieldAccess,
}

impl FieldDecl {
    /// Declares a leaf field of type `T`.
    #[must_use]
    pub fn leaf<T: FieldValue>(
        name: &'static str,
        tags: &'static [(&'static str, &'static str)],
        locate: Locate,
    ) -> Self {
        Self {
            name,
            tags,
            access: FieldAccess::Leaf(LeafAccess::of::<T>(locate)),
        }
    }

    /// Declares a nested record field of type `R`.
    #[must_use]
    pub fn nested<R: Record>(
        name: &'static str,
        tags: &'static [(&'static str, &'static str)],
        project: Project,
    ) -> Self {
        Self {
            name,
            tags,
            access: FieldAccess::Nested(NestedAccess::of::<R>(project)),
        }
    }

    /// Looks up a tag by key. The first occurrence wins.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| *value)
    }
}

impl fmt::Debug for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDecl")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("access", &self.access)
            .finish()
    }
}

/// Leaf or nested access to a declared field.
#[derive(Clone, Copy)]
pub enum FieldAccess {
    /// A value field rules run against.
    Leaf(LeafAccess),
    /// A sub-record whose fields are flattened into the parent's schema.
    Nested(NestedAccess),
}

impl fmt::Debug for FieldAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(leaf) => f
                .debug_struct("Leaf")
                .field("type_name", &leaf.type_name)
                .field("kind", &leaf.kind)
                .field("shape", &leaf.shape)
                .finish_non_exhaustive(),
            Self::Nested(nested) => f
                .debug_struct("Nested")
                .field("type_name", &nested.type_name)
                .finish_non_exhaustive(),
        }
    }
}

/// Static type information and accessor for a leaf field.
#[derive(Clone, Copy)]
pub struct LeafAccess {
    /// Rust type name of the field.
    pub type_name: &'static str,
    /// Element kind for rule dispatch.
    pub kind: ValueKind,
    /// Wrapper shape.
    pub shape: Shape,
    /// Zero value constructor.
    pub zero: fn() -> Value,
    /// Storage resolver.
    pub locate: Locate,
}

impl LeafAccess {
    /// Captures `T`'s kind, shape and zero value.
    #[must_use]
    pub fn of<T: FieldValue>(locate: Locate) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            kind: T::KIND,
            shape: T::SHAPE,
            zero: T::zero,
            locate,
        }
    }
}

/// Shape function and projection for a nested record field.
#[derive(Clone, Copy)]
pub struct NestedAccess {
    /// Rust type name of the nested record.
    pub type_name: &'static str,
    /// The nested record's own shape.
    pub shape: fn() -> RecordShape,
    /// Projection from the parent record to the nested one.
    pub project: Project,
}

impl NestedAccess {
    /// Captures `R`'s shape function.
    #[must_use]
    pub fn of<R: Record>(project: Project) -> Self {
        Self {
            type_name: std::any::type_name::<R>(),
            shape: R::shape,
            project,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i32,
    }

    impl Record for Point {
        fn shape() -> RecordShape {
            RecordShape::of::<Self>().field(FieldDecl::leaf::<i32>(
                "x",
                &[("validator", "min(0)"), ("validator", "max(9)")],
                |record| {
                    record
                        .downcast_mut::<Self>()
                        .map(|r| &mut r.x as &mut dyn Slot)
                },
            ))
        }
    }

    #[test]
    fn first_tag_occurrence_wins() {
        let shape = Point::shape();
        assert_eq!(shape.fields[0].tag("validator"), Some("min(0)"));
        assert_eq!(shape.fields[0].tag("filter"), None);
    }

    #[test]
    fn locate_resolves_live_storage() {
        let shape = Point::shape();
        let FieldAccess::Leaf(leaf) = shape.fields[0].access else {
            panic!("expected a leaf field");
        };
        assert_eq!(leaf.kind, ValueKind::Int);

        let mut point = Point { x: 4 };
        let slot = (leaf.locate)(&mut point).unwrap();
        slot.write(Some(Value::Int(7))).unwrap();
        assert_eq!(point.x, 7);
    }

    #[test]
    fn locate_rejects_foreign_records() {
        let shape = Point::shape();
        let FieldAccess::Leaf(leaf) = shape.fields[0].access else {
            panic!("expected a leaf field");
        };
        let mut other = String::new();
        assert!((leaf.locate)(&mut other).is_none());
    }
}
