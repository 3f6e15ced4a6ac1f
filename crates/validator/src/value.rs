//! Dynamic field values and the [`FieldValue`] bridge between typed record
//! fields and the rule engine.
//!
//! Rules never see a field's Rust type. They see a [`Value`] of a known
//! [`ValueKind`], or nothing at all when an optional field is empty. Filters
//! hand a `Value` back and the field's [`FieldValue::store`] decodes it into
//! the declared type, refusing anything that would change that type.

use std::fmt;

use serde::Serialize;

// ============================================================================
// KIND & SHAPE
// ============================================================================

/// Semantic kind of a field, used to dispatch rules.
///
/// For wrapper types (`Option<T>`, `Vec<T>`, `Box<T>`) this is the kind of the
/// contained element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// `bool`
    Bool,
    /// Signed integers.
    Int,
    /// Unsigned integers.
    Uint,
    /// `f32` / `f64`
    Float,
    /// `String`
    Str,
}

impl ValueKind {
    /// Returns `true` for the three numeric kinds.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Uint | Self::Float)
    }

    /// Lower-case name used in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Str => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a field wraps its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shape {
    /// The field holds the element directly.
    #[default]
    Plain,
    /// The field may be empty (`Option<T>`); empty reads as null.
    Optional,
    /// The field holds a sequence of elements (`Vec<T>`).
    List,
}

impl Shape {
    /// Whether the field can hold a null.
    #[must_use]
    pub fn is_nullable(self) -> bool {
        matches!(self, Self::Optional)
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// A field's live value as seen by rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Signed integer widened to 64 bits.
    Int(i64),
    /// Unsigned integer widened to 64 bits.
    Uint(u64),
    /// Floating point widened to 64 bits.
    Float(f64),
    /// Owned string.
    Str(String),
    /// Elements of a `Vec` field.
    List(Vec<Value>),
}

impl Value {
    /// Kind of a scalar value; `None` for lists.
    #[must_use]
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Bool(_) => Some(ValueKind::Bool),
            Self::Int(_) => Some(ValueKind::Int),
            Self::Uint(_) => Some(ValueKind::Uint),
            Self::Float(_) => Some(ValueKind::Float),
            Self::Str(_) => Some(ValueKind::Str),
            Self::List(_) => None,
        }
    }

    /// Short name for diagnostics.
    #[must_use]
    pub fn type_label(&self) -> &'static str {
        self.kind().map_or("list", ValueKind::as_str)
    }

    /// Borrows the string payload.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean payload.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric payload as `f64`, for any numeric variant.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Uint(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Integer payload widened to `i128`; `None` for floats and non-numbers.
    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::Int(n) => Some(i128::from(*n)),
            Self::Uint(n) => Some(i128::from(*n)),
            _ => None,
        }
    }

    /// Borrows the elements of a list value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

// ============================================================================
// STORE ERROR
// ============================================================================

/// A value could not be written back into a field without changing its type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The value's kind differs from the field's kind.
    #[error("expected a {expected} value, got {found}")]
    KindMismatch {
        /// Kind the field stores.
        expected: &'static str,
        /// Kind the filter produced.
        found: &'static str,
    },

    /// The value is of the right kind but does not fit the field's width.
    #[error("value {value} does not fit in {target}")]
    OutOfRange {
        /// Rendered value.
        value: String,
        /// Rust type of the field.
        target: &'static str,
    },

    /// A null was written into a field that cannot hold one.
    #[error("cannot store null into a non-nullable field")]
    NullIntoPlain,
}

impl StoreError {
    /// Builds a [`StoreError::KindMismatch`] for `found`.
    #[must_use]
    pub fn mismatch(expected: &'static str, found: &Value) -> Self {
        Self::KindMismatch {
            expected,
            found: found.type_label(),
        }
    }
}

// ============================================================================
// FIELD VALUE
// ============================================================================

/// Bridge between a typed record field and [`Value`].
///
/// Implemented for the primitive scalars, `String`, and the `Option`, `Box`
/// and `Vec` wrappers. Implement it for your own types (for example an
/// integer-backed enum) to make them usable as rule-bearing fields.
///
/// # Examples
///
/// ```rust,ignore
/// use sieve_validator::{FieldValue, StoreError, Value, ValueKind};
///
/// #[derive(Clone, Copy, PartialEq)]
/// enum Tier { Free = 0, Paid = 1 }
///
/// impl FieldValue for Tier {
///     const KIND: ValueKind = ValueKind::Int;
///     fn zero() -> Value { Value::Int(0) }
///     fn load(&self) -> Option<Value> { Some(Value::Int(*self as i64)) }
///     fn decode(value: Value) -> Result<Self, StoreError> {
///         match value {
///             Value::Int(0) => Ok(Tier::Free),
///             Value::Int(1) => Ok(Tier::Paid),
///             other => Err(StoreError::mismatch("tier", &other)),
///         }
///     }
/// }
/// ```
pub trait FieldValue: Sized + 'static {
    /// Element kind used for rule dispatch.
    const KIND: ValueKind;

    /// Wrapper shape of the field.
    const SHAPE: Shape = Shape::Plain;

    /// The type's zero value, compared against for `allow_zero`.
    fn zero() -> Value;

    /// Reads the current value; `None` means null.
    fn load(&self) -> Option<Value>;

    /// Builds a fresh instance from a value of the field's kind.
    fn decode(value: Value) -> Result<Self, StoreError>;

    /// Writes a filtered value back into the field.
    fn store(&mut self, value: Option<Value>) -> Result<(), StoreError> {
        let value = value.ok_or(StoreError::NullIntoPlain)?;
        *self = Self::decode(value)?;
        Ok(())
    }
}

/// Marker for element types that may appear inside a `Vec` field.
pub trait Scalar: FieldValue {}

macro_rules! signed_field_value {
    ($($ty:ty),* $(,)?) => {$(
        impl FieldValue for $ty {
            const KIND: ValueKind = ValueKind::Int;

            fn zero() -> Value {
                Value::Int(0)
            }

            fn load(&self) -> Option<Value> {
                Some(Value::Int(i64::from(*self)))
            }

            fn decode(value: Value) -> Result<Self, StoreError> {
                match value {
                    Value::Int(n) => <$ty>::try_from(n).map_err(|_| StoreError::OutOfRange {
                        value: n.to_string(),
                        target: stringify!($ty),
                    }),
                    other => Err(StoreError::mismatch("int", &other)),
                }
            }
        }

        impl Scalar for $ty {}
    )*};
}

macro_rules! unsigned_field_value {
    ($($ty:ty),* $(,)?) => {$(
        impl FieldValue for $ty {
            const KIND: ValueKind = ValueKind::Uint;

            fn zero() -> Value {
                Value::Uint(0)
            }

            fn load(&self) -> Option<Value> {
                u64::try_from(*self).ok().map(Value::Uint)
            }

            fn decode(value: Value) -> Result<Self, StoreError> {
                match value {
                    Value::Uint(n) => <$ty>::try_from(n).map_err(|_| StoreError::OutOfRange {
                        value: n.to_string(),
                        target: stringify!($ty),
                    }),
                    other => Err(StoreError::mismatch("uint", &other)),
                }
            }
        }

        impl Scalar for $ty {}
    )*};
}

signed_field_value!(i8, i16, i32, i64);
unsigned_field_value!(u8, u16, u32, u64, usize);

impl FieldValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn zero() -> Value {
        Value::Float(0.0)
    }

    fn load(&self) -> Option<Value> {
        Some(Value::Float(*self))
    }

    fn decode(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Float(n) => Ok(n),
            other => Err(StoreError::mismatch("float", &other)),
        }
    }
}

impl Scalar for f64 {}

impl FieldValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn zero() -> Value {
        Value::Float(0.0)
    }

    fn load(&self) -> Option<Value> {
        Some(Value::Float(f64::from(*self)))
    }

    fn decode(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Float(n) => {
                let narrowed = n as f32;
                if n.is_finite() && !narrowed.is_finite() {
                    return Err(StoreError::OutOfRange {
                        value: n.to_string(),
                        target: "f32",
                    });
                }
                Ok(narrowed)
            }
            other => Err(StoreError::mismatch("float", &other)),
        }
    }
}

impl Scalar for f32 {}

impl FieldValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn zero() -> Value {
        Value::Bool(false)
    }

    fn load(&self) -> Option<Value> {
        Some(Value::Bool(*self))
    }

    fn decode(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(StoreError::mismatch("bool", &other)),
        }
    }
}

impl Scalar for bool {}

impl FieldValue for String {
    const KIND: ValueKind = ValueKind::Str;

    fn zero() -> Value {
        Value::Str(String::new())
    }

    fn load(&self) -> Option<Value> {
        Some(Value::Str(self.clone()))
    }

    fn decode(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(StoreError::mismatch("string", &other)),
        }
    }
}

impl Scalar for String {}

impl<T: FieldValue> FieldValue for Option<T> {
    const KIND: ValueKind = T::KIND;
    const SHAPE: Shape = Shape::Optional;

    fn zero() -> Value {
        T::zero()
    }

    fn load(&self) -> Option<Value> {
        self.as_ref().and_then(FieldValue::load)
    }

    fn decode(value: Value) -> Result<Self, StoreError> {
        T::decode(value).map(Some)
    }

    fn store(&mut self, value: Option<Value>) -> Result<(), StoreError> {
        *self = match value {
            Some(value) => Some(T::decode(value)?),
            None => None,
        };
        Ok(())
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    const KIND: ValueKind = T::KIND;
    const SHAPE: Shape = T::SHAPE;

    fn zero() -> Value {
        T::zero()
    }

    fn load(&self) -> Option<Value> {
        (**self).load()
    }

    fn decode(value: Value) -> Result<Self, StoreError> {
        T::decode(value).map(Box::new)
    }

    fn store(&mut self, value: Option<Value>) -> Result<(), StoreError> {
        (**self).store(value)
    }
}

impl<T: Scalar> FieldValue for Vec<T> {
    const KIND: ValueKind = T::KIND;
    const SHAPE: Shape = Shape::List;

    fn zero() -> Value {
        Value::List(Vec::new())
    }

    fn load(&self) -> Option<Value> {
        Some(Value::List(self.iter().filter_map(FieldValue::load).collect()))
    }

    fn decode(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::List(items) => items.into_iter().map(T::decode).collect(),
            other => Err(StoreError::mismatch("list", &other)),
        }
    }
}

// ============================================================================
// SLOT
// ============================================================================

/// Object-safe view of a field's storage location.
///
/// Blanket-implemented for every [`FieldValue`]; record accessors hand out
/// `&mut dyn Slot` so the executor can read and write a field without knowing
/// its type.
pub trait Slot {
    /// Reads the current value; `None` means null.
    fn read(&self) -> Option<Value>;

    /// Writes a value back, keeping the declared type.
    fn write(&mut self, value: Option<Value>) -> Result<(), StoreError>;
}

impl<T: FieldValue> Slot for T {
    fn read(&self) -> Option<Value> {
        FieldValue::load(self)
    }

    fn write(&mut self, value: Option<Value>) -> Result<(), StoreError> {
        FieldValue::store(self, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn integer_widths_round_trip_through_slots() {
        let mut n: i8 = 5;
        assert_eq!(n.read(), Some(Value::Int(5)));
        n.write(Some(Value::Int(-7))).unwrap();
        assert_eq!(n, -7);
    }

    #[test]
    fn narrow_integer_rejects_out_of_range() {
        let mut n: u8 = 1;
        let err = n.write(Some(Value::Uint(300))).unwrap_err();
        assert!(matches!(err, StoreError::OutOfRange { target: "u8", .. }));
        assert_eq!(n, 1);
    }

    #[test]
    fn f32_rejects_finite_values_past_its_range() {
        let mut ratio: f32 = 0.5;
        let err = ratio.write(Some(Value::Float(1e300))).unwrap_err();
        assert!(matches!(err, StoreError::OutOfRange { target: "f32", .. }));
        assert_eq!(ratio, 0.5);

        ratio.write(Some(Value::Float(f64::INFINITY))).unwrap();
        assert!(ratio.is_infinite());
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let mut s = String::from("x");
        let err = s.write(Some(Value::Int(1))).unwrap_err();
        assert_eq!(
            err,
            StoreError::KindMismatch {
                expected: "string",
                found: "int"
            }
        );
    }

    #[test]
    fn option_reads_none_as_null_and_accepts_null() {
        let mut o: Option<String> = None;
        assert_eq!(o.read(), None);
        o.write(Some("hi".into())).unwrap();
        assert_eq!(o.as_deref(), Some("hi"));
        o.write(None).unwrap();
        assert!(o.is_none());
    }

    #[test]
    fn plain_field_refuses_null() {
        let mut n = 3_i32;
        assert_eq!(n.write(None), Err(StoreError::NullIntoPlain));
    }

    #[test]
    fn wrapper_kinds_resolve_to_element_kind() {
        assert_eq!(<Option<i32> as FieldValue>::KIND, ValueKind::Int);
        assert_eq!(<Vec<String> as FieldValue>::KIND, ValueKind::Str);
        assert_eq!(<Box<Option<u16>> as FieldValue>::KIND, ValueKind::Uint);
        assert_eq!(<Box<Option<u16>> as FieldValue>::SHAPE, Shape::Optional);
        assert_eq!(<Vec<f32> as FieldValue>::SHAPE, Shape::List);
    }

    #[test]
    fn list_values_decode_elementwise() {
        let mut tags = vec![String::from("a")];
        tags.write(Some(Value::List(vec!["x".into(), "y".into()])))
            .unwrap();
        assert_eq!(tags, vec!["x", "y"]);
    }

    #[test]
    fn display_renders_lists() {
        let v = Value::List(vec![Value::Int(1), Value::Str("a".into())]);
        assert_eq!(v.to_string(), "[1, a]");
    }
}
