//! Dynamic runtime values.
//!
//! [`Value`] is the engine's type-erased value representation. Scalar
//! variants keep their exact width so narrowing stays observable; structured
//! variants (enums, optionals, sequences, opaque objects) carry the type
//! hash they were built with.
//!
//! `Value` does not implement `Copy`; conversions take values by value and
//! the identity path hands the same value straight back.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::{PrimitiveKind, TypeHash, primitives};

/// Data stored behind an opaque object value.
///
/// Implemented automatically for any `'static` type that is `Debug` and
/// `Display`; `Display` supplies the textual representation used by the
/// string fallback conversion.
pub trait ObjectData: Any + fmt::Debug + fmt::Display {
    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + fmt::Display> ObjectData for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A shared reference to an opaque user value.
///
/// Equality is identity: two refs are equal when they point at the same
/// allocation and carry the same type.
#[derive(Debug, Clone)]
pub struct ObjectRef {
    /// The registered type of the object.
    pub ty: TypeHash,
    data: Rc<dyn ObjectData>,
}

impl ObjectRef {
    /// Wrap an object value under a registered type hash.
    pub fn new(ty: TypeHash, data: Rc<dyn ObjectData>) -> Self {
        Self { ty, data }
    }

    /// Borrow the stored data.
    pub fn data(&self) -> &dyn ObjectData {
        &*self.data
    }

    /// Downcast the stored data to a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.as_any().downcast_ref()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && Rc::ptr_eq(&self.data, &other.data)
    }
}

/// An enumeration member value: the enum type, the member name, and the
/// underlying integral value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    /// The enumeration type.
    pub ty: TypeHash,
    /// The member name, as registered.
    pub member: String,
    /// The underlying integral value.
    pub value: i64,
}

/// A sequence value: ordered elements tagged with the sequence type they
/// were built as.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    /// The sequence type (e.g. `array<int>`, `list<string>`).
    pub ty: TypeHash,
    /// The elements, in order.
    pub items: Vec<Value>,
}

impl Sequence {
    /// Create a sequence value.
    pub fn new(ty: TypeHash, items: Vec<Value>) -> Self {
        Self { ty, items }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

/// A dynamically typed runtime value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// 8-bit signed integer.
    I8(i8),
    /// 16-bit signed integer.
    I16(i16),
    /// 32-bit signed integer.
    I32(i32),
    /// 64-bit signed integer.
    I64(i64),
    /// 8-bit unsigned integer.
    U8(u8),
    /// 16-bit unsigned integer.
    U16(u16),
    /// 32-bit unsigned integer.
    U32(u32),
    /// 64-bit unsigned integer.
    U64(u64),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// Unicode scalar.
    Char(char),
    /// Owned string.
    Str(String),
    /// UTC date/time.
    Timestamp(DateTime<Utc>),
    /// Enumeration member.
    Enum(EnumValue),
    /// Present payload of an optional type.
    Some(Box<Value>),
    /// Sequence of values.
    Seq(Sequence),
    /// Opaque user object.
    Object(ObjectRef),
}

impl Value {
    /// True for [`Value::Null`].
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The primitive kind of a scalar value, `None` for structured values
    /// and null.
    pub fn kind(&self) -> Option<PrimitiveKind> {
        match self {
            Value::Bool(_) => Some(PrimitiveKind::Bool),
            Value::I8(_) => Some(PrimitiveKind::Int8),
            Value::I16(_) => Some(PrimitiveKind::Int16),
            Value::I32(_) => Some(PrimitiveKind::Int32),
            Value::I64(_) => Some(PrimitiveKind::Int64),
            Value::U8(_) => Some(PrimitiveKind::Uint8),
            Value::U16(_) => Some(PrimitiveKind::Uint16),
            Value::U32(_) => Some(PrimitiveKind::Uint32),
            Value::U64(_) => Some(PrimitiveKind::Uint64),
            Value::F32(_) => Some(PrimitiveKind::Float32),
            Value::F64(_) => Some(PrimitiveKind::Float64),
            Value::Char(_) => Some(PrimitiveKind::Char),
            Value::Str(_) => Some(PrimitiveKind::Str),
            Value::Timestamp(_) => Some(PrimitiveKind::Timestamp),
            _ => None,
        }
    }

    /// Infer the type hash of this value, `None` for null.
    ///
    /// Optional payloads hash as `optional<inner>` template instances;
    /// structured values report the hash they carry.
    pub fn type_of(&self) -> Option<TypeHash> {
        match self {
            Value::Null => None,
            Value::Enum(e) => Some(e.ty),
            Value::Some(inner) => inner
                .type_of()
                .map(|ih| TypeHash::from_template_instance(primitives::OPTIONAL, &[ih])),
            Value::Seq(s) => Some(s.ty),
            Value::Object(o) => Some(o.ty),
            scalar => scalar.kind().map(PrimitiveKind::type_hash),
        }
    }

    /// Extract an integral value as `i128`, covering the full `u64` range.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::I8(v) => Some(*v as i128),
            Value::I16(v) => Some(*v as i128),
            Value::I32(v) => Some(*v as i128),
            Value::I64(v) => Some(*v as i128),
            Value::U8(v) => Some(*v as i128),
            Value::U16(v) => Some(*v as i128),
            Value::U32(v) => Some(*v as i128),
            Value::U64(v) => Some(*v as i128),
            _ => None,
        }
    }

    /// Extract a floating point value as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Turn an optional-shaped value into a plain `Option`: null becomes
    /// `None`, a wrapped payload is unwrapped, anything else is passed
    /// through as `Some`.
    pub fn into_option(self) -> Option<Value> {
        match self {
            Value::Null => None,
            Value::Some(inner) => Some(*inner),
            other => Some(other),
        }
    }

    /// A short name for the value's shape, for diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Enum(_) => "enum",
            Value::Some(_) => "optional",
            Value::Seq(_) => "sequence",
            Value::Object(_) => "object",
            scalar => scalar.kind().map(PrimitiveKind::name).unwrap_or("value"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{}", v),
            Value::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            Value::Enum(e) => write!(f, "{}", e.member),
            Value::Some(inner) => write!(f, "{}", inner),
            Value::Seq(s) => {
                write!(f, "[")?;
                for (i, item) in s.items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(o) => write!(f, "{}", o.data()),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => Str,
    DateTime<Utc> => Timestamp,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_kinds() {
        assert_eq!(Value::from(true).kind(), Some(PrimitiveKind::Bool));
        assert_eq!(Value::from(42i32).kind(), Some(PrimitiveKind::Int32));
        assert_eq!(Value::from(42u64).kind(), Some(PrimitiveKind::Uint64));
        assert_eq!(Value::from(3.14f64).kind(), Some(PrimitiveKind::Float64));
        assert_eq!(Value::from("hi").kind(), Some(PrimitiveKind::Str));
        assert_eq!(Value::Null.kind(), None);
    }

    #[test]
    fn type_inference() {
        assert_eq!(Value::from(1i32).type_of(), Some(primitives::INT32));
        assert_eq!(Value::Null.type_of(), None);

        let wrapped = Value::Some(Box::new(Value::from(1i32)));
        let expected =
            TypeHash::from_template_instance(primitives::OPTIONAL, &[primitives::INT32]);
        assert_eq!(wrapped.type_of(), Some(expected));
    }

    #[test]
    fn integral_extraction_covers_u64() {
        assert_eq!(Value::from(u64::MAX).as_i128(), Some(u64::MAX as i128));
        assert_eq!(Value::from(-1i8).as_i128(), Some(-1));
        assert_eq!(Value::from(3.0f64).as_i128(), None);
    }

    #[test]
    fn into_option_unwraps() {
        assert_eq!(Value::Null.into_option(), None);
        assert_eq!(
            Value::Some(Box::new(Value::from(5i32))).into_option(),
            Some(Value::from(5i32))
        );
        assert_eq!(Value::from(5i32).into_option(), Some(Value::from(5i32)));
    }

    #[test]
    fn display_scalars() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(42i32).to_string(), "42");
        assert_eq!(Value::from(3.14f64).to_string(), "3.14");
        assert_eq!(Value::from('x').to_string(), "x");
        assert_eq!(Value::from("hello").to_string(), "hello");
    }

    #[test]
    fn display_structured() {
        let seq = Value::Seq(Sequence::new(
            TypeHash::from_name("list<int>"),
            vec![Value::from(1i32), Value::from(2i32), Value::from(3i32)],
        ));
        assert_eq!(seq.to_string(), "[1, 2, 3]");

        let member = Value::Enum(EnumValue {
            ty: TypeHash::from_name("Weekday"),
            member: "Wednesday".to_string(),
            value: 3,
        });
        assert_eq!(member.to_string(), "Wednesday");

        let wrapped = Value::Some(Box::new(Value::from(7i32)));
        assert_eq!(wrapped.to_string(), "7");
    }

    #[test]
    fn object_identity_equality() {
        let ty = TypeHash::from_name("Widget");
        let data: Rc<dyn ObjectData> = Rc::new(42i32);
        let a = Value::Object(ObjectRef::new(ty, data.clone()));
        let b = Value::Object(ObjectRef::new(ty, data));
        let c = Value::Object(ObjectRef::new(ty, Rc::new(42i32)));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn object_downcast() {
        let ty = TypeHash::from_name("Widget");
        let obj = ObjectRef::new(ty, Rc::new("payload".to_string()));
        assert_eq!(obj.downcast_ref::<String>().map(String::as_str), Some("payload"));
        assert!(obj.downcast_ref::<i32>().is_none());
    }
}
