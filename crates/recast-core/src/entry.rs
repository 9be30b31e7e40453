//! Type entries - what the type registry knows about each registered type.
//!
//! A [`TypeEntry`] describes the shape of a type well enough for converters
//! to act on it: primitives carry their kind, enums their members and
//! underlying representation, optionals their payload type, and sequences
//! their element type plus an explicit construction capability
//! ([`SequenceBuilder`]).

use crate::error::ConvertError;
use crate::{PrimitiveKind, TypeHash};

/// A member of a registered enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// The member name.
    pub name: String,
    /// The underlying integral value.
    pub value: i64,
}

/// A registered enumeration type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    /// The enum name.
    pub name: String,
    /// The integral kind backing the members.
    pub underlying: PrimitiveKind,
    /// The defined members.
    pub members: Vec<EnumMember>,
}

impl EnumEntry {
    /// Create an enum entry. The underlying kind must be integral.
    pub fn new(
        name: impl Into<String>,
        underlying: PrimitiveKind,
        members: Vec<EnumMember>,
    ) -> Result<Self, ConvertError> {
        let name = name.into();
        if !underlying.is_integral() {
            return Err(ConvertError::BadTypeDefinition {
                name,
                detail: format!("enum underlying type must be integral, got {underlying}"),
            });
        }
        Ok(Self {
            name,
            underlying,
            members,
        })
    }

    /// Look up a member by its underlying value.
    pub fn member_by_value(&self, value: i64) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.value == value)
    }

    /// Look up a member by name.
    pub fn member_by_name(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// A registered `optional<T>` wrapper type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalEntry {
    /// Display name (e.g. `optional<int>`).
    pub name: String,
    /// The payload type.
    pub inner: TypeHash,
}

/// How a sequence type is constructed and populated.
///
/// This is the explicit collection-construction capability: a target type
/// declares exactly one strategy at registration time, and the sequence
/// converter dispatches on the variant instead of probing constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceBuilder {
    /// An abstract interface: build the mapped concrete type instead.
    Concrete(TypeHash),
    /// Allocate exactly element-count slots up front, populate by index.
    FixedSize,
    /// Construct empty (optionally pre-sized with the element count), then
    /// append elements one by one.
    Appendable {
        /// Pass the element count to the constructor.
        with_capacity: bool,
    },
    /// Build the named inner sequence type first, then wrap it.
    WrapsInner(TypeHash),
}

/// A registered sequence type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceEntry {
    /// Display name (e.g. `array<int>`).
    pub name: String,
    /// The element type.
    pub element: TypeHash,
    /// The construction capability.
    pub builder: SequenceBuilder,
}

/// A registered opaque type: the engine knows its name and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueEntry {
    /// The type name.
    pub name: String,
}

/// What the registry knows about a registered type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeEntry {
    /// A built-in scalar.
    Primitive(PrimitiveKind),
    /// An enumeration.
    Enum(EnumEntry),
    /// An `optional<T>` wrapper.
    Optional(OptionalEntry),
    /// A sequence/collection.
    Sequence(SequenceEntry),
    /// An opaque user type.
    Opaque(OpaqueEntry),
}

impl TypeEntry {
    /// The display name of the type.
    pub fn name(&self) -> &str {
        match self {
            TypeEntry::Primitive(kind) => kind.name(),
            TypeEntry::Enum(e) => &e.name,
            TypeEntry::Optional(o) => &o.name,
            TypeEntry::Sequence(s) => &s.name,
            TypeEntry::Opaque(o) => &o.name,
        }
    }

    /// Whether a null value inhabits this type.
    pub fn accepts_null(&self) -> bool {
        matches!(
            self,
            TypeEntry::Optional(_) | TypeEntry::Sequence(_) | TypeEntry::Opaque(_)
        )
    }
}
