//! Primitive scalar kinds and kind sets.
//!
//! [`PrimitiveKind`] enumerates the built-in scalar types the engine knows
//! how to convert among. [`KindSet`] is a bit set over those kinds, used by
//! the compatibility table to describe which targets a source kind may
//! convert to.

use std::fmt;

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{TypeHash, primitives};

/// Primitive scalar kinds.
///
/// These are the built-in value types with dedicated [`crate::Value`]
/// variants and well-known type hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum PrimitiveKind {
    Bool = 0,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Char,
    Str,
    Timestamp,
}

impl PrimitiveKind {
    /// All primitive kinds, in declaration order.
    pub const ALL: [PrimitiveKind; 14] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Uint8,
        PrimitiveKind::Uint16,
        PrimitiveKind::Uint32,
        PrimitiveKind::Uint64,
        PrimitiveKind::Float32,
        PrimitiveKind::Float64,
        PrimitiveKind::Char,
        PrimitiveKind::Str,
        PrimitiveKind::Timestamp,
    ];

    /// Get the TypeHash for this primitive kind.
    pub const fn type_hash(self) -> TypeHash {
        match self {
            PrimitiveKind::Bool => primitives::BOOL,
            PrimitiveKind::Int8 => primitives::INT8,
            PrimitiveKind::Int16 => primitives::INT16,
            PrimitiveKind::Int32 => primitives::INT32,
            PrimitiveKind::Int64 => primitives::INT64,
            PrimitiveKind::Uint8 => primitives::UINT8,
            PrimitiveKind::Uint16 => primitives::UINT16,
            PrimitiveKind::Uint32 => primitives::UINT32,
            PrimitiveKind::Uint64 => primitives::UINT64,
            PrimitiveKind::Float32 => primitives::FLOAT,
            PrimitiveKind::Float64 => primitives::DOUBLE,
            PrimitiveKind::Char => primitives::CHAR,
            PrimitiveKind::Str => primitives::STRING,
            PrimitiveKind::Timestamp => primitives::TIMESTAMP,
        }
    }

    /// Get the primitive kind for a well-known type hash, if it is one.
    pub fn from_type_hash(hash: TypeHash) -> Option<PrimitiveKind> {
        match hash {
            primitives::BOOL => Some(PrimitiveKind::Bool),
            primitives::INT8 => Some(PrimitiveKind::Int8),
            primitives::INT16 => Some(PrimitiveKind::Int16),
            primitives::INT32 => Some(PrimitiveKind::Int32),
            primitives::INT64 => Some(PrimitiveKind::Int64),
            primitives::UINT8 => Some(PrimitiveKind::Uint8),
            primitives::UINT16 => Some(PrimitiveKind::Uint16),
            primitives::UINT32 => Some(PrimitiveKind::Uint32),
            primitives::UINT64 => Some(PrimitiveKind::Uint64),
            primitives::FLOAT => Some(PrimitiveKind::Float32),
            primitives::DOUBLE => Some(PrimitiveKind::Float64),
            primitives::CHAR => Some(PrimitiveKind::Char),
            primitives::STRING => Some(PrimitiveKind::Str),
            primitives::TIMESTAMP => Some(PrimitiveKind::Timestamp),
            _ => None,
        }
    }

    /// Get the name of this primitive kind.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Uint8 => "uint8",
            PrimitiveKind::Uint16 => "uint16",
            PrimitiveKind::Uint32 => "uint",
            PrimitiveKind::Uint64 => "uint64",
            PrimitiveKind::Float32 => "float",
            PrimitiveKind::Float64 => "double",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Str => "string",
            PrimitiveKind::Timestamp => "timestamp",
        }
    }

    /// True for the eight integer kinds.
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int8
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
                | PrimitiveKind::Uint8
                | PrimitiveKind::Uint16
                | PrimitiveKind::Uint32
                | PrimitiveKind::Uint64
        )
    }

    /// True for the floating point kinds.
    pub const fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::Float32 | PrimitiveKind::Float64)
    }

    /// True for integral and floating point kinds.
    pub const fn is_numeric(self) -> bool {
        self.is_integral() || self.is_float()
    }

    /// The self-declared compatibility check: conversions among numeric
    /// kinds and to string are always plausible, regardless of the rule
    /// table.
    pub const fn intrinsically_convertible_to(self, target: PrimitiveKind) -> bool {
        (self.is_numeric() && target.is_numeric()) || matches!(target, PrimitiveKind::Str)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

bitflags! {
    /// A set of primitive kinds, one bit per [`PrimitiveKind`].
    ///
    /// Used by the compatibility table to describe allowed conversion
    /// targets; additive registrations are combined with bitwise OR.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KindSet: u16 {
        const BOOL = 1 << (PrimitiveKind::Bool as u8);
        const INT8 = 1 << (PrimitiveKind::Int8 as u8);
        const INT16 = 1 << (PrimitiveKind::Int16 as u8);
        const INT32 = 1 << (PrimitiveKind::Int32 as u8);
        const INT64 = 1 << (PrimitiveKind::Int64 as u8);
        const UINT8 = 1 << (PrimitiveKind::Uint8 as u8);
        const UINT16 = 1 << (PrimitiveKind::Uint16 as u8);
        const UINT32 = 1 << (PrimitiveKind::Uint32 as u8);
        const UINT64 = 1 << (PrimitiveKind::Uint64 as u8);
        const FLOAT32 = 1 << (PrimitiveKind::Float32 as u8);
        const FLOAT64 = 1 << (PrimitiveKind::Float64 as u8);
        const CHAR = 1 << (PrimitiveKind::Char as u8);
        const STR = 1 << (PrimitiveKind::Str as u8);
        const TIMESTAMP = 1 << (PrimitiveKind::Timestamp as u8);

        /// All eight integer kinds.
        const INTEGERS = Self::INT8.bits()
            | Self::INT16.bits()
            | Self::INT32.bits()
            | Self::INT64.bits()
            | Self::UINT8.bits()
            | Self::UINT16.bits()
            | Self::UINT32.bits()
            | Self::UINT64.bits();

        /// Both floating point kinds.
        const FLOATS = Self::FLOAT32.bits() | Self::FLOAT64.bits();

        /// Integers and floats.
        const NUMERIC = Self::INTEGERS.bits() | Self::FLOATS.bits();

        /// The string kind.
        const TEXT = Self::STR.bits();

        /// The boolean kind.
        const BOOLEAN = Self::BOOL.bits();

        /// The character kind.
        const CHARACTER = Self::CHAR.bits();

        /// The date/time kind.
        const TEMPORAL = Self::TIMESTAMP.bits();
    }
}

impl KindSet {
    /// The singleton set containing one kind.
    #[inline]
    pub fn from_kind(kind: PrimitiveKind) -> KindSet {
        KindSet::from_bits_truncate(1u16 << u8::from(kind))
    }

    /// Check whether a kind is in the set.
    #[inline]
    pub fn contains_kind(self, kind: PrimitiveKind) -> bool {
        self.contains(KindSet::from_kind(kind))
    }
}
