//! Core data model for the recast conversion engine.
//!
//! This crate holds everything the converters operate on, with no
//! conversion logic of its own:
//!
//! - [`TypeHash`] - deterministic hash-based type identity
//! - [`PrimitiveKind`] / [`KindSet`] - the scalar taxonomy
//! - [`Value`] - the dynamically typed runtime value
//! - [`TypeEntry`] / [`TypeRegistry`] - runtime type descriptions
//! - [`ConvertError`] - the failure taxonomy
//! - [`FormatContext`] - locale context for scalar text conversions

pub mod entry;
pub mod error;
pub mod format;
pub mod primitive;
pub mod registry;
pub mod type_hash;
pub mod value;

pub use entry::{
    EnumEntry, EnumMember, OpaqueEntry, OptionalEntry, SequenceBuilder, SequenceEntry, TypeEntry,
};
pub use error::ConvertError;
pub use format::FormatContext;
pub use primitive::{KindSet, PrimitiveKind};
pub use registry::TypeRegistry;
pub use type_hash::{TypeHash, primitives};
pub use value::{EnumValue, ObjectData, ObjectRef, Sequence, Value};
