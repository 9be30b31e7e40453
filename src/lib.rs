//! recast - a runtime value-conversion engine.
//!
//! Given a dynamically typed [`Value`] and a target type, the engine finds
//! the best registered strategy and applies it, recursing through optional
//! wrappers, enumerations and sequences via a single dispatch point.
//!
//! ## Architecture
//!
//! - [`ConverterRegistry`] - holds an ordered set of [`Converter`]
//!   strategies and performs dispatch: filter by capability, select the
//!   highest priority, invoke the winner. Structured converters call back
//!   into the registry for nested values, so arbitrary compositions
//!   (a sequence of optional enumerations, say) resolve through repeated
//!   dispatch rather than bespoke recursive code.
//! - [`Converter`] - the strategy contract: a capability predicate, a
//!   priority for ranking overlapping strategies, and the conversion
//!   itself.
//! - `recast-core` - the data model: values, type hashes, the type
//!   registry, errors.
//!
//! ## Example
//!
//! ```
//! use recast::{ConverterRegistry, FormatContext, Value, primitives};
//!
//! let registry = ConverterRegistry::with_defaults();
//! let fmt = FormatContext::default();
//!
//! let n = registry
//!     .convert(Value::from("42"), Some(primitives::STRING), primitives::INT32, &fmt)
//!     .unwrap();
//! assert_eq!(n, Value::I32(42));
//! ```

pub mod converters;
pub mod registry;

pub use converters::{
    CompatibilityRules, Converter, DelegateConverter, EnumConverter, IdentityConverter,
    NullConverter, OptionalConverter, PrimitiveConverter, SequenceConverter,
    StringFallbackConverter, priority,
};
pub use registry::ConverterRegistry;

pub use recast_core::{
    ConvertError, EnumEntry, EnumMember, EnumValue, FormatContext, KindSet, ObjectData, ObjectRef,
    OpaqueEntry, OptionalEntry, PrimitiveKind, Sequence, SequenceBuilder, SequenceEntry, TypeEntry,
    TypeHash, TypeRegistry, Value, primitives,
};

/// Common imports for engine users.
pub mod prelude {
    pub use crate::converters::{Converter, DelegateConverter, priority};
    pub use crate::registry::ConverterRegistry;
    pub use recast_core::{
        ConvertError, FormatContext, PrimitiveKind, SequenceBuilder, TypeHash, TypeRegistry, Value,
        primitives,
    };
}
