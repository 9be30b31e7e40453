//! Conversion strategies.
//!
//! Every strategy implements [`Converter`]: a pure capability predicate, a
//! numeric priority used to rank overlapping strategies, and the conversion
//! itself. Strategies are stateless or carry only configuration; none of
//! them mutates shared state during a conversion, which is what makes
//! concurrent reads of a populated registry safe.

use recast_core::{ConvertError, FormatContext, TypeHash, Value};

use crate::registry::ConverterRegistry;

mod delegate;
mod enumeration;
mod identity;
mod null;
mod optional;
mod primitive;
mod sequence;
mod string_fallback;

pub use delegate::DelegateConverter;
pub use enumeration::EnumConverter;
pub use identity::IdentityConverter;
pub use null::NullConverter;
pub use optional::OptionalConverter;
pub use primitive::{CompatibilityRules, PrimitiveConverter};
pub use sequence::SequenceConverter;
pub use string_fallback::StringFallbackConverter;

/// A conversion strategy.
///
/// The registry queries [`Converter::can_convert`] for every registered
/// strategy, ranks the candidates by [`Converter::priority`], and invokes
/// the winner's [`Converter::convert`]. Structured strategies receive the
/// registry so they can delegate nested conversions back to it.
pub trait Converter {
    /// A short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this strategy can handle the (source, target) pair. A `None`
    /// source means the value is absent and its type unknown. Must be pure;
    /// may consult the registry for nested feasibility.
    fn can_convert(
        &self,
        source: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
    ) -> bool;

    /// The rank of this strategy for the pair, against other accepting
    /// strategies. Higher wins; ties go to the first registered.
    fn priority(&self, source: Option<TypeHash>, target: TypeHash) -> i32;

    /// Perform the conversion. Only called when [`Converter::can_convert`]
    /// accepted the pair; converters still defend against misuse with
    /// [`ConvertError::InvalidCast`].
    fn convert(
        &self,
        value: Value,
        source: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
        fmt: &FormatContext,
    ) -> Result<Value, ConvertError>;
}

/// Default priorities of the built-in strategies.
///
/// The ladder encodes which strategy wins when several accept the same
/// pair: identity beats everything, the null strategy beats the optional
/// wrapper for absent values, and the string fallback loses to any
/// converter with a real string path.
pub mod priority {
    /// Source equals target, or the target is `any`.
    pub const IDENTITY: i32 = 100;

    /// Absent value into a null-accepting target.
    pub const NULL: i32 = 90;

    /// Default for user-supplied delegate converters.
    pub const DELEGATE: i32 = 85;

    /// Optional wrapper unwrap/re-wrap.
    pub const OPTIONAL: i32 = 80;

    /// Enumeration to/from its underlying representation.
    pub const ENUM: i32 = 70;

    /// Scalar conversions.
    pub const PRIMITIVE: i32 = 60;

    /// Sequence/collection construction.
    pub const SEQUENCE: i32 = 50;

    /// Last-resort textual representation.
    pub const STRING_FALLBACK: i32 = 10;
}
