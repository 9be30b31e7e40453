//! Error types for the conversion engine.
//!
//! Every failure surfaces to the caller: the engine never substitutes a
//! default value, never retries, and never falls back to a second converter
//! once dispatch has selected a winner. Structural converters attach
//! context by wrapping nested causes ([`ConvertError::ConversionFailed`],
//! [`ConvertError::Element`]); the sequence converter combines its two
//! interpretation attempts into [`ConvertError::Aggregate`].

use thiserror::Error;

use crate::TypeHash;

/// Errors raised by conversion dispatch and the individual converters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// No registered converter accepts the (source, target) pair.
    #[error("no converter registered for {from} -> {target}")]
    NoConverterFound {
        /// The source type name, or `null` for an absent source.
        from: String,
        /// The target type name.
        target: String,
    },

    /// A nested conversion raised; the original cause is attached.
    #[error("conversion from {source} to {target} failed: {cause}")]
    ConversionFailed {
        /// The source type name.
        source: String,
        /// The target type name.
        target: String,
        /// The underlying failure.
        #[source]
        cause: Box<ConvertError>,
    },

    /// An enumeration conversion produced a value with no defined member.
    #[error("value {value} is not a defined member of enum '{enum_name}'")]
    InvalidEnumValue {
        /// The offending underlying value.
        value: i128,
        /// The enumeration name.
        enum_name: String,
    },

    /// A null value could not be accepted by a non-optional target.
    #[error("null cannot be converted to non-nullable type {target}")]
    NullToNonNullable {
        /// The target type name.
        target: String,
    },

    /// A converter was invoked outside its own preconditions.
    #[error("cannot cast {from} to {to}")]
    InvalidCast {
        /// Description of the source.
        from: String,
        /// Description of the target.
        to: String,
    },

    /// An integral value does not fit in the target kind.
    #[error("integer overflow: {value} does not fit in {target}")]
    IntegerOverflow {
        /// The value that overflowed.
        value: i128,
        /// The target kind name.
        target: &'static str,
    },

    /// A floating point value does not fit in the target kind.
    #[error("float overflow: {value} does not fit in {target}")]
    FloatOverflow {
        /// The value that overflowed.
        value: f64,
        /// The target kind name.
        target: &'static str,
    },

    /// Text could not be parsed as the target kind.
    #[error("cannot parse '{text}' as {target}")]
    ParseFailed {
        /// The text that failed to parse.
        text: String,
        /// The target kind name.
        target: &'static str,
    },

    /// A sequence element failed to convert.
    #[error("element {index}: {cause}")]
    Element {
        /// The element index.
        index: usize,
        /// The underlying failure.
        cause: Box<ConvertError>,
    },

    /// Every interpretation of the input failed; all causes are kept.
    #[error("all conversion attempts failed: {}", join_attempts(.attempts))]
    Aggregate {
        /// The failures, in attempt order.
        attempts: Vec<ConvertError>,
    },

    /// A type hash has no registry entry.
    #[error("type {hash} is not registered")]
    UnknownType {
        /// The unregistered hash.
        hash: TypeHash,
    },

    /// A type was registered with an unusable definition.
    #[error("invalid type definition '{name}': {detail}")]
    BadTypeDefinition {
        /// The type name.
        name: String,
        /// What is wrong with it.
        detail: String,
    },
}

impl ConvertError {
    /// The root cause, unwrapping context layers.
    pub fn root_cause(&self) -> &ConvertError {
        match self {
            ConvertError::ConversionFailed { cause, .. } => cause.root_cause(),
            ConvertError::Element { cause, .. } => cause.root_cause(),
            other => other,
        }
    }

    /// Check if this is a missing-converter failure.
    pub fn is_no_converter(&self) -> bool {
        matches!(self, ConvertError::NoConverterFound { .. })
    }
}

fn join_attempts(attempts: &[ConvertError]) -> String {
    attempts
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_converter_display() {
        let err = ConvertError::NoConverterFound {
            from: "Widget".to_string(),
            target: "int".to_string(),
        };
        assert_eq!(format!("{err}"), "no converter registered for Widget -> int");
        assert!(err.is_no_converter());
    }

    #[test]
    fn invalid_enum_display() {
        let err = ConvertError::InvalidEnumValue {
            value: 9999,
            enum_name: "Weekday".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "value 9999 is not a defined member of enum 'Weekday'"
        );
    }

    #[test]
    fn overflow_display() {
        let err = ConvertError::IntegerOverflow { value: 300, target: "int8" };
        assert_eq!(format!("{err}"), "integer overflow: 300 does not fit in int8");
    }

    #[test]
    fn aggregate_joins_causes() {
        let err = ConvertError::Aggregate {
            attempts: vec![
                ConvertError::InvalidCast {
                    from: "int".to_string(),
                    to: "array<int>".to_string(),
                },
                ConvertError::ParseFailed { text: "x".to_string(), target: "int" },
            ],
        };
        let text = format!("{err}");
        assert!(text.contains("cannot cast int to array<int>"));
        assert!(text.contains("cannot parse 'x' as int"));
    }

    #[test]
    fn root_cause_unwraps_context() {
        let inner = ConvertError::IntegerOverflow { value: 300, target: "int8" };
        let err = ConvertError::ConversionFailed {
            source: "int".to_string(),
            target: "int8".to_string(),
            cause: Box::new(ConvertError::Element {
                index: 2,
                cause: Box::new(inner.clone()),
            }),
        };
        assert_eq!(err.root_cause(), &inner);
    }
}
