//! Optional-wrapper conversion: unwrap or re-wrap `optional<T>` on either
//! side of the pair, delegating the payload conversion back to the registry.

use recast_core::{ConvertError, FormatContext, TypeHash, Value};

use crate::converters::{Converter, priority};
use crate::registry::ConverterRegistry;

/// Bridges `optional<T>` wrappers and their payload types.
///
/// Accepts when at least one side is a registered wrapper type and the
/// unwrapped pair is itself convertible; an absent source passes the inner
/// check as "optional of unknown payload". Null values become null when the
/// target accepts absence and fail otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalConverter;

impl Converter for OptionalConverter {
    fn name(&self) -> &'static str {
        "optional"
    }

    fn can_convert(
        &self,
        source: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
    ) -> bool {
        let types = registry.types();
        let src_inner = source.and_then(|s| types.as_optional(s)).map(|e| e.inner);
        let tgt_inner = types.as_optional(target).map(|e| e.inner);
        if src_inner.is_none() && tgt_inner.is_none() {
            return false;
        }
        let inner_source = match source {
            Some(s) => Some(src_inner.unwrap_or(s)),
            None => None,
        };
        let inner_target = tgt_inner.unwrap_or(target);
        registry.can_convert(inner_source, inner_target)
    }

    fn priority(&self, _source: Option<TypeHash>, _target: TypeHash) -> i32 {
        priority::OPTIONAL
    }

    fn convert(
        &self,
        value: Value,
        source: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
        fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        let types = registry.types();
        if value.is_null() {
            return if types.accepts_null(target) {
                Ok(Value::Null)
            } else {
                Err(ConvertError::NullToNonNullable {
                    target: types.name_of(target),
                })
            };
        }

        let stripped_source = source.map(|s| types.as_optional(s).map_or(s, |e| e.inner));
        let payload = match value {
            Value::Some(inner) => *inner,
            other => other,
        };
        let inner_source = stripped_source.or_else(|| payload.type_of());
        let (inner_target, rewrap) = match types.as_optional(target) {
            Some(e) => (e.inner, true),
            None => (target, false),
        };

        let converted = registry
            .convert(payload, inner_source, inner_target, fmt)
            .map_err(|e| ConvertError::ConversionFailed {
                source: registry.describe_source(inner_source),
                target: types.name_of(inner_target),
                cause: Box::new(e),
            })?;

        Ok(if rewrap {
            Value::Some(Box::new(converted))
        } else {
            converted
        })
    }
}
