//! Null conversion: an absent value into any target that accepts absence.

use recast_core::{ConvertError, FormatContext, TypeHash, Value};

use crate::converters::{Converter, priority};
use crate::registry::ConverterRegistry;

/// Passes an absent value through to a null-accepting target.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullConverter;

impl Converter for NullConverter {
    fn name(&self) -> &'static str {
        "null"
    }

    fn can_convert(
        &self,
        source: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
    ) -> bool {
        source.is_none() && registry.types().accepts_null(target)
    }

    fn priority(&self, _source: Option<TypeHash>, _target: TypeHash) -> i32 {
        priority::NULL
    }

    fn convert(
        &self,
        value: Value,
        _source: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
        _fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        // Dispatch never selects this converter for a present value; guard
        // against direct misuse anyway.
        if !value.is_null() {
            return Err(ConvertError::InvalidCast {
                from: value.shape_name().to_string(),
                to: registry.types().name_of(target),
            });
        }
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_core::primitives;

    #[test]
    fn accepts_null_into_nullable_targets() {
        let mut registry = ConverterRegistry::with_defaults();
        let opt = registry.types_mut().optional_of(primitives::INT32);
        let list = registry.types_mut().list_of(primitives::INT32);

        let c = NullConverter;
        assert!(c.can_convert(None, opt, &registry));
        assert!(c.can_convert(None, list, &registry));
        assert!(!c.can_convert(None, primitives::INT32, &registry));
        assert!(!c.can_convert(Some(primitives::INT32), opt, &registry));
    }

    #[test]
    fn converts_null_to_null() {
        let mut registry = ConverterRegistry::with_defaults();
        let opt = registry.types_mut().optional_of(primitives::INT32);
        let fmt = FormatContext::default();
        let out = NullConverter
            .convert(Value::Null, None, opt, &registry, &fmt)
            .unwrap();
        assert_eq!(out, Value::Null);
    }

    #[test]
    fn rejects_present_value() {
        let mut registry = ConverterRegistry::with_defaults();
        let opt = registry.types_mut().optional_of(primitives::INT32);
        let fmt = FormatContext::default();
        let err = NullConverter
            .convert(Value::from(1i32), None, opt, &registry, &fmt)
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidCast { .. }));
    }
}
