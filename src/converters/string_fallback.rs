//! Last-resort conversion to string via the value's textual representation.
//!
//! Ranked below every converter with a real string path, so the primitive
//! converter's locale-aware formatting wins for scalar sources; this one
//! covers everything else - objects, enums, sequences, absent values.

use recast_core::{ConvertError, FormatContext, TypeHash, Value, primitives};

use crate::converters::{Converter, priority};
use crate::registry::ConverterRegistry;

/// Renders any value as its textual representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringFallbackConverter;

impl Converter for StringFallbackConverter {
    fn name(&self) -> &'static str {
        "string-fallback"
    }

    fn can_convert(
        &self,
        _source: Option<TypeHash>,
        target: TypeHash,
        _registry: &ConverterRegistry,
    ) -> bool {
        target == primitives::STRING
    }

    fn priority(&self, _source: Option<TypeHash>, _target: TypeHash) -> i32 {
        priority::STRING_FALLBACK
    }

    fn convert(
        &self,
        value: Value,
        _source: Option<TypeHash>,
        _target: TypeHash,
        _registry: &ConverterRegistry,
        _fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        Ok(Value::Str(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_core::ObjectRef;
    use std::rc::Rc;

    #[test]
    fn accepts_only_string_targets() {
        let registry = ConverterRegistry::with_defaults();
        let c = StringFallbackConverter;
        assert!(c.can_convert(Some(primitives::INT32), primitives::STRING, &registry));
        assert!(c.can_convert(None, primitives::STRING, &registry));
        assert!(!c.can_convert(Some(primitives::INT32), primitives::INT64, &registry));
    }

    #[test]
    fn renders_objects_and_null() {
        let mut registry = ConverterRegistry::with_defaults();
        let widget = registry.types_mut().register_opaque("Widget").unwrap();
        let fmt = FormatContext::default();

        let obj = Value::Object(ObjectRef::new(widget, Rc::new("a widget".to_string())));
        let out = registry
            .convert(obj, Some(widget), primitives::STRING, &fmt)
            .unwrap();
        assert_eq!(out, Value::Str("a widget".to_string()));

        let out = StringFallbackConverter
            .convert(Value::Null, None, primitives::STRING, &registry, &fmt)
            .unwrap();
        assert_eq!(out, Value::Str("null".to_string()));
    }

    #[test]
    fn loses_to_the_primitive_converter_for_scalars() {
        let registry = ConverterRegistry::with_defaults();
        let fmt = FormatContext::new(',', None);
        // The primitive converter localizes; the fallback would not.
        let out = registry
            .convert(Value::from(3.14f64), Some(primitives::DOUBLE), primitives::STRING, &fmt)
            .unwrap();
        assert_eq!(out, Value::Str("3,14".to_string()));
    }

    #[test]
    fn enum_sources_take_the_enum_path_in_dispatch() {
        let mut registry = ConverterRegistry::with_defaults();
        let weekday = registry
            .types_mut()
            .register_enum("Weekday", recast_core::PrimitiveKind::Int32, &[("Friday", 5)])
            .unwrap();
        let fmt = FormatContext::default();
        let friday = registry.types().enum_value(weekday, "Friday").unwrap();

        // Dispatched, the enum converter outranks the fallback and renders
        // the underlying value.
        let out = registry
            .convert(friday.clone(), Some(weekday), primitives::STRING, &fmt)
            .unwrap();
        assert_eq!(out, Value::Str("5".to_string()));

        // Invoked directly, the fallback renders the member name.
        let out = StringFallbackConverter
            .convert(friday, Some(weekday), primitives::STRING, &registry, &fmt)
            .unwrap();
        assert_eq!(out, Value::Str("Friday".to_string()));
    }
}
