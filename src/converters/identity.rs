//! Identity conversion: source type equals target type, or the target is
//! the universal `any` type. The value passes through untouched.

use recast_core::{ConvertError, FormatContext, TypeHash, Value, primitives};

use crate::converters::{Converter, priority};
use crate::registry::ConverterRegistry;

/// Returns the value unchanged when no conversion is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl Converter for IdentityConverter {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn can_convert(
        &self,
        source: Option<TypeHash>,
        target: TypeHash,
        _registry: &ConverterRegistry,
    ) -> bool {
        source == Some(target) || target == primitives::ANY
    }

    fn priority(&self, _source: Option<TypeHash>, _target: TypeHash) -> i32 {
        priority::IDENTITY
    }

    fn convert(
        &self,
        value: Value,
        _source: Option<TypeHash>,
        _target: TypeHash,
        _registry: &ConverterRegistry,
        _fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        Ok(value)
    }
}
