//! Enumeration conversion: bridges an enum type and its underlying
//! integral representation, or two enum types with compatible
//! representations.
//!
//! Conversions into an enum validate membership: a value with no defined
//! member fails with [`ConvertError::InvalidEnumValue`] rather than
//! producing an undefined bit pattern.

use recast_core::{ConvertError, EnumValue, FormatContext, TypeHash, Value};

use crate::converters::primitive::{PrimitiveConverter, integer_value};
use crate::converters::{Converter, priority};
use crate::registry::ConverterRegistry;

/// Converts between enumerations and their underlying representations.
///
/// The underlying steps run through an owned [`PrimitiveConverter`], so the
/// usual narrowing checks apply before membership is validated.
#[derive(Debug, Default)]
pub struct EnumConverter {
    primitive: PrimitiveConverter,
}

impl EnumConverter {
    /// Create a converter with an explicitly configured primitive step.
    pub fn new(primitive: PrimitiveConverter) -> Self {
        Self { primitive }
    }
}

impl Converter for EnumConverter {
    fn name(&self) -> &'static str {
        "enumeration"
    }

    fn can_convert(
        &self,
        source: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
    ) -> bool {
        let types = registry.types();
        let src_enum = source.and_then(|s| types.as_enum(s));
        let tgt_enum = types.as_enum(target);
        match (src_enum, tgt_enum) {
            (Some(se), Some(te)) => self.primitive.can_convert(
                Some(se.underlying.type_hash()),
                te.underlying.type_hash(),
                registry,
            ),
            (Some(se), None) => {
                self.primitive
                    .can_convert(Some(se.underlying.type_hash()), target, registry)
            }
            (None, Some(te)) => {
                source.is_some()
                    && self
                        .primitive
                        .can_convert(source, te.underlying.type_hash(), registry)
            }
            (None, None) => false,
        }
    }

    fn priority(&self, _source: Option<TypeHash>, _target: TypeHash) -> i32 {
        priority::ENUM
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

        if let Some(te) = types.as_enum(target) {
            // Into an enum: produce the underlying integral value, then
            // require a defined member.
            let (raw, raw_source) = match value {
                Value::Enum(ev) => {
                    let se = types
                        .as_enum(ev.ty)
                        .ok_or(ConvertError::UnknownType { hash: ev.ty })?;
                    (
                        integer_value(se.underlying, ev.value as i128)?,
                        Some(se.underlying.type_hash()),
                    )
                }
                other => (other, source),
            };
            let underlying = te.underlying.type_hash();
            let converted = self
                .primitive
                .convert(raw, raw_source, underlying, registry, fmt)?;
            let discriminant = converted.as_i128().ok_or(ConvertError::InvalidCast {
                from: converted.shape_name().to_string(),
                to: te.name.clone(),
            })?;
            let member = i64::try_from(discriminant)
                .ok()
                .and_then(|d| te.member_by_value(d))
                .ok_or(ConvertError::InvalidEnumValue {
                    value: discriminant,
                    enum_name: te.name.clone(),
                })?;
            return Ok(Value::Enum(EnumValue {
                ty: target,
                member: member.name.clone(),
                value: member.value,
            }));
        }

        // Out of an enum: convert the underlying value onward.
        let Value::Enum(ev) = value else {
            return Err(ConvertError::InvalidCast {
                from: value.shape_name().to_string(),
                to: types.name_of(target),
            });
        };
        let se = types
            .as_enum(ev.ty)
            .ok_or(ConvertError::UnknownType { hash: ev.ty })?;
        let raw = integer_value(se.underlying, ev.value as i128)?;
        self.primitive
            .convert(raw, Some(se.underlying.type_hash()), target, registry, fmt)
    }
}
