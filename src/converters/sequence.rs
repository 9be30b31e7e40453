//! Sequence/collection conversion.
//!
//! The most intricate strategy in the engine. Inputs are normalized first:
//! a sequence value is used as-is, anything else is treated as a sequence
//! of length one (so a scalar converts into a one-element array). Targets
//! resolve through the type registry to an explicit construction
//! capability - fixed-size, appendable, or wrap-inner - and every element
//! is converted through the registry, so nested element types dispatch
//! like any other conversion.
//!
//! Conversion runs up to two interpretations of the input: first as a
//! sequence, then as a single element. Some inputs are genuinely ambiguous
//! without trying both (a scalar handed to a collection-shaped parameter,
//! say), so when neither succeeds the two failures are aggregated into one
//! error rather than picking either.

use tracing::debug;

use recast_core::{ConvertError, FormatContext, Sequence, SequenceBuilder, TypeHash, Value};

use crate::converters::{Converter, priority};
use crate::registry::ConverterRegistry;

/// Converts between sequence-shaped values and registered sequence types.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceConverter;

impl SequenceConverter {
    fn convert_as_sequence(
        &self,
        value: Value,
        source: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
        fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        let types = registry.types();
        let Value::Seq(seq) = value else {
            return Err(ConvertError::InvalidCast {
                from: value.shape_name().to_string(),
                to: types.name_of(target),
            });
        };
        let src_element = source
            .and_then(|s| types.as_sequence(s))
            .map(|e| e.element)
            .or_else(|| types.as_sequence(seq.ty).map(|e| e.element));
        self.build(seq.items, src_element, target, registry, fmt)
    }

    fn convert_as_element(
        &self,
        value: Value,
        source: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
        fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        let src_element = source.or_else(|| value.type_of());
        self.build(vec![value], src_element, target, registry, fmt)
    }

    /// Construct the target sequence from normalized elements.
    fn build(
        &self,
        items: Vec<Value>,
        src_element: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
        fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        let types = registry.types();
        let (resolved, entry) = types.resolve_sequence(target)?;
        let element = entry.element;
        debug!(
            plan = ?entry.builder,
            ty = entry.name.as_str(),
            count = items.len(),
            "sequence construction"
        );

        match entry.builder {
            SequenceBuilder::FixedSize => {
                // Exact-count allocation, populated by index.
                let mut out = vec![Value::Null; items.len()];
                for (index, item) in items.into_iter().enumerate() {
                    out[index] =
                        self.convert_element(item, src_element, element, index, registry, fmt)?;
                }
                Ok(Value::Seq(Sequence::new(resolved, out)))
            }
            SequenceBuilder::Appendable { with_capacity } => {
                let mut out = if with_capacity {
                    Vec::with_capacity(items.len())
                } else {
                    Vec::new()
                };
                for (index, item) in items.into_iter().enumerate() {
                    out.push(
                        self.convert_element(item, src_element, element, index, registry, fmt)?,
                    );
                }
                Ok(Value::Seq(Sequence::new(resolved, out)))
            }
            SequenceBuilder::WrapsInner(inner) => {
                // Build the inner sequence type first, then re-tag the
                // result as the wrapper.
                let staged = self.build(items, src_element, inner, registry, fmt)?;
                let Value::Seq(s) = staged else {
                    return Err(ConvertError::InvalidCast {
                        from: staged.shape_name().to_string(),
                        to: types.name_of(resolved),
                    });
                };
                Ok(Value::Seq(Sequence::new(resolved, s.items)))
            }
            // resolve_sequence followed the mapping chain already.
            SequenceBuilder::Concrete(_) => Err(ConvertError::BadTypeDefinition {
                name: types.name_of(resolved),
                detail: "interface mapping did not resolve to a buildable type".to_string(),
            }),
        }
    }

    fn convert_element(
        &self,
        item: Value,
        src_element: Option<TypeHash>,
        element: TypeHash,
        index: usize,
        registry: &ConverterRegistry,
        fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        // Prefer the element's own inferred type; fall back to the source
        // sequence's declared element type.
        let elem_source = item.type_of().or(src_element);
        registry
            .convert(item, elem_source, element, fmt)
            .map_err(|e| ConvertError::Element { index, cause: Box::new(e) })
    }
}

impl Converter for SequenceConverter {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn can_convert(
        &self,
        _source: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
    ) -> bool {
        registry.types().resolve_sequence(target).is_ok()
    }

    fn priority(&self, _source: Option<TypeHash>, _target: TypeHash) -> i32 {
        priority::SEQUENCE
    }

    fn convert(
        &self,
        value: Value,
        source: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
        fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        match self.convert_as_sequence(value.clone(), source, target, registry, fmt) {
            Ok(out) => Ok(out),
            Err(as_sequence) => {
                match self.convert_as_element(value, source, target, registry, fmt) {
                    Ok(out) => Ok(out),
                    Err(as_element) => Err(ConvertError::Aggregate {
                        attempts: vec![as_sequence, as_element],
                    }),
                }
            }
        }
    }
}
