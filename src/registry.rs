//! ConverterRegistry - strategy storage and dispatch.
//!
//! The registry holds an ordered, append-only list of converters plus the
//! [`TypeRegistry`] they consult. Dispatch is predicate filtering followed
//! by priority-max selection: every registered converter is asked whether
//! it can handle the pair, the highest priority among the acceptors wins,
//! and ties go to the first registered. The winner's failure propagates;
//! there is no second-chance dispatch and no substituted default.
//!
//! # Thread Safety
//!
//! The converter list is **not synchronized**. The contract is: register
//! every converter (and every type) before the first `convert` or
//! `can_convert` call. Converters do not mutate shared state during
//! conversion, so concurrent reads of a populated registry are safe, but
//! concurrent registration during active use is undefined and must be
//! avoided by the caller.
//!
//! # Example
//!
//! ```
//! use recast::{ConverterRegistry, FormatContext, Value, primitives};
//!
//! let mut registry = ConverterRegistry::with_defaults();
//! let opt_int = registry.types_mut().optional_of(primitives::INT32);
//! let fmt = FormatContext::default();
//!
//! let wrapped = registry
//!     .convert(Value::from(5i32), Some(primitives::INT32), opt_int, &fmt)
//!     .unwrap();
//! assert_eq!(wrapped.into_option(), Some(Value::I32(5)));
//! ```

use tracing::trace;

use recast_core::{ConvertError, FormatContext, TypeHash, TypeRegistry, Value};

use crate::converters::{
    Converter, EnumConverter, IdentityConverter, NullConverter, OptionalConverter,
    PrimitiveConverter, SequenceConverter, StringFallbackConverter,
};

/// Strategy storage and dispatch. The single entry point for conversions,
/// used recursively by converters that need nested conversions.
pub struct ConverterRegistry {
    types: TypeRegistry,
    converters: Vec<Box<dyn Converter>>,
}

impl ConverterRegistry {
    /// Create a registry over a type registry, with no converters.
    pub fn new(types: TypeRegistry) -> Self {
        Self {
            types,
            converters: Vec::new(),
        }
    }

    /// Create a registry with all primitives registered and the standard
    /// strategy set: identity, null, optional, enumeration, primitive,
    /// sequence, and the string fallback.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new(TypeRegistry::with_primitives());
        registry.register(IdentityConverter);
        registry.register(NullConverter);
        registry.register(OptionalConverter);
        registry.register(EnumConverter::default());
        registry.register(PrimitiveConverter::default());
        registry.register(SequenceConverter);
        registry.register(StringFallbackConverter);
        registry
    }

    /// Append a converter. No deduplication; registration order is the
    /// tie-break order for equal-priority candidates.
    pub fn register(&mut self, converter: impl Converter + 'static) {
        self.converters.push(Box::new(converter));
    }

    /// The type registry.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// The type registry, for registration at setup time.
    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    /// Number of registered converters.
    pub fn converter_count(&self) -> usize {
        self.converters.len()
    }

    /// Whether any registered converter accepts the pair. Pure query.
    pub fn can_convert(&self, source: Option<TypeHash>, target: TypeHash) -> bool {
        self.converters
            .iter()
            .any(|c| c.can_convert(source, target, self))
    }

    /// Convert a value to the target type.
    ///
    /// Selects the accepting converter with the numerically highest
    /// priority (ties: first registered) and invokes it. Fails with
    /// [`ConvertError::NoConverterFound`] when nothing accepts the pair;
    /// a winner's failure propagates unchanged.
    pub fn convert(
        &self,
        value: Value,
        source: Option<TypeHash>,
        target: TypeHash,
        fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        let mut winner: Option<(&dyn Converter, i32)> = None;
        for candidate in &self.converters {
            if !candidate.can_convert(source, target, self) {
                continue;
            }
            let priority = candidate.priority(source, target);
            // Strictly greater keeps the first registered on ties.
            if winner.is_none_or(|(_, best)| priority > best) {
                winner = Some((candidate.as_ref(), priority));
            }
        }

        let Some((converter, priority)) = winner else {
            trace!(
                from = %self.describe_source(source),
                to = %self.types.name_of(target),
                "no converter for pair"
            );
            return Err(ConvertError::NoConverterFound {
                from: self.describe_source(source),
                target: self.types.name_of(target),
            });
        };

        trace!(converter = converter.name(), priority, "dispatching conversion");
        converter.convert(value, source, target, self, fmt)
    }

    /// Convert with the source type inferred from the value.
    pub fn convert_value(
        &self,
        value: Value,
        target: TypeHash,
        fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        let source = value.type_of();
        self.convert(value, source, target, fmt)
    }

    /// Human-readable name for an optional source descriptor.
    pub fn describe_source(&self, source: Option<TypeHash>) -> String {
        match source {
            Some(hash) => self.types.name_of(hash),
            None => "null".to_string(),
        }
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("types", &self.types.len())
            .field("converters", &self.converters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_core::primitives;

    /// A stub strategy for one fixed pair, tagged so tests can see which
    /// one ran.
    struct Stub {
        source: TypeHash,
        target: TypeHash,
        priority: i32,
        tag: &'static str,
    }

    impl Converter for Stub {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn can_convert(
            &self,
            source: Option<TypeHash>,
            target: TypeHash,
            _registry: &ConverterRegistry,
        ) -> bool {
            source == Some(self.source) && target == self.target
        }

        fn priority(&self, _source: Option<TypeHash>, _target: TypeHash) -> i32 {
            self.priority
        }

        fn convert(
            &self,
            _value: Value,
            _source: Option<TypeHash>,
            _target: TypeHash,
            _registry: &ConverterRegistry,
            _fmt: &FormatContext,
        ) -> Result<Value, ConvertError> {
            Ok(Value::Str(self.tag.to_string()))
        }
    }

    fn stub_pair() -> (TypeHash, TypeHash) {
        (TypeHash::from_name("A"), TypeHash::from_name("B"))
    }

    #[test]
    fn highest_priority_wins() {
        let (a, b) = stub_pair();
        let fmt = FormatContext::default();

        let mut registry = ConverterRegistry::new(TypeRegistry::with_primitives());
        registry.register(Stub { source: a, target: b, priority: 1, tag: "low" });
        registry.register(Stub { source: a, target: b, priority: 2, tag: "high" });
        let out = registry.convert(Value::Null, Some(a), b, &fmt).unwrap();
        assert_eq!(out, Value::Str("high".to_string()));

        // Swapping the priorities swaps the winner.
        let mut registry = ConverterRegistry::new(TypeRegistry::with_primitives());
        registry.register(Stub { source: a, target: b, priority: 2, tag: "first" });
        registry.register(Stub { source: a, target: b, priority: 1, tag: "second" });
        let out = registry.convert(Value::Null, Some(a), b, &fmt).unwrap();
        assert_eq!(out, Value::Str("first".to_string()));
    }

    #[test]
    fn equal_priority_selects_first_registered() {
        let (a, b) = stub_pair();
        let fmt = FormatContext::default();

        let mut registry = ConverterRegistry::new(TypeRegistry::with_primitives());
        registry.register(Stub { source: a, target: b, priority: 5, tag: "first" });
        registry.register(Stub { source: a, target: b, priority: 5, tag: "second" });

        let out = registry.convert(Value::Null, Some(a), b, &fmt).unwrap();
        assert_eq!(out, Value::Str("first".to_string()));
    }

    #[test]
    fn no_converter_names_both_types() {
        let mut registry = ConverterRegistry::with_defaults();
        let widget = registry.types_mut().register_opaque("Widget").unwrap();
        let fmt = FormatContext::default();

        assert!(!registry.can_convert(Some(widget), primitives::INT32));
        let err = registry
            .convert(Value::Null, Some(widget), primitives::INT32, &fmt)
            .unwrap_err();
        assert_eq!(
            err,
            ConvertError::NoConverterFound {
                from: "Widget".to_string(),
                target: "int".to_string(),
            }
        );
    }

    #[test]
    fn can_convert_is_any_acceptor() {
        let (a, b) = stub_pair();
        let mut registry = ConverterRegistry::new(TypeRegistry::with_primitives());
        assert!(!registry.can_convert(Some(a), b));
        registry.register(Stub { source: a, target: b, priority: 0, tag: "only" });
        assert!(registry.can_convert(Some(a), b));
    }

    #[test]
    fn identity_law() {
        let registry = ConverterRegistry::with_defaults();
        let fmt = FormatContext::default();
        for value in [
            Value::from(true),
            Value::from(42i32),
            Value::from(3.14f64),
            Value::from("hello"),
        ] {
            let ty = value.type_of().unwrap();
            let out = registry.convert(value.clone(), Some(ty), ty, &fmt).unwrap();
            assert_eq!(out, value);
        }
    }

    #[test]
    fn convert_value_infers_source() {
        let registry = ConverterRegistry::with_defaults();
        let fmt = FormatContext::default();
        let out = registry
            .convert_value(Value::from("42"), primitives::INT32, &fmt)
            .unwrap();
        assert_eq!(out, Value::I32(42));
    }

    #[test]
    fn default_registry_has_the_standard_strategies() {
        let registry = ConverterRegistry::with_defaults();
        assert_eq!(registry.converter_count(), 7);
    }
}
