//! Scalar conversions among the built-in primitive kinds.
//!
//! The converter accepts a pair when the source is a primitive kind and one
//! of three checks passes, in order:
//!
//! 1. the kind's self-declared check ([`PrimitiveKind::intrinsically_convertible_to`]),
//! 2. a registered rule in the [`CompatibilityRules`] table, or
//! 3. **no rule exists for the source kind at all** - a permissive default
//!    kept for compatibility with rule tables built from scratch.
//!
//! Narrowing is checked: integral conversions route through `i128` and
//! reject out-of-range values, float-to-integer rounds half to even before
//! the range check, and `double` to `float` rejects finite values outside
//! the `f32` range. Text conversions honor the [`FormatContext`]
//! separators.

use std::fmt;

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;

use recast_core::{ConvertError, FormatContext, KindSet, PrimitiveKind, TypeHash, Value};

use crate::converters::{Converter, priority};
use crate::registry::ConverterRegistry;

/// A custom predicate over candidate target kinds.
pub type KindPredicate = Box<dyn Fn(PrimitiveKind) -> bool + Send + Sync>;

/// The compatibility table: which target kinds each source kind may
/// convert to.
///
/// Owned by the [`PrimitiveConverter`] instance that uses it - there is no
/// process-wide table. Registrations are additive: kind sets are OR'ed
/// together and predicates accumulate. A source kind with no entry at all
/// is allowed to attempt any target (the permissive default).
pub struct CompatibilityRules {
    allowed: FxHashMap<PrimitiveKind, KindSet>,
    predicates: FxHashMap<PrimitiveKind, Vec<KindPredicate>>,
}

impl CompatibilityRules {
    /// A table with no rules: every source kind falls through to the
    /// permissive default.
    pub fn empty() -> Self {
        Self {
            allowed: FxHashMap::default(),
            predicates: FxHashMap::default(),
        }
    }

    /// The standard table shipped with the engine.
    pub fn standard() -> Self {
        let mut rules = Self::empty();
        rules.allow(
            PrimitiveKind::Bool,
            KindSet::NUMERIC | KindSet::TEXT | KindSet::BOOLEAN,
        );
        for kind in [
            PrimitiveKind::Int8,
            PrimitiveKind::Int16,
            PrimitiveKind::Int32,
            PrimitiveKind::Uint8,
            PrimitiveKind::Uint16,
            PrimitiveKind::Uint32,
        ] {
            rules.allow(
                kind,
                KindSet::NUMERIC | KindSet::TEXT | KindSet::BOOLEAN | KindSet::CHARACTER,
            );
        }
        // 64-bit integers additionally convert to timestamps (Unix millis).
        for kind in [PrimitiveKind::Int64, PrimitiveKind::Uint64] {
            rules.allow(
                kind,
                KindSet::NUMERIC
                    | KindSet::TEXT
                    | KindSet::BOOLEAN
                    | KindSet::CHARACTER
                    | KindSet::TEMPORAL,
            );
        }
        for kind in [PrimitiveKind::Float32, PrimitiveKind::Float64] {
            rules.allow(kind, KindSet::NUMERIC | KindSet::TEXT | KindSet::BOOLEAN);
        }
        rules.allow(
            PrimitiveKind::Char,
            KindSet::CHARACTER | KindSet::TEXT | KindSet::INTEGERS,
        );
        rules.allow(PrimitiveKind::Str, KindSet::all());
        rules.allow(
            PrimitiveKind::Timestamp,
            KindSet::TEMPORAL | KindSet::TEXT | KindSet::INT64 | KindSet::UINT64,
        );
        rules
    }

    /// Allow conversions from a source kind to a set of target kinds.
    /// Additive: the set is OR'ed into any existing entry.
    pub fn allow(&mut self, source: PrimitiveKind, targets: KindSet) {
        *self.allowed.entry(source).or_insert(KindSet::empty()) |= targets;
    }

    /// Register a custom predicate for a source kind. Additive: predicates
    /// are OR'ed with each other and with the kind-set entry.
    pub fn allow_predicate(
        &mut self,
        source: PrimitiveKind,
        predicate: impl Fn(PrimitiveKind) -> bool + Send + Sync + 'static,
    ) {
        self.predicates
            .entry(source)
            .or_default()
            .push(Box::new(predicate));
    }

    /// Whether the table permits converting `source` to `target`.
    pub fn accepts(&self, source: PrimitiveKind, target: PrimitiveKind) -> bool {
        let bits = self.allowed.get(&source);
        let preds = self.predicates.get(&source);
        let has_rules = bits.is_some() || preds.is_some_and(|p| !p.is_empty());
        if !has_rules {
            // No rule at all for this source kind: permit by default.
            return true;
        }
        bits.is_some_and(|b| b.contains_kind(target))
            || preds.into_iter().flatten().any(|p| p(target))
    }
}

impl Default for CompatibilityRules {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for CompatibilityRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompatibilityRules")
            .field("allowed", &self.allowed)
            .field(
                "predicates",
                &self.predicates.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}

/// Build an integral [`Value`] of the requested kind, range-checked.
pub(crate) fn integer_value(kind: PrimitiveKind, value: i128) -> Result<Value, ConvertError> {
    macro_rules! narrow {
        ($ty:ty, $variant:ident) => {
            <$ty>::try_from(value)
                .map(Value::$variant)
                .map_err(|_| ConvertError::IntegerOverflow { value, target: kind.name() })
        };
    }

    match kind {
        PrimitiveKind::Int8 => narrow!(i8, I8),
        PrimitiveKind::Int16 => narrow!(i16, I16),
        PrimitiveKind::Int32 => narrow!(i32, I32),
        PrimitiveKind::Int64 => narrow!(i64, I64),
        PrimitiveKind::Uint8 => narrow!(u8, U8),
        PrimitiveKind::Uint16 => narrow!(u16, U16),
        PrimitiveKind::Uint32 => narrow!(u32, U32),
        PrimitiveKind::Uint64 => narrow!(u64, U64),
        other => Err(ConvertError::InvalidCast {
            from: "integer".to_string(),
            to: other.name().to_string(),
        }),
    }
}

/// Converts among the built-in scalar kinds.
#[derive(Debug, Default)]
pub struct PrimitiveConverter {
    rules: CompatibilityRules,
}

impl PrimitiveConverter {
    /// Create a converter with an explicit rule table.
    pub fn new(rules: CompatibilityRules) -> Self {
        Self { rules }
    }

    /// The rule table, for augmenting at setup time.
    pub fn rules_mut(&mut self) -> &mut CompatibilityRules {
        &mut self.rules
    }

    fn to_integer(
        &self,
        value: &Value,
        kind: PrimitiveKind,
        fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        let wide: i128 = if let Some(i) = value.as_i128() {
            i
        } else if let Some(f) = value.as_f64() {
            if !f.is_finite() {
                return Err(ConvertError::FloatOverflow { value: f, target: kind.name() });
            }
            let rounded = f.round_ties_even();
            if rounded < i128::MIN as f64 || rounded > i128::MAX as f64 {
                return Err(ConvertError::FloatOverflow { value: f, target: kind.name() });
            }
            rounded as i128
        } else {
            match value {
                Value::Bool(b) => *b as i128,
                Value::Char(c) => *c as u32 as i128,
                Value::Str(s) => {
                    let text = fmt.normalize_number(s.trim());
                    text.parse::<i128>().map_err(|_| ConvertError::ParseFailed {
                        text: s.trim().to_string(),
                        target: kind.name(),
                    })?
                }
                Value::Timestamp(t) => t.timestamp_millis() as i128,
                other => {
                    return Err(ConvertError::InvalidCast {
                        from: other.shape_name().to_string(),
                        to: kind.name().to_string(),
                    });
                }
            }
        };
        integer_value(kind, wide)
    }

    fn to_float(
        &self,
        value: &Value,
        kind: PrimitiveKind,
        fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        let wide: f64 = if let Some(f) = value.as_f64() {
            f
        } else if let Some(i) = value.as_i128() {
            i as f64
        } else {
            match value {
                Value::Bool(b) => {
                    if *b {
                        1.0
                    } else {
                        0.0
                    }
                }
                Value::Str(s) => {
                    let text = fmt.normalize_number(s.trim());
                    text.parse::<f64>().map_err(|_| ConvertError::ParseFailed {
                        text: s.trim().to_string(),
                        target: kind.name(),
                    })?
                }
                other => {
                    return Err(ConvertError::InvalidCast {
                        from: other.shape_name().to_string(),
                        to: kind.name().to_string(),
                    });
                }
            }
        };
        match kind {
            PrimitiveKind::Float64 => Ok(Value::F64(wide)),
            _ => {
                // Reject finite values outside the f32 range; infinities
                // and NaN pass through.
                if wide.is_finite() && (wide > f32::MAX as f64 || wide < f32::MIN as f64) {
                    Err(ConvertError::FloatOverflow { value: wide, target: kind.name() })
                } else {
                    Ok(Value::F32(wide as f32))
                }
            }
        }
    }

    fn to_bool(&self, value: &Value) -> Result<Value, ConvertError> {
        if let Some(i) = value.as_i128() {
            return Ok(Value::Bool(i != 0));
        }
        if let Some(f) = value.as_f64() {
            return Ok(Value::Bool(f != 0.0));
        }
        match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(ConvertError::ParseFailed {
                    text: s.trim().to_string(),
                    target: "bool",
                }),
            },
            other => Err(ConvertError::InvalidCast {
                from: other.shape_name().to_string(),
                to: "bool".to_string(),
            }),
        }
    }

    fn to_char(&self, value: &Value) -> Result<Value, ConvertError> {
        if let Some(i) = value.as_i128() {
            let scalar = u32::try_from(i)
                .ok()
                .and_then(char::from_u32)
                .ok_or(ConvertError::IntegerOverflow { value: i, target: "char" })?;
            return Ok(Value::Char(scalar));
        }
        match value {
            Value::Char(c) => Ok(Value::Char(*c)),
            Value::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(ConvertError::ParseFailed {
                        text: s.clone(),
                        target: "char",
                    }),
                }
            }
            other => Err(ConvertError::InvalidCast {
                from: other.shape_name().to_string(),
                to: "char".to_string(),
            }),
        }
    }

    fn to_text(&self, value: &Value, fmt: &FormatContext) -> Result<Value, ConvertError> {
        let text = match value {
            Value::F32(v) => fmt.localize_number(v.to_string()),
            Value::F64(v) => fmt.localize_number(v.to_string()),
            other => other.to_string(),
        };
        Ok(Value::Str(text))
    }

    fn to_timestamp(&self, value: &Value) -> Result<Value, ConvertError> {
        if let Some(i) = value.as_i128() {
            let millis = i64::try_from(i)
                .map_err(|_| ConvertError::IntegerOverflow { value: i, target: "timestamp" })?;
            return DateTime::from_timestamp_millis(millis)
                .map(Value::Timestamp)
                .ok_or(ConvertError::IntegerOverflow { value: i, target: "timestamp" });
        }
        match value {
            Value::Timestamp(t) => Ok(Value::Timestamp(*t)),
            Value::Str(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|d| Value::Timestamp(d.with_timezone(&Utc)))
                .map_err(|_| ConvertError::ParseFailed {
                    text: s.trim().to_string(),
                    target: "timestamp",
                }),
            other => Err(ConvertError::InvalidCast {
                from: other.shape_name().to_string(),
                to: "timestamp".to_string(),
            }),
        }
    }
}

impl Converter for PrimitiveConverter {
    fn name(&self) -> &'static str {
        "primitive"
    }

    fn can_convert(
        &self,
        source: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
    ) -> bool {
        let types = registry.types();
        let Some(src) = source else { return false };
        let (Some(sk), Some(tk)) = (types.kind_of(src), types.kind_of(target)) else {
            return false;
        };
        sk.intrinsically_convertible_to(tk) || self.rules.accepts(sk, tk)
    }

    fn priority(&self, _source: Option<TypeHash>, _target: TypeHash) -> i32 {
        priority::PRIMITIVE
    }

    fn convert(
        &self,
        value: Value,
        _source: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
        fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        let types = registry.types();
        // Null never reaches this converter through dispatch; defend anyway.
        if value.is_null() {
            return Err(ConvertError::InvalidCast {
                from: "null".to_string(),
                to: types.name_of(target),
            });
        }
        let Some(kind) = types.kind_of(target) else {
            return Err(ConvertError::InvalidCast {
                from: value.shape_name().to_string(),
                to: types.name_of(target),
            });
        };
        match kind {
            PrimitiveKind::Bool => self.to_bool(&value),
            PrimitiveKind::Char => self.to_char(&value),
            PrimitiveKind::Str => self.to_text(&value, fmt),
            PrimitiveKind::Timestamp => self.to_timestamp(&value),
            PrimitiveKind::Float32 | PrimitiveKind::Float64 => self.to_float(&value, kind, fmt),
            integral => self.to_integer(&value, integral, fmt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_core::primitives;

    fn setup() -> (ConverterRegistry, FormatContext) {
        (ConverterRegistry::with_defaults(), FormatContext::default())
    }

    fn convert(registry: &ConverterRegistry, fmt: &FormatContext, value: Value, target: TypeHash) -> Result<Value, ConvertError> {
        let source = value.type_of();
        PrimitiveConverter::default().convert(value, source, target, registry, fmt)
    }

    #[test]
    fn string_to_int() {
        let (registry, fmt) = setup();
        let out = convert(&registry, &fmt, Value::from("42"), primitives::INT32).unwrap();
        assert_eq!(out, Value::I32(42));
    }

    #[test]
    fn double_to_string() {
        let (registry, fmt) = setup();
        let out = convert(&registry, &fmt, Value::from(3.14f64), primitives::STRING).unwrap();
        assert_eq!(out, Value::Str("3.14".to_string()));
    }

    #[test]
    fn checked_narrowing() {
        let (registry, fmt) = setup();
        assert_eq!(
            convert(&registry, &fmt, Value::from(127i32), primitives::INT8).unwrap(),
            Value::I8(127)
        );
        let err = convert(&registry, &fmt, Value::from(128i32), primitives::INT8).unwrap_err();
        assert_eq!(err, ConvertError::IntegerOverflow { value: 128, target: "int8" });

        let err = convert(&registry, &fmt, Value::from(-1i32), primitives::UINT8).unwrap_err();
        assert_eq!(err, ConvertError::IntegerOverflow { value: -1, target: "uint8" });
    }

    #[test]
    fn full_u64_range_survives() {
        let (registry, fmt) = setup();
        let out = convert(&registry, &fmt, Value::from(u64::MAX), primitives::UINT64).unwrap();
        assert_eq!(out, Value::U64(u64::MAX));
        let err = convert(&registry, &fmt, Value::from(u64::MAX), primitives::INT64).unwrap_err();
        assert!(matches!(err, ConvertError::IntegerOverflow { .. }));
    }

    #[test]
    fn float_to_int_rounds_half_to_even() {
        let (registry, fmt) = setup();
        assert_eq!(
            convert(&registry, &fmt, Value::from(2.5f64), primitives::INT32).unwrap(),
            Value::I32(2)
        );
        assert_eq!(
            convert(&registry, &fmt, Value::from(3.5f64), primitives::INT32).unwrap(),
            Value::I32(4)
        );
        assert_eq!(
            convert(&registry, &fmt, Value::from(-2.5f64), primitives::INT32).unwrap(),
            Value::I32(-2)
        );
    }

    #[test]
    fn non_finite_float_to_int_fails() {
        let (registry, fmt) = setup();
        let err =
            convert(&registry, &fmt, Value::from(f64::NAN), primitives::INT32).unwrap_err();
        assert!(matches!(err, ConvertError::FloatOverflow { .. }));
    }

    #[test]
    fn double_to_float_range_checked() {
        let (registry, fmt) = setup();
        assert_eq!(
            convert(&registry, &fmt, Value::from(1.5f64), primitives::FLOAT).unwrap(),
            Value::F32(1.5)
        );
        let err = convert(&registry, &fmt, Value::from(1e300f64), primitives::FLOAT).unwrap_err();
        assert!(matches!(err, ConvertError::FloatOverflow { .. }));
        // Infinities pass through.
        assert_eq!(
            convert(&registry, &fmt, Value::from(f64::INFINITY), primitives::FLOAT).unwrap(),
            Value::F32(f32::INFINITY)
        );
    }

    #[test]
    fn bool_bridges() {
        let (registry, fmt) = setup();
        assert_eq!(
            convert(&registry, &fmt, Value::from(true), primitives::INT32).unwrap(),
            Value::I32(1)
        );
        assert_eq!(
            convert(&registry, &fmt, Value::from(0i32), primitives::BOOL).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            convert(&registry, &fmt, Value::from(" TRUE "), primitives::BOOL).unwrap(),
            Value::Bool(true)
        );
        let err = convert(&registry, &fmt, Value::from("yes"), primitives::BOOL).unwrap_err();
        assert!(matches!(err, ConvertError::ParseFailed { .. }));
    }

    #[test]
    fn char_bridges() {
        let (registry, fmt) = setup();
        assert_eq!(
            convert(&registry, &fmt, Value::from('A'), primitives::INT32).unwrap(),
            Value::I32(65)
        );
        assert_eq!(
            convert(&registry, &fmt, Value::from(65i32), primitives::CHAR).unwrap(),
            Value::Char('A')
        );
        assert_eq!(
            convert(&registry, &fmt, Value::from("x"), primitives::CHAR).unwrap(),
            Value::Char('x')
        );
        let err = convert(&registry, &fmt, Value::from("xy"), primitives::CHAR).unwrap_err();
        assert!(matches!(err, ConvertError::ParseFailed { .. }));
    }

    #[test]
    fn timestamp_bridges() {
        let (registry, fmt) = setup();
        let ts = DateTime::from_timestamp_millis(86_400_000).unwrap();
        assert_eq!(
            convert(&registry, &fmt, Value::from(86_400_000i64), primitives::TIMESTAMP).unwrap(),
            Value::Timestamp(ts)
        );
        assert_eq!(
            convert(&registry, &fmt, Value::Timestamp(ts), primitives::INT64).unwrap(),
            Value::I64(86_400_000)
        );
        let parsed = convert(
            &registry,
            &fmt,
            Value::from("1970-01-02T00:00:00Z"),
            primitives::TIMESTAMP,
        )
        .unwrap();
        assert_eq!(parsed, Value::Timestamp(ts));
    }

    #[test]
    fn locale_aware_parsing_and_formatting() {
        let (registry, _) = setup();
        let de = FormatContext::new(',', Some('.'));
        assert_eq!(
            convert(&registry, &de, Value::from("1.234,5"), primitives::DOUBLE).unwrap(),
            Value::F64(1234.5)
        );
        assert_eq!(
            convert(&registry, &de, Value::from(3.14f64), primitives::STRING).unwrap(),
            Value::Str("3,14".to_string())
        );
    }

    #[test]
    fn capability_respects_rules() {
        let registry = ConverterRegistry::with_defaults();
        let c = PrimitiveConverter::default();
        assert!(c.can_convert(Some(primitives::STRING), primitives::INT32, &registry));
        assert!(c.can_convert(Some(primitives::DOUBLE), primitives::STRING, &registry));
        assert!(c.can_convert(Some(primitives::BOOL), primitives::INT32, &registry));
        // int -> timestamp is reserved to the 64-bit kinds.
        assert!(!c.can_convert(Some(primitives::INT32), primitives::TIMESTAMP, &registry));
        assert!(c.can_convert(Some(primitives::INT64), primitives::TIMESTAMP, &registry));
        // Unknown source or non-primitive target is out of scope.
        assert!(!c.can_convert(None, primitives::INT32, &registry));
        assert!(!c.can_convert(Some(primitives::INT32), TypeHash::from_name("Widget"), &registry));
    }

    #[test]
    fn no_rule_for_kind_permits_by_default() {
        let rules = CompatibilityRules::empty();
        assert!(rules.accepts(PrimitiveKind::Bool, PrimitiveKind::Timestamp));

        let mut rules = CompatibilityRules::empty();
        rules.allow(PrimitiveKind::Bool, KindSet::TEXT);
        assert!(rules.accepts(PrimitiveKind::Bool, PrimitiveKind::Str));
        assert!(!rules.accepts(PrimitiveKind::Bool, PrimitiveKind::Timestamp));
        // Other kinds still fall through to the permissive default.
        assert!(rules.accepts(PrimitiveKind::Char, PrimitiveKind::Timestamp));
    }

    #[test]
    fn rules_are_additive() {
        let mut rules = CompatibilityRules::empty();
        rules.allow(PrimitiveKind::Bool, KindSet::TEXT);
        rules.allow(PrimitiveKind::Bool, KindSet::NUMERIC);
        assert!(rules.accepts(PrimitiveKind::Bool, PrimitiveKind::Str));
        assert!(rules.accepts(PrimitiveKind::Bool, PrimitiveKind::Int32));

        rules.allow_predicate(PrimitiveKind::Bool, |t| t == PrimitiveKind::Char);
        assert!(rules.accepts(PrimitiveKind::Bool, PrimitiveKind::Char));
        assert!(!rules.accepts(PrimitiveKind::Bool, PrimitiveKind::Timestamp));
    }

    #[test]
    fn null_value_is_invalid_cast() {
        let (registry, fmt) = setup();
        let err = PrimitiveConverter::default()
            .convert(Value::Null, None, primitives::INT32, &registry, &fmt)
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidCast { .. }));
    }
}
