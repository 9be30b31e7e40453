//! User-supplied conversion functions bound to one fixed type pair.

use std::fmt;

use recast_core::{ConvertError, FormatContext, TypeHash, Value};

use crate::converters::{Converter, priority};
use crate::registry::ConverterRegistry;

/// The stored conversion function.
pub type DelegateFn = dyn Fn(Value, &FormatContext) -> Result<Value, ConvertError> + Send + Sync;

/// Wraps a user function as a converter for one (source, target) pair.
///
/// The declared source is relaxed for absent sources: a `None` source is
/// accepted when the declared source type is non-primitive, so "unknown
/// source, assume compatible" callers still reach the delegate.
pub struct DelegateConverter {
    source: TypeHash,
    target: TypeHash,
    priority: i32,
    func: Box<DelegateFn>,
}

impl DelegateConverter {
    /// Wrap a function for the given pair at the default delegate priority.
    pub fn new(
        source: TypeHash,
        target: TypeHash,
        func: impl Fn(Value, &FormatContext) -> Result<Value, ConvertError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            source,
            target,
            priority: priority::DELEGATE,
            func: Box::new(func),
        }
    }

    /// Override the priority, e.g. to rank below a built-in strategy.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// The declared source type.
    pub fn source(&self) -> TypeHash {
        self.source
    }

    /// The declared target type.
    pub fn target(&self) -> TypeHash {
        self.target
    }
}

impl fmt::Debug for DelegateConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateConverter")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

impl Converter for DelegateConverter {
    fn name(&self) -> &'static str {
        "delegate"
    }

    fn can_convert(
        &self,
        source: Option<TypeHash>,
        target: TypeHash,
        registry: &ConverterRegistry,
    ) -> bool {
        if target != self.target {
            return false;
        }
        match source {
            Some(s) => s == self.source,
            None => !registry.types().is_primitive(self.source),
        }
    }

    fn priority(&self, _source: Option<TypeHash>, _target: TypeHash) -> i32 {
        self.priority
    }

    fn convert(
        &self,
        value: Value,
        _source: Option<TypeHash>,
        _target: TypeHash,
        _registry: &ConverterRegistry,
        fmt: &FormatContext,
    ) -> Result<Value, ConvertError> {
        (self.func)(value, fmt)
    }
}
