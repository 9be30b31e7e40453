//! TypeRegistry - central storage for runtime type descriptions.
//!
//! The registry maps [`TypeHash`] to [`TypeEntry`] and provides O(1) lookup
//! plus register-or-get helpers for parameterized instances
//! (`optional<T>`, `list<T>`, ...). Converters consult it to answer shape
//! questions: is this type an enum, what element does this sequence hold,
//! does this type accept null.
//!
//! # Thread Safety
//!
//! `TypeRegistry` is **not thread-safe** by design. The usage pattern is:
//!
//! - **Registration phase**: the registry is populated single-threaded
//!   during application setup, before any conversion runs.
//! - **Conversion phase**: after setup the registry is effectively
//!   read-only; converters only read from it. A caller that needs
//!   multi-threaded access must wrap it in its own synchronization.
//!
//! # Example
//!
//! ```
//! use recast_core::{PrimitiveKind, TypeRegistry, primitives};
//!
//! let mut types = TypeRegistry::with_primitives();
//! let weekday = types
//!     .register_enum("Weekday", PrimitiveKind::Int32, &[("Monday", 1), ("Tuesday", 2)])
//!     .unwrap();
//!
//! assert_eq!(types.name_of(weekday), "Weekday");
//! assert_eq!(types.name_of(primitives::INT32), "int");
//! ```

use rustc_hash::{FxHashMap, FxHashSet};

use crate::entry::{
    EnumEntry, EnumMember, OpaqueEntry, OptionalEntry, SequenceBuilder, SequenceEntry, TypeEntry,
};
use crate::error::ConvertError;
use crate::value::{EnumValue, Value};
use crate::{PrimitiveKind, TypeHash, primitives};

/// Central storage for runtime type descriptions.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: FxHashMap<TypeHash, TypeEntry>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all primitive scalars and `any` pre-registered.
    pub fn with_primitives() -> Self {
        let mut registry = Self::new();
        registry.register_all_primitives();
        registry
    }

    /// Register all primitive scalars and the universal `any` type.
    pub fn register_all_primitives(&mut self) {
        for kind in PrimitiveKind::ALL {
            self.entries
                .insert(kind.type_hash(), TypeEntry::Primitive(kind));
        }
        self.entries.insert(
            primitives::ANY,
            TypeEntry::Opaque(OpaqueEntry { name: "any".to_string() }),
        );
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register an entry under a hash. Registering an occupied hash is an
    /// error; use the `*_of` helpers for register-or-get semantics.
    pub fn register(&mut self, hash: TypeHash, entry: TypeEntry) -> Result<(), ConvertError> {
        if self.entries.contains_key(&hash) {
            return Err(ConvertError::BadTypeDefinition {
                name: entry.name().to_string(),
                detail: format!("hash {hash} is already registered as '{}'", self.name_of(hash)),
            });
        }
        self.entries.insert(hash, entry);
        Ok(())
    }

    /// Register an enumeration type. Members are `(name, underlying value)`
    /// pairs; the underlying kind must be integral.
    pub fn register_enum(
        &mut self,
        name: &str,
        underlying: PrimitiveKind,
        members: &[(&str, i64)],
    ) -> Result<TypeHash, ConvertError> {
        let members = members
            .iter()
            .map(|(n, v)| EnumMember { name: n.to_string(), value: *v })
            .collect();
        let entry = EnumEntry::new(name, underlying, members)?;
        let hash = TypeHash::from_name(name);
        self.register(hash, TypeEntry::Enum(entry))?;
        Ok(hash)
    }

    /// Register an opaque user type by name.
    pub fn register_opaque(&mut self, name: &str) -> Result<TypeHash, ConvertError> {
        let hash = TypeHash::from_name(name);
        self.register(hash, TypeEntry::Opaque(OpaqueEntry { name: name.to_string() }))?;
        Ok(hash)
    }

    /// Register a custom sequence type with an explicit construction
    /// capability. This is the adapter point for user containers that are
    /// not covered by the built-in `list`/`array`/`view`/`seq` shapes.
    pub fn register_sequence(
        &mut self,
        name: &str,
        element: TypeHash,
        builder: SequenceBuilder,
    ) -> Result<TypeHash, ConvertError> {
        let hash = TypeHash::from_name(name);
        self.register(
            hash,
            TypeEntry::Sequence(SequenceEntry {
                name: name.to_string(),
                element,
                builder,
            }),
        )?;
        Ok(hash)
    }

    // ==========================================================================
    // Parameterized instances (register-or-get)
    // ==========================================================================

    /// The `optional<T>` instance for a payload type.
    pub fn optional_of(&mut self, inner: TypeHash) -> TypeHash {
        let hash = TypeHash::from_template_instance(primitives::OPTIONAL, &[inner]);
        if !self.entries.contains_key(&hash) {
            let name = format!("optional<{}>", self.name_of(inner));
            self.entries
                .insert(hash, TypeEntry::Optional(OptionalEntry { name, inner }));
        }
        hash
    }

    /// The growable `list<T>` instance for an element type: constructed
    /// with a capacity, populated by append.
    pub fn list_of(&mut self, element: TypeHash) -> TypeHash {
        let hash = TypeHash::from_template_instance(primitives::LIST, &[element]);
        if !self.entries.contains_key(&hash) {
            let name = format!("list<{}>", self.name_of(element));
            self.entries.insert(
                hash,
                TypeEntry::Sequence(SequenceEntry {
                    name,
                    element,
                    builder: SequenceBuilder::Appendable { with_capacity: true },
                }),
            );
        }
        hash
    }

    /// The fixed-size `array<T>` instance for an element type: allocated to
    /// the exact element count, populated by index.
    pub fn array_of(&mut self, element: TypeHash) -> TypeHash {
        let hash = TypeHash::from_template_instance(primitives::ARRAY, &[element]);
        if !self.entries.contains_key(&hash) {
            let name = format!("array<{}>", self.name_of(element));
            self.entries.insert(
                hash,
                TypeEntry::Sequence(SequenceEntry {
                    name,
                    element,
                    builder: SequenceBuilder::FixedSize,
                }),
            );
        }
        hash
    }

    /// The read-only `view<T>` instance for an element type: built as a
    /// wrapper over `list<T>`.
    pub fn view_of(&mut self, element: TypeHash) -> TypeHash {
        let list = self.list_of(element);
        let hash = TypeHash::from_template_instance(primitives::VIEW, &[element]);
        if !self.entries.contains_key(&hash) {
            let name = format!("view<{}>", self.name_of(element));
            self.entries.insert(
                hash,
                TypeEntry::Sequence(SequenceEntry {
                    name,
                    element,
                    builder: SequenceBuilder::WrapsInner(list),
                }),
            );
        }
        hash
    }

    /// The abstract `seq<T>` interface for an element type, mapped to
    /// `list<T>` for construction.
    pub fn seq_of(&mut self, element: TypeHash) -> TypeHash {
        let list = self.list_of(element);
        let hash = TypeHash::from_template_instance(primitives::SEQ, &[element]);
        if !self.entries.contains_key(&hash) {
            let name = format!("seq<{}>", self.name_of(element));
            self.entries.insert(
                hash,
                TypeEntry::Sequence(SequenceEntry {
                    name,
                    element,
                    builder: SequenceBuilder::Concrete(list),
                }),
            );
        }
        hash
    }

    /// The non-generic sequence interface, mapped to `array<any>` for
    /// construction.
    pub fn untyped_seq(&mut self) -> TypeHash {
        let array = self.array_of(primitives::ANY);
        if !self.entries.contains_key(&primitives::SEQ) {
            self.entries.insert(
                primitives::SEQ,
                TypeEntry::Sequence(SequenceEntry {
                    name: "seq".to_string(),
                    element: primitives::ANY,
                    builder: SequenceBuilder::Concrete(array),
                }),
            );
        }
        primitives::SEQ
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Get a type entry by hash.
    pub fn get(&self, hash: TypeHash) -> Option<&TypeEntry> {
        self.entries.get(&hash)
    }

    /// Check if a hash is registered.
    pub fn contains(&self, hash: TypeHash) -> bool {
        self.entries.contains_key(&hash)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The display name of a type; unregistered hashes render as hex.
    pub fn name_of(&self, hash: TypeHash) -> String {
        self.get(hash)
            .map(|e| e.name().to_string())
            .unwrap_or_else(|| hash.to_string())
    }

    /// The primitive kind of a registered scalar type.
    pub fn kind_of(&self, hash: TypeHash) -> Option<PrimitiveKind> {
        match self.get(hash)? {
            TypeEntry::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Whether the type is a registered primitive scalar.
    pub fn is_primitive(&self, hash: TypeHash) -> bool {
        self.kind_of(hash).is_some()
    }

    /// Whether a null value inhabits the type. Optionals, sequences and
    /// opaque types accept null; primitives and enums do not.
    pub fn accepts_null(&self, hash: TypeHash) -> bool {
        self.get(hash).map(TypeEntry::accepts_null).unwrap_or(false)
    }

    /// The enum entry of a registered enumeration type.
    pub fn as_enum(&self, hash: TypeHash) -> Option<&EnumEntry> {
        match self.get(hash)? {
            TypeEntry::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// The optional entry of a registered wrapper type.
    pub fn as_optional(&self, hash: TypeHash) -> Option<&OptionalEntry> {
        match self.get(hash)? {
            TypeEntry::Optional(o) => Some(o),
            _ => None,
        }
    }

    /// The sequence entry of a registered sequence type.
    pub fn as_sequence(&self, hash: TypeHash) -> Option<&SequenceEntry> {
        match self.get(hash)? {
            TypeEntry::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Resolve a sequence target to its buildable entry, following
    /// interface-to-concrete mappings. A cyclic or dangling mapping is a
    /// registration defect and reported as such.
    pub fn resolve_sequence(
        &self,
        ty: TypeHash,
    ) -> Result<(TypeHash, &SequenceEntry), ConvertError> {
        let mut visited = FxHashSet::default();
        let mut current = ty;
        loop {
            if !visited.insert(current) {
                return Err(ConvertError::BadTypeDefinition {
                    name: self.name_of(ty),
                    detail: "cyclic sequence interface mapping".to_string(),
                });
            }
            let entry = self
                .get(current)
                .ok_or(ConvertError::UnknownType { hash: current })?;
            let TypeEntry::Sequence(seq) = entry else {
                return Err(ConvertError::InvalidCast {
                    from: self.name_of(current),
                    to: "sequence".to_string(),
                });
            };
            match seq.builder {
                SequenceBuilder::Concrete(next) => current = next,
                _ => return Ok((current, seq)),
            }
        }
    }

    /// Build an enum member value by name, if the type and member exist.
    pub fn enum_value(&self, ty: TypeHash, member: &str) -> Option<Value> {
        let entry = self.as_enum(ty)?;
        let m = entry.member_by_name(member)?;
        Some(Value::Enum(EnumValue {
            ty,
            member: m.name.clone(),
            value: m.value,
        }))
    }
}
