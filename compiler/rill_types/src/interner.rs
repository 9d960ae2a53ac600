//! Deduplicating type storage.

use rustc_hash::FxHashMap;

use crate::{TypeData, TypeId};

const PRIMITIVES: [TypeData; TypeId::PRIMITIVE_COUNT] = [
    TypeData::Int,
    TypeData::Float,
    TypeData::Bool,
    TypeData::Str,
    TypeData::Void,
    TypeData::Null,
    TypeData::Error,
];

/// Interns [`TypeData`] values and hands out stable [`TypeId`]s.
///
/// Interning the same data twice returns the same id. The primitive types are
/// interned at construction, in the slot order their `TypeId` constants name,
/// so `intern(TypeData::Int)` always returns [`TypeId::INT`].
#[derive(Debug)]
pub struct TypeInterner {
    map: FxHashMap<TypeData, TypeId>,
    types: Vec<TypeData>,
}

impl TypeInterner {
    /// Creates an interner with the primitives pre-interned.
    #[expect(clippy::cast_possible_truncation, reason = "primitive slots fit in u32")]
    pub fn new() -> Self {
        let mut map = FxHashMap::default();
        for (slot, data) in PRIMITIVES.into_iter().enumerate() {
            map.insert(data, TypeId::from_raw(slot as u32));
        }
        TypeInterner {
            map,
            types: PRIMITIVES.to_vec(),
        }
    }

    /// Interns `data`, returning the id shared by every equal type.
    #[expect(clippy::cast_possible_truncation, reason = "interner indices fit in u32")]
    pub fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(&id) = self.map.get(&data) {
            return id;
        }
        let id = TypeId::from_raw(self.types.len() as u32);
        self.types.push(data);
        self.map.insert(data, id);
        id
    }

    /// Interns the optional type wrapping `inner`.
    ///
    /// The poison type absorbs the wrapper: lifting a failed analysis result
    /// yields [`TypeId::ERROR`], not an optional of it.
    pub fn optional(&mut self, inner: TypeId) -> TypeId {
        if inner.is_error() {
            return TypeId::ERROR;
        }
        self.intern(TypeData::Optional(inner))
    }

    /// The data interned under `id`.
    pub fn lookup(&self, id: TypeId) -> TypeData {
        debug_assert!(
            (id.raw() as usize) < self.types.len(),
            "type id {id:?} out of bounds"
        );
        self.types[id.raw() as usize]
    }

    /// Whether `id` is an optional type.
    pub fn is_optional(&self, id: TypeId) -> bool {
        matches!(self.lookup(id), TypeData::Optional(_))
    }

    /// The value type inside an optional, or `None` for every other type.
    pub fn optional_inner(&self, id: TypeId) -> Option<TypeId> {
        match self.lookup(id) {
            TypeData::Optional(inner) => Some(inner),
            _ => None,
        }
    }

    /// Renders `id` as source-level syntax.
    pub fn format_type(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.format_type_into(id, &mut out);
        out
    }

    /// Renders `id` as source-level syntax, appending to `out`.
    ///
    /// Primitives render as their keyword, the poison type as `?`, and
    /// optionals as the inner type followed by `?`.
    pub fn format_type_into(&self, id: TypeId, out: &mut String) {
        match self.lookup(id) {
            TypeData::Int => out.push_str("int"),
            TypeData::Float => out.push_str("float"),
            TypeData::Bool => out.push_str("bool"),
            TypeData::Str => out.push_str("str"),
            TypeData::Void => out.push_str("void"),
            TypeData::Null => out.push_str("null"),
            TypeData::Error => out.push('?'),
            TypeData::Optional(inner) => {
                self.format_type_into(inner, out);
                out.push('?');
            }
        }
    }

    /// Number of interned types, primitives included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the interner holds no types. Never true in practice since the
    /// primitives are interned at construction.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}
