//! Compact type handles.

use core::fmt;

/// A handle to an interned type.
///
/// Handles are indices into a [`TypeInterner`](crate::TypeInterner). The
/// primitive types occupy fixed slots so they are usable as constants without
/// going through an interner; optional types are appended behind them as they
/// are interned.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    /// The `int` type.
    pub const INT: TypeId = TypeId(0);
    /// The `float` type.
    pub const FLOAT: TypeId = TypeId(1);
    /// The `bool` type.
    pub const BOOL: TypeId = TypeId(2);
    /// The `str` type.
    pub const STR: TypeId = TypeId(3);
    /// The `void` type.
    pub const VOID: TypeId = TypeId(4);
    /// The type of a bare `null` literal, before it converts to an optional.
    pub const NULL: TypeId = TypeId(5);
    /// The poison type produced when analysis fails.
    pub const ERROR: TypeId = TypeId(6);

    /// Number of pre-interned primitive slots.
    pub const PRIMITIVE_COUNT: usize = 7;

    /// Builds a handle from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    /// The raw index value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether this is the poison type.
    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }

    /// Whether this is `void`.
    #[inline]
    pub const fn is_void(self) -> bool {
        self.0 == Self::VOID.0
    }

    /// Whether this is `int` or `float`.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.0 == Self::INT.0 || self.0 == Self::FLOAT.0
    }

    /// The display name of a primitive type, or `None` for interned types
    /// whose spelling needs the interner.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("int"),
            1 => Some("float"),
            2 => Some("bool"),
            3 => Some("str"),
            4 => Some("void"),
            5 => Some("null"),
            6 => Some("?"),
            _ => None,
        }
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TypeId::INT => f.write_str("TypeId::INT"),
            TypeId::FLOAT => f.write_str("TypeId::FLOAT"),
            TypeId::BOOL => f.write_str("TypeId::BOOL"),
            TypeId::STR => f.write_str("TypeId::STR"),
            TypeId::VOID => f.write_str("TypeId::VOID"),
            TypeId::NULL => f.write_str("TypeId::NULL"),
            TypeId::ERROR => f.write_str("TypeId::ERROR"),
            TypeId(raw) => write!(f, "TypeId({raw})"),
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "type#{}", self.0),
        }
    }
}

// Handles are passed by value everywhere; keep them word-sized.
const _: () = assert!(size_of::<TypeId>() == 4);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn primitives_occupy_fixed_slots() {
        let primitives = [
            TypeId::INT,
            TypeId::FLOAT,
            TypeId::BOOL,
            TypeId::STR,
            TypeId::VOID,
            TypeId::NULL,
            TypeId::ERROR,
        ];
        assert_eq!(primitives.len(), TypeId::PRIMITIVE_COUNT);
        for (slot, id) in primitives.iter().enumerate() {
            assert_eq!(id.raw() as usize, slot);
        }
    }

    #[test]
    fn names_cover_every_primitive() {
        assert_eq!(TypeId::INT.name(), Some("int"));
        assert_eq!(TypeId::FLOAT.name(), Some("float"));
        assert_eq!(TypeId::BOOL.name(), Some("bool"));
        assert_eq!(TypeId::STR.name(), Some("str"));
        assert_eq!(TypeId::VOID.name(), Some("void"));
        assert_eq!(TypeId::NULL.name(), Some("null"));
        assert_eq!(TypeId::ERROR.name(), Some("?"));
        assert_eq!(TypeId::from_raw(7).name(), None);
    }

    #[test]
    fn debug_names_primitives_and_indexes_the_rest() {
        assert_eq!(format!("{:?}", TypeId::INT), "TypeId::INT");
        assert_eq!(format!("{:?}", TypeId::ERROR), "TypeId::ERROR");
        assert_eq!(format!("{:?}", TypeId::from_raw(12)), "TypeId(12)");
    }

    #[test]
    fn display_uses_source_spelling() {
        assert_eq!(TypeId::FLOAT.to_string(), "float");
        assert_eq!(TypeId::ERROR.to_string(), "?");
        assert_eq!(TypeId::from_raw(9).to_string(), "type#9");
    }

    #[test]
    fn predicates_match_their_slots() {
        assert!(TypeId::INT.is_numeric());
        assert!(TypeId::FLOAT.is_numeric());
        assert!(!TypeId::BOOL.is_numeric());
        assert!(TypeId::ERROR.is_error());
        assert!(!TypeId::NULL.is_error());
        assert!(TypeId::VOID.is_void());
        assert!(!TypeId::STR.is_void());
    }
}
