//! Structural type data.

use crate::TypeId;

/// The shape of a type.
///
/// Every distinct value is interned exactly once, so two types are equal if
/// and only if their [`TypeId`]s are equal. `Optional` wraps a value type;
/// `Optional(Optional(_))` is representable but unreachable from source,
/// where the type grammar allows at most one `?`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TypeData {
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// Boolean.
    Bool,
    /// Immutable string.
    Str,
    /// Absence of a value; the return type of functions without one.
    Void,
    /// The type of a bare `null` literal.
    Null,
    /// The poison type produced when analysis fails.
    Error,
    /// A value type that may also hold `null`.
    Optional(TypeId),
}
