//! Conversion classification.
//!
//! Rill has exactly four implicit conversions: identity, `int` to
//! `float` widening, `T` to `T?` lifting, and `null` to `T?`. The only
//! composite is `int` to `float?`, which widens first and lifts the
//! result. Casts (`as`) additionally allow `float` to `int` narrowing
//! and `T?` to `T` unwrapping, plus every implicit form.
//!
//! Classification here is pure: it assumes neither side is the poison
//! type. The binder short-circuits poisoned operands before asking,
//! because those convert silently in both directions without a node.

use rill_types::{TypeId, TypeInterner};

/// How a [`Conversion`](crate::OperationKind::Conversion) node changes
/// the representation of its operand.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ConversionKind {
    /// Same type. Only rendered for explicit `x as T` where `x: T`.
    Identity,
    /// `int` to `float`.
    Widening,
    /// `float` to `int`, truncating toward zero. Explicit only.
    Narrowing,
    /// `T` to `T?`.
    Lifting,
    /// The `null` literal to any `T?`.
    NullToOptional,
    /// `T?` to `T`, failing at runtime on null. Explicit only.
    Unwrapping,
    /// A cast with no defined conversion between its types.
    Invalid,
}

impl ConversionKind {
    /// Name used in rendered trees.
    pub fn as_str(self) -> &'static str {
        match self {
            ConversionKind::Identity => "Identity",
            ConversionKind::Widening => "Widening",
            ConversionKind::Narrowing => "Narrowing",
            ConversionKind::Lifting => "Lifting",
            ConversionKind::NullToOptional => "NullToOptional",
            ConversionKind::Unwrapping => "Unwrapping",
            ConversionKind::Invalid => "Invalid",
        }
    }
}

/// Result of classifying an implicit conversion.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ImplicitFit {
    /// The types already match; no node is inserted.
    Identity,
    /// One conversion node of the given kind.
    Single(ConversionKind),
    /// `int` to `float?`: an inner widening wrapped in an outer lifting.
    LiftedWidening,
}

/// Classify the implicit conversion from `from` to `to`, if one exists.
///
/// Either side being the poison type counts as [`ImplicitFit::Identity`]
/// so that poisoned values flow through without cascading diagnostics.
pub(crate) fn implicit_fit(
    from: TypeId,
    to: TypeId,
    types: &TypeInterner,
) -> Option<ImplicitFit> {
    if from == to || from.is_error() || to.is_error() {
        return Some(ImplicitFit::Identity);
    }
    if from == TypeId::INT && to == TypeId::FLOAT {
        return Some(ImplicitFit::Single(ConversionKind::Widening));
    }
    if let Some(inner) = types.optional_inner(to) {
        if from == TypeId::NULL {
            return Some(ImplicitFit::Single(ConversionKind::NullToOptional));
        }
        if from == inner {
            return Some(ImplicitFit::Single(ConversionKind::Lifting));
        }
        if from == TypeId::INT && inner == TypeId::FLOAT {
            return Some(ImplicitFit::LiftedWidening);
        }
    }
    None
}

/// Result of classifying an `as` cast.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum CastFit {
    /// One explicit conversion node of the given kind.
    Single(ConversionKind),
    /// `int as float?`: implicit inner widening, explicit outer lifting.
    LiftedWidening,
}

/// Classify the explicit conversion from `from` to `to`, if one exists.
///
/// `x as T` where `x: T` is allowed and renders an identity node.
/// Conversions that would need two explicit steps (`int? as float`,
/// `float as int?`) are not defined.
pub(crate) fn cast_fit(from: TypeId, to: TypeId, types: &TypeInterner) -> Option<CastFit> {
    match implicit_fit(from, to, types) {
        Some(ImplicitFit::Identity) => Some(CastFit::Single(ConversionKind::Identity)),
        Some(ImplicitFit::Single(kind)) => Some(CastFit::Single(kind)),
        Some(ImplicitFit::LiftedWidening) => Some(CastFit::LiftedWidening),
        None if from == TypeId::FLOAT && to == TypeId::INT => {
            Some(CastFit::Single(ConversionKind::Narrowing))
        }
        None if types.optional_inner(from) == Some(to) => {
            Some(CastFit::Single(ConversionKind::Unwrapping))
        }
        None => None,
    }
}
