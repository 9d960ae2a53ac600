//! Module-level items.

use std::fmt;

use super::ty::ParsedTy;
use crate::{Name, Span, Spanned, StmtId};

/// Function parameter: `name: type`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Param {
    pub name: Name,
    pub name_span: Span,
    pub ty: ParsedTy,
    pub span: Span,
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Param({:?}: {:?})", self.name, self.ty)
    }
}

impl Spanned for Param {
    fn span(&self) -> Span {
        self.span
    }
}

/// Range of parameters in the arena's flattened parameter list.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(C)]
pub struct ParamRange {
    pub start: u32,
    pub len: u16,
}

impl ParamRange {
    pub const EMPTY: ParamRange = ParamRange { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        ParamRange { start, len }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

impl fmt::Debug for ParamRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParamRange({}..{})",
            self.start,
            self.start + u32::from(self.len)
        )
    }
}

/// Function definition: `fn name(params) -> ret { body }`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Function {
    pub name: Name,
    pub name_span: Span,
    pub params: ParamRange,
    /// The parsed return type. None means `void`.
    pub return_ty: Option<ParsedTy>,
    /// The body block statement.
    pub body: StmtId,
    pub span: Span,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Function {{ name: {:?}, params: {:?}, ret: {:?} }}",
            self.name, self.params, self.return_ty
        )
    }
}

impl Spanned for Function {
    fn span(&self) -> Span {
        self.span
    }
}

/// A parsed source file: a sequence of function definitions.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Module {
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }
}
