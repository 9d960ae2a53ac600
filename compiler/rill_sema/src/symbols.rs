//! Function signatures and the module symbol table.
//!
//! Signatures are collected in a pass of their own before any body is
//! bound, so calls resolve regardless of definition order. Duplicate
//! function names keep their first signature for lookup; the duplicate
//! still gets a slot so its body binds against its own declaration.

use rill_diagnostic::{Diagnostic, ErrorCode};
use rill_ir::{AstArena, BaseTy, Module, Name, ParsedTy, Span, StringInterner};
use rill_types::{TypeId, TypeInterner};
use rustc_hash::FxHashMap;
use std::fmt;

/// Index of a function in the module's signature table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct FuncId(u32);

impl FuncId {
    /// Create a new `FuncId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        FuncId(index)
    }

    /// Get the index into the signature table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FuncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FuncId({})", self.0)
    }
}

/// Index of a parameter within its function's signature.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ParamId(u32);

impl ParamId {
    /// Create a new `ParamId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        ParamId(index)
    }

    /// Get the index into the parameter list.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParamId({})", self.0)
    }
}

/// One parameter of a collected signature.
#[derive(Clone, Debug)]
pub struct ParamSig {
    pub name: Name,
    pub name_span: Span,
    pub ty: TypeId,
}

/// A function's resolved signature.
#[derive(Clone, Debug)]
pub struct FunctionSig {
    pub name: Name,
    pub name_span: Span,
    pub params: Vec<ParamSig>,
    /// Declared return type; `void` when no annotation was written.
    pub return_ty: TypeId,
}

/// All function signatures of a module, with name lookup.
#[derive(Debug, Default)]
pub struct SymbolTable {
    sigs: Vec<FunctionSig>,
    by_name: FxHashMap<Name, FuncId>,
}

impl SymbolTable {
    /// Collect every function signature of the module.
    ///
    /// Reports duplicate function names (at the second definition),
    /// duplicate parameter names, and `void` parameters.
    #[tracing::instrument(level = "debug", skip_all, fields(functions = module.functions.len()))]
    pub fn collect(
        module: &Module,
        ast: &AstArena,
        interner: &StringInterner,
        types: &mut TypeInterner,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Self {
        let mut table = SymbolTable {
            sigs: Vec::with_capacity(module.functions.len()),
            by_name: FxHashMap::default(),
        };

        for func in &module.functions {
            let mut params = Vec::with_capacity(ast.param_list(func.params).len());
            for param in ast.param_list(func.params) {
                let mut ty = resolve_parsed_ty(param.ty, types);
                if ty.is_void() {
                    diagnostics.push(
                        Diagnostic::error(ErrorCode::E2002)
                            .with_message("parameters cannot have type `void`")
                            .with_label(param.ty.span, "no value has this type"),
                    );
                    ty = TypeId::ERROR;
                }
                if let Some(first) = params
                    .iter()
                    .find(|p: &&ParamSig| p.name == param.name)
                    .map(|p| p.name_span)
                {
                    diagnostics.push(
                        Diagnostic::error(ErrorCode::E2006)
                            .with_message(format!(
                                "duplicate parameter `{}`",
                                interner.lookup(param.name)
                            ))
                            .with_label(param.name_span, "declared a second time here")
                            .with_secondary_label(first, "first declared here"),
                    );
                }
                params.push(ParamSig {
                    name: param.name,
                    name_span: param.name_span,
                    ty,
                });
            }

            let return_ty = func
                .return_ty
                .map_or(TypeId::VOID, |ty| resolve_parsed_ty(ty, types));

            let id = table.push(FunctionSig {
                name: func.name,
                name_span: func.name_span,
                params,
                return_ty,
            });
            if let Some(&first) = table.by_name.get(&func.name) {
                diagnostics.push(
                    Diagnostic::error(ErrorCode::E2006)
                        .with_message(format!(
                            "function `{}` is defined more than once",
                            interner.lookup(func.name)
                        ))
                        .with_label(func.name_span, "redefined here")
                        .with_secondary_label(table.sigs[first.index()].name_span, "first defined here"),
                );
            } else {
                table.by_name.insert(func.name, id);
            }
        }

        table
    }

    #[expect(clippy::cast_possible_truncation, reason = "signature indices fit in u32")]
    fn push(&mut self, sig: FunctionSig) -> FuncId {
        let id = FuncId::new(self.sigs.len() as u32);
        self.sigs.push(sig);
        id
    }

    /// Resolve a function name. Duplicates resolve to the first definition.
    #[inline]
    pub fn lookup(&self, name: Name) -> Option<FuncId> {
        self.by_name.get(&name).copied()
    }

    /// Get a signature by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn sig(&self, id: FuncId) -> &FunctionSig {
        &self.sigs[id.index()]
    }

    /// Number of collected signatures.
    #[inline]
    pub fn len(&self) -> usize {
        self.sigs.len()
    }

    /// Check whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sigs.is_empty()
    }
}

/// Resolve a parsed type annotation to an interned type.
///
/// An unparseable annotation resolves to the poison type; the parser
/// already reported it.
pub(crate) fn resolve_parsed_ty(ty: ParsedTy, types: &mut TypeInterner) -> TypeId {
    let base = match ty.base {
        BaseTy::Int => TypeId::INT,
        BaseTy::Float => TypeId::FLOAT,
        BaseTy::Bool => TypeId::BOOL,
        BaseTy::Str => TypeId::STR,
        BaseTy::Void => TypeId::VOID,
        BaseTy::Error => TypeId::ERROR,
    };
    if ty.optional {
        types.optional(base)
    } else {
        base
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect_source(
        source: &str,
    ) -> (SymbolTable, TypeInterner, Vec<Diagnostic>, StringInterner) {
        let interner = StringInterner::new();
        let tokens = rill_lexer::lex(source, &interner).tokens;
        let parsed = rill_parse::parse(&tokens, &interner);
        assert!(
            parsed.errors.is_empty(),
            "parse errors in test source: {:?}",
            parsed.errors
        );

        let mut types = TypeInterner::new();
        let mut diagnostics = Vec::new();
        let table = SymbolTable::collect(
            &parsed.module,
            &parsed.arena,
            &interner,
            &mut types,
            &mut diagnostics,
        );
        (table, types, diagnostics, interner)
    }

    #[test]
    fn signatures_resolve_types_and_default_to_void() {
        let (table, types, diagnostics, interner) =
            collect_source("fn f(x: int, y: float?) -> str { return \"\"; }\nfn g() { }");

        assert!(diagnostics.is_empty());
        assert_eq!(table.len(), 2);

        let f = table.sig(table.lookup(interner.intern("f")).unwrap());
        assert_eq!(f.params.len(), 2);
        assert_eq!(f.params[0].ty, TypeId::INT);
        assert_eq!(types.optional_inner(f.params[1].ty), Some(TypeId::FLOAT));
        assert_eq!(f.return_ty, TypeId::STR);

        let g = table.sig(table.lookup(interner.intern("g")).unwrap());
        assert!(g.params.is_empty());
        assert_eq!(g.return_ty, TypeId::VOID);
    }

    #[test]
    fn void_parameters_poison_and_report() {
        let (table, _, diagnostics, interner) = collect_source("fn f(x: void) { }");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::E2002);

        let f = table.sig(table.lookup(interner.intern("f")).unwrap());
        assert_eq!(f.params[0].ty, TypeId::ERROR);
    }

    #[test]
    fn duplicate_parameters_report_at_the_second_occurrence() {
        let (_, _, diagnostics, _) = collect_source("fn f(a: int, a: float) { }");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::E2006);
        assert!(diagnostics[0].message.contains("duplicate parameter `a`"));
    }

    #[test]
    fn duplicate_functions_keep_the_first_for_lookup() {
        let (table, _, diagnostics, interner) =
            collect_source("fn f() -> int { return 1; }\nfn f() -> str { return \"\"; }");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::E2006);
        assert_eq!(table.len(), 2);

        let id = table.lookup(interner.intern("f")).unwrap();
        assert_eq!(id, FuncId::new(0));
        assert_eq!(table.sig(id).return_ty, TypeId::INT);
        assert_eq!(table.sig(FuncId::new(1)).return_ty, TypeId::STR);
    }
}
