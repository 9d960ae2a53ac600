//! Arena allocation for the flat AST.
//!
//! Contiguous storage for all expressions, statements and parameters of
//! one module, with bulk deallocation.

use super::ast::{Expr, Param, ParamRange, Stmt};
use super::{ExprId, ExprRange, StmtId, StmtRange};
use std::fmt;

/// Contiguous storage for all AST nodes in a module.
///
/// All expressions live in a flat Vec; child references use `ExprId`
/// indices and list children use ranges into side tables.
#[derive(Clone, Default)]
pub struct AstArena {
    /// All expressions (indexed by `ExprId`).
    exprs: Vec<Expr>,

    /// Flattened expression lists (call arguments).
    expr_lists: Vec<ExprId>,

    /// All statements (indexed by `StmtId`).
    stmts: Vec<Stmt>,

    /// Flattened statement lists (block bodies).
    stmt_lists: Vec<StmtId>,

    /// All parameters.
    params: Vec<Param>,
}

impl AstArena {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with estimated capacity based on source size.
    /// Heuristic: ~1 expression per 20 bytes of source.
    pub fn with_capacity(source_len: usize) -> Self {
        let estimated_exprs = source_len / 20;
        AstArena {
            exprs: Vec::with_capacity(estimated_exprs),
            expr_lists: Vec::with_capacity(estimated_exprs / 2),
            stmts: Vec::with_capacity(estimated_exprs / 4),
            stmt_lists: Vec::with_capacity(estimated_exprs / 4),
            params: Vec::with_capacity(estimated_exprs / 8),
        }
    }

    // ===== Expression allocation =====

    /// Allocate expression, return ID.
    #[inline]
    #[expect(clippy::cast_possible_truncation, reason = "arena indices fit in u32")]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    /// Get expression by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Get number of expressions.
    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Allocate expression list, return range.
    #[expect(clippy::cast_possible_truncation, reason = "arena indices fit in u32")]
    pub fn alloc_expr_list(&mut self, exprs: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = self.expr_lists.len() as u32;
        self.expr_lists.extend(exprs);
        let len = (self.expr_lists.len() as u32 - start) as u16;
        ExprRange::new(start, len)
    }

    /// Get expression list by range.
    #[inline]
    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        let end = start + range.len as usize;
        &self.expr_lists[start..end]
    }

    // ===== Statement allocation =====

    /// Allocate statement, return ID.
    #[inline]
    #[expect(clippy::cast_possible_truncation, reason = "arena indices fit in u32")]
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(self.stmts.len() as u32);
        self.stmts.push(stmt);
        id
    }

    /// Get statement by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    /// Get number of statements.
    #[inline]
    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    /// Allocate statement list, return range.
    #[expect(clippy::cast_possible_truncation, reason = "arena indices fit in u32")]
    pub fn alloc_stmt_list(&mut self, stmts: impl IntoIterator<Item = StmtId>) -> StmtRange {
        let start = self.stmt_lists.len() as u32;
        self.stmt_lists.extend(stmts);
        let len = (self.stmt_lists.len() as u32 - start) as u16;
        StmtRange::new(start, len)
    }

    /// Get statement list by range.
    #[inline]
    pub fn stmt_list(&self, range: StmtRange) -> &[StmtId] {
        let start = range.start as usize;
        let end = start + range.len as usize;
        &self.stmt_lists[start..end]
    }

    // ===== Parameter allocation =====

    /// Allocate parameter list, return range.
    #[expect(clippy::cast_possible_truncation, reason = "arena indices fit in u32")]
    pub fn alloc_params(&mut self, params: impl IntoIterator<Item = Param>) -> ParamRange {
        let start = self.params.len() as u32;
        self.params.extend(params);
        let len = (self.params.len() as u32 - start) as u16;
        ParamRange::new(start, len)
    }

    /// Get parameter list by range.
    #[inline]
    pub fn param_list(&self, range: ParamRange) -> &[Param] {
        let start = range.start as usize;
        let end = start + range.len as usize;
        &self.params[start..end]
    }
}

impl fmt::Debug for AstArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstArena")
            .field("exprs", &self.exprs.len())
            .field("stmts", &self.stmts.len())
            .field("params", &self.params.len())
            .finish()
    }
}
