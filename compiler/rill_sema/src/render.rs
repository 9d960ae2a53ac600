//! Operation tree rendering.
//!
//! Produces the textual tree format the golden tests compare against.
//! One line per operation: the kind, its attributes in parentheses, and
//! an excerpt of the source it was bound from. Child labels indent by
//! two, children by four:
//!
//! ```text
//! BinaryOperator (Add) (Type: int, Constant: 3) (Syntax: '1 + 2')
//!   Left:
//!     Literal (Type: int, Constant: 1) (Syntax: '1')
//!   Right:
//!     Literal (Type: int, Constant: 2) (Syntax: '2')
//! ```
//!
//! The format is part of the crate's contract: golden files are diffed
//! textually, so every change here is a change to every expectation.

use std::fmt::Write;

use rill_ir::{Span, StringInterner};
use rill_stack::ensure_sufficient_stack;
use rill_types::TypeInterner;

use crate::bind::BoundFunction;
use crate::operation::{
    ConstValue, LocalId, OpId, Operation, OperationArena, OperationFlags, OperationKind,
};
use crate::symbols::SymbolTable;

/// Number of excerpt characters before the middle is elided.
const EXCERPT_LIMIT: usize = 32;
/// Characters kept on each side of an elided excerpt.
const EXCERPT_EDGE: usize = 12;

/// Renders one bound function's operations as a labeled tree.
pub struct OperationRenderer<'a> {
    arena: &'a OperationArena,
    types: &'a TypeInterner,
    symbols: &'a SymbolTable,
    function: &'a BoundFunction,
    interner: &'a StringInterner,
    source: &'a str,
}

impl<'a> OperationRenderer<'a> {
    pub fn new(
        arena: &'a OperationArena,
        types: &'a TypeInterner,
        symbols: &'a SymbolTable,
        function: &'a BoundFunction,
        interner: &'a StringInterner,
        source: &'a str,
    ) -> Self {
        OperationRenderer {
            arena,
            types,
            symbols,
            function,
            interner,
            source,
        }
    }

    /// Render the tree rooted at `root`.
    pub fn render(&self, root: OpId) -> String {
        let mut out = String::new();
        self.render_op(root, 0, &mut out);
        out
    }

    /// Render one operation and its subtree at the given indent.
    pub fn render_op(&self, id: OpId, indent: usize, out: &mut String) {
        ensure_sufficient_stack(|| self.render_op_inner(id, indent, out));
    }

    fn render_op_inner(&self, id: OpId, indent: usize, out: &mut String) {
        let op = self.arena.op(id);
        pad(out, indent);
        self.write_head(op, out);
        self.write_attrs(op, out);
        let _ = write!(out, " (Syntax: '{}')", excerpt(self.source, op.span));
        out.push('\n');

        match op.kind {
            OperationKind::Invalid { children } => {
                self.write_op_list("Children", children, indent, out);
            }

            OperationKind::Block { statements, locals } => {
                let local_ids = self.arena.local_list(locals);
                if !local_ids.is_empty() {
                    pad(out, indent + 2);
                    out.push_str("Locals:");
                    for &local in local_ids {
                        let info = &self.function.locals[local.index()];
                        let _ = write!(
                            out,
                            " [{} {}]",
                            self.types.format_type(info.ty),
                            self.interner.lookup(info.name)
                        );
                    }
                    out.push('\n');
                }
                for &statement in self.arena.op_list(statements) {
                    self.render_op(statement, indent + 2, out);
                }
            }

            OperationKind::VariableDeclaration { initializer, .. } => {
                if let Some(initializer) = initializer {
                    self.labeled("Initializer", initializer, indent, out);
                }
            }

            OperationKind::ExpressionStatement { expression } => {
                self.labeled("Expression", expression, indent, out);
            }

            OperationKind::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                self.labeled("Condition", condition, indent, out);
                self.labeled("WhenTrue", when_true, indent, out);
                self.write_label("WhenFalse", indent, out);
                match when_false {
                    Some(when_false) => self.render_op(when_false, indent + 4, out),
                    None => {
                        pad(out, indent + 4);
                        out.push_str("null\n");
                    }
                }
            }

            OperationKind::WhileLoop { condition, body } => {
                self.labeled("Condition", condition, indent, out);
                self.labeled("Body", body, indent, out);
            }

            OperationKind::Return { value } => {
                if let Some(value) = value {
                    self.labeled("ReturnedValue", value, indent, out);
                }
            }

            OperationKind::Invocation { arguments, .. } => {
                self.write_op_list("Arguments", arguments, indent, out);
            }

            OperationKind::Conversion { operand, .. }
            | OperationKind::UnaryOperator { operand, .. }
            | OperationKind::IsNull { operand } => {
                self.labeled("Operand", operand, indent, out);
            }

            OperationKind::BinaryOperator { left, right, .. } => {
                self.labeled("Left", left, indent, out);
                self.labeled("Right", right, indent, out);
            }

            OperationKind::Coalesce { operand, when_null } => {
                self.labeled("Operand", operand, indent, out);
                self.labeled("WhenNull", when_null, indent, out);
            }

            OperationKind::SimpleAssignment { target, value }
            | OperationKind::CompoundAssignment { target, value, .. } => {
                self.labeled("Left", target, indent, out);
                self.labeled("Right", value, indent, out);
            }

            OperationKind::FlowCapture { value, .. } => {
                self.labeled("Value", value, indent, out);
            }

            OperationKind::Branch { .. }
            | OperationKind::Literal
            | OperationKind::LocalReference { .. }
            | OperationKind::ParameterReference { .. }
            | OperationKind::FlowCaptureReference { .. } => {}
        }
    }

    fn write_head(&self, op: &Operation, out: &mut String) {
        match op.kind {
            OperationKind::Invalid { .. } => out.push_str("Invalid"),
            OperationKind::Block { statements, locals } => {
                let _ = write!(out, "Block ({} statements", statements.len());
                if !locals.is_empty() {
                    let _ = write!(out, ", {} locals", locals.len());
                }
                out.push(')');
            }
            OperationKind::VariableDeclaration { local, .. } => {
                let _ = write!(out, "VariableDeclaration: {}", self.local_name(local));
            }
            OperationKind::ExpressionStatement { .. } => out.push_str("ExpressionStatement"),
            OperationKind::Conditional { .. } => out.push_str("Conditional"),
            OperationKind::WhileLoop { .. } => out.push_str("WhileLoop"),
            OperationKind::Branch { jump } => {
                let _ = write!(out, "Branch ({})", jump.as_str());
            }
            OperationKind::Return { .. } => out.push_str("Return"),
            OperationKind::Literal => out.push_str("Literal"),
            OperationKind::LocalReference { local } => {
                let _ = write!(out, "LocalReference: {}", self.local_name(local));
            }
            OperationKind::ParameterReference { param } => {
                let sig = self.symbols.sig(self.function.func);
                let name = self.interner.lookup(sig.params[param.index()].name);
                let _ = write!(out, "ParameterReference: {name}");
            }
            OperationKind::Invocation { target, .. } => {
                let name = self.interner.lookup(self.symbols.sig(target).name);
                let _ = write!(out, "Invocation: {name}");
            }
            OperationKind::Conversion { conversion, .. } => {
                let _ = write!(out, "Conversion ({})", conversion.as_str());
            }
            OperationKind::UnaryOperator { operator, .. } => {
                let _ = write!(out, "UnaryOperator ({}{})", operator.as_str(), lifted(op));
            }
            OperationKind::BinaryOperator { operator, .. } => {
                let _ = write!(out, "BinaryOperator ({}{})", operator.as_str(), lifted(op));
            }
            OperationKind::Coalesce { .. } => out.push_str("Coalesce"),
            OperationKind::SimpleAssignment { .. } => out.push_str("SimpleAssignment"),
            OperationKind::CompoundAssignment { operator, .. } => {
                let _ = write!(
                    out,
                    "CompoundAssignment ({}{})",
                    operator.as_str(),
                    lifted(op)
                );
            }
            OperationKind::IsNull { .. } => out.push_str("IsNull"),
            OperationKind::FlowCapture { capture, .. } => {
                let _ = write!(out, "FlowCapture: {capture}");
            }
            OperationKind::FlowCaptureReference { capture } => {
                let _ = write!(out, "FlowCaptureReference: {capture}");
            }
        }
    }

    /// Attributes in parentheses: type, constant, then flags. Nothing
    /// is written when the operation has none.
    fn write_attrs(&self, op: &Operation, out: &mut String) {
        let mut attrs: Vec<String> = Vec::new();
        if let Some(ty) = op.ty {
            attrs.push(format!("Type: {}", self.types.format_type(ty)));
        }
        if let Some(constant) = op.constant {
            attrs.push(format!("Constant: {}", self.format_constant(constant)));
        }
        if op.flags.contains(OperationFlags::IMPLICIT) {
            attrs.push("Implicit".to_owned());
        }
        if op.flags.is_invalid() {
            attrs.push("Invalid".to_owned());
        }
        if !attrs.is_empty() {
            let _ = write!(out, " ({})", attrs.join(", "));
        }
    }

    fn format_constant(&self, value: ConstValue) -> String {
        match value {
            ConstValue::Int(v) => v.to_string(),
            ConstValue::Float(v) => v.to_string(),
            ConstValue::Bool(v) => v.to_string(),
            ConstValue::Str(name) => escape_str(self.interner.lookup(name)),
            ConstValue::Null => "null".to_owned(),
        }
    }

    fn local_name(&self, local: LocalId) -> &str {
        self.interner.lookup(self.function.locals[local.index()].name)
    }

    fn write_label(&self, label: &str, indent: usize, out: &mut String) {
        pad(out, indent + 2);
        out.push_str(label);
        out.push_str(":\n");
    }

    fn labeled(&self, label: &str, child: OpId, indent: usize, out: &mut String) {
        self.write_label(label, indent, out);
        self.render_op(child, indent + 4, out);
    }

    /// A counted child list: `Arguments(2):` followed by the children,
    /// or a bare `Arguments(0)` when empty.
    fn write_op_list(&self, label: &str, range: crate::operation::OpRange, indent: usize, out: &mut String) {
        let ops = self.arena.op_list(range);
        pad(out, indent + 2);
        if ops.is_empty() {
            let _ = write!(out, "{label}(0)");
            out.push('\n');
            return;
        }
        let _ = write!(out, "{label}({}):", ops.len());
        out.push('\n');
        for &child in ops {
            self.render_op(child, indent + 4, out);
        }
    }
}

fn pad(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push(' ');
    }
}

fn lifted(op: &Operation) -> &'static str {
    if op.flags.is_lifted() {
        ", Lifted"
    } else {
        ""
    }
}

/// Excerpt of the source covered by `span`, line breaks collapsed.
///
/// A newline plus the following line's indentation becomes one space,
/// so multi-line constructs render on one line. Excerpts longer than
/// [`EXCERPT_LIMIT`] characters keep their edges around a ` ... ` gap.
fn excerpt(source: &str, span: Span) -> String {
    let raw = source.get(span.to_range()).unwrap_or("");
    let mut text = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' || c == '\r' {
            while matches!(chars.peek(), Some('\r' | '\n' | ' ' | '\t')) {
                chars.next();
            }
            text.push(' ');
        } else {
            text.push(c);
        }
    }

    let count = text.chars().count();
    if count <= EXCERPT_LIMIT {
        return text;
    }
    let head: String = text.chars().take(EXCERPT_EDGE).collect();
    let tail: String = text.chars().skip(count - EXCERPT_EDGE).collect();
    format!("{head} ... {tail}")
}

/// Quote and escape a string constant for display.
fn escape_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn excerpt_collapses_line_breaks() {
        let source = "if c {\n    return;\n}";
        let span = Span::new(0, source.len() as u32);
        assert_eq!(excerpt(source, span), "if c { return; }");
    }

    #[test]
    fn excerpt_elides_the_middle() {
        let source = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        let span = Span::new(0, 40);
        assert_eq!(
            excerpt(source, span),
            "aaaaaaaaaaaa ... aaaaaaaaaaaa"
        );
    }

    #[test]
    fn excerpt_keeps_short_text_verbatim() {
        let source = "a + b * c";
        let span = Span::new(0, source.len() as u32);
        assert_eq!(excerpt(source, span), "a + b * c");
    }

    #[test]
    fn escape_str_quotes_and_escapes() {
        assert_eq!(escape_str("plain"), "\"plain\"");
        assert_eq!(escape_str("a\"b"), "\"a\\\"b\"");
        assert_eq!(escape_str("line\nbreak\ttab"), "\"line\\nbreak\\ttab\"");
        assert_eq!(escape_str("back\\slash"), "\"back\\\\slash\"");
    }
}
