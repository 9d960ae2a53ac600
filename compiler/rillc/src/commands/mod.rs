//! CLI command implementations.

mod check;
mod graph;
mod tokens;
mod tree;

pub use check::check_file;
pub use graph::print_graphs;
pub use tokens::dump_tokens;
pub use tree::print_trees;

use std::io::IsTerminal;

use rill_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};

use crate::Analysis;

/// Read a source file, exiting with a message when that fails.
pub(crate) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("error: cannot read `{path}`: {err}");
            std::process::exit(1);
        }
    }
}

/// Emit every diagnostic to stderr and exit 1 when errors were
/// reported. Warnings print but do not stop the command.
pub(crate) fn report_errors(path: &str, source: &str, analysis: &Analysis) {
    if analysis.diagnostics.is_empty() {
        return;
    }
    let is_tty = std::io::stderr().is_terminal();
    let mut emitter =
        TerminalEmitter::stderr(ColorMode::Auto, is_tty).with_source(path, source.to_owned());
    emitter.emit_all(&analysis.diagnostics);
    emitter.emit_summary(analysis.error_count(), analysis.warning_count());
    emitter.flush();
    if analysis.has_errors() {
        std::process::exit(1);
    }
}
