//! The `check` command: run the pipeline and report diagnostics.

use rill_diagnostic::emitter::{DiagnosticEmitter, JsonEmitter};

use super::{read_file, report_errors};

/// Analyze a file and emit its diagnostics.
///
/// Human output goes to stderr with a summary line; `--json` prints a
/// machine-readable array on stdout instead. Exits 1 when any error was
/// reported.
pub fn check_file(path: &str, json: bool) {
    let source = read_file(path);
    let analysis = crate::analyze(&source);

    if json {
        let mut emitter = JsonEmitter::new(std::io::stdout());
        emitter.begin();
        emitter.emit_all(&analysis.diagnostics);
        emitter.end();
        emitter.flush();
        if analysis.has_errors() {
            std::process::exit(1);
        }
        return;
    }

    report_errors(path, &source, &analysis);
    println!("OK: {path} ({} functions)", analysis.sema.functions.len());
}
