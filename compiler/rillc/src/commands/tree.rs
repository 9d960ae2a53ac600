//! The `tree` command: print operation trees.

use rill_sema::OperationRenderer;

use super::{read_file, report_errors};

/// Print each function's operation tree, optionally filtered to one
/// function by name.
pub fn print_trees(path: &str, filter: Option<&str>) {
    let source = read_file(path);
    let analysis = crate::analyze(&source);
    report_errors(path, &source, &analysis);

    let mut matched = false;
    for function in &analysis.sema.functions {
        let sig = analysis.sema.symbols.sig(function.func);
        let name = analysis.interner.lookup(sig.name);
        if filter.is_some_and(|wanted| wanted != name) {
            continue;
        }
        matched = true;

        println!("fn {name}");
        let rendered = OperationRenderer::new(
            &analysis.sema.arena,
            &analysis.sema.types,
            &analysis.sema.symbols,
            function,
            &analysis.interner,
            &source,
        )
        .render(function.body);
        println!("{rendered}");
    }

    if !matched {
        if let Some(wanted) = filter {
            eprintln!("error: no function named `{wanted}` in {path}");
            std::process::exit(1);
        }
    }
}
