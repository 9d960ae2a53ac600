//! Rill compiler CLI.

use rillc::commands::{check_file, dump_tokens, print_graphs, print_trees};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "check" => {
            let Some(path) = file_arg(&args[2..]) else {
                eprintln!("Usage: rill check <file.rl> [--json]");
                std::process::exit(1);
            };
            let json = args.iter().any(|arg| arg == "--json");
            check_file(path, json);
        }
        "tree" => {
            let Some(path) = file_arg(&args[2..]) else {
                eprintln!("Usage: rill tree <file.rl> [--function <name>]");
                std::process::exit(1);
            };
            print_trees(path, function_filter(&args[2..]));
        }
        "graph" => {
            let Some(path) = file_arg(&args[2..]) else {
                eprintln!("Usage: rill graph <file.rl> [--function <name>]");
                std::process::exit(1);
            };
            print_graphs(path, function_filter(&args[2..]));
        }
        "tokens" => {
            let Some(path) = file_arg(&args[2..]) else {
                eprintln!("Usage: rill tokens <file.rl>");
                std::process::exit(1);
            };
            dump_tokens(path);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("Rill {}", env!("CARGO_PKG_VERSION"));
        }
        command => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

/// The first non-flag argument: the source file path.
fn file_arg(args: &[String]) -> Option<&str> {
    args.iter()
        .find(|arg| !arg.starts_with('-'))
        .map(String::as_str)
}

/// Value of `--function <name>` or `--function=<name>`.
fn function_filter(args: &[String]) -> Option<&str> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--function" {
            return iter.next().map(String::as_str);
        }
        if let Some(name) = arg.strip_prefix("--function=") {
            return Some(name);
        }
    }
    None
}

/// Install the hierarchical tracing subscriber when `RILL_LOG` is set.
///
/// `RILL_LOG` takes an env-filter directive, e.g. `rill_sema=debug` or
/// plain `debug`.
fn init_tracing() {
    if std::env::var("RILL_LOG").is_err() {
        return;
    }
    use tracing_subscriber::{prelude::*, EnvFilter};
    tracing_subscriber::registry()
        .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
        .with(EnvFilter::from_env("RILL_LOG"))
        .init();
}

fn print_usage() {
    println!("Rill Compiler");
    println!();
    println!("Usage: rill <command> [options]");
    println!();
    println!("Commands:");
    println!("  check <file.rl>      Analyze a file and report diagnostics");
    println!("  tree <file.rl>       Print operation trees");
    println!("  graph <file.rl>      Print control-flow graphs");
    println!("  tokens <file.rl>     Tokenize and display tokens");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Check options:");
    println!("  --json               Emit diagnostics as JSON on stdout");
    println!();
    println!("Tree/graph options:");
    println!("  --function <name>    Only the named function");
    println!();
    println!("Examples:");
    println!("  rill check main.rl");
    println!("  rill check main.rl --json");
    println!("  rill tree main.rl --function=main");
    println!("  rill graph main.rl");
    println!("  RILL_LOG=debug rill check main.rl");
}
