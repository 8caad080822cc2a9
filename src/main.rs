use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use minic::{Parser, lex, sema};

fn main() -> ExitCode {
    let args = std::env::args().collect::<Vec<String>>();

    if args.len() != 2 {
        eprintln!("Usage: {} <file>", args[0]);
        return ExitCode::FAILURE;
    }
    let file = &args[1];

    let source = match fs::read_to_string(file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read {}: {}", file, err);
            return ExitCode::FAILURE;
        }
    };

    let tokens = match lex(&source) {
        Ok(tokens) => tokens,
        Err(err) => {
            eprintln!("error: {}", err.message);
            return ExitCode::FAILURE;
        }
    };

    let mut module = match Parser::parse(&tokens) {
        Ok(module) => module,
        Err(err) => {
            eprintln!("error: {}", err.format_with_source(&source));
            return ExitCode::FAILURE;
        }
    };

    let analysis = sema::analyze_with_path(&mut module, PathBuf::from(file));

    for diagnostic in analysis.diagnostics.iter() {
        println!("{}", diagnostic.format_with_source(&source));
    }

    let errors = analysis.diagnostics.error_count();
    if errors > 0 {
        eprintln!("{} error(s)", errors);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
