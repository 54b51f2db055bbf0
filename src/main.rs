//! Ago Compiler
//!
//! A Latin-inspired language whose identifiers carry their types in
//! trailing suffixes. `agoc` parses, checks, and transpiles to Python.

mod backend;
mod frontend;
mod stdlib;
mod types;
mod utils;

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use backend::PyCodeGen;
use frontend::ast::Program;
use frontend::parser::Parser as AgoParser;
use frontend::semantic::SemanticChecker;

/// Ago Compiler
#[derive(Parser, Debug)]
#[command(name = "agoc")]
#[command(version = "0.2.0")]
#[command(about = "Ago compiler - a Latin-inspired language with suffix-typed identifiers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print diagnostics as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse and semantically check a source file
    Check {
        /// Input source file (.ago)
        input: PathBuf,
    },
    /// Check a source file and emit Python
    Build {
        /// Input source file (.ago)
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the parsed AST (for debugging)
    Ast {
        /// Input source file (.ago)
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Check { input } => check_file(input, cli.json).map(|_| ()),
        Commands::Build { input, output } => build_file(input, output.clone(), cli.json),
        Commands::Ast { input } => dump_ast(input),
    };

    if let Err(err) = result {
        eprintln!("error: {:#}", err);
        process::exit(1);
    }
}

fn parse_file(input: &PathBuf) -> anyhow::Result<Program> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;

    let mut parser = AgoParser::new(&source).map_err(|e| anyhow::anyhow!(render_hard(&e)))?;
    let program = parser
        .parse_program()
        .map_err(|e| anyhow::anyhow!(render_hard(&e)))?;
    info!("parsed {} top-level item(s)", program.items.len());
    Ok(program)
}

/// Render a lex/parse error with its location
fn render_hard(err: &utils::Error) -> String {
    match err.span() {
        Some(span) if span.line > 0 => format!("(line {}, col {}) {}", span.line, span.col, err),
        _ => err.to_string(),
    }
}

/// Check a file; on semantic problems print them all and exit non-zero
fn check_file(input: &PathBuf, json: bool) -> anyhow::Result<(Program, SemanticChecker)> {
    let program = parse_file(input)?;

    let mut checker = SemanticChecker::new();
    checker.check(&program);

    if checker.has_errors() {
        if json {
            let rendered = serde_json::to_string_pretty(checker.diagnostics())
                .context("serializing diagnostics")?;
            println!("{}", rendered);
        } else {
            for diag in checker.diagnostics() {
                eprintln!("error: {}", diag);
            }
            eprintln!("{} error(s) found", checker.diagnostics().len());
        }
        process::exit(1);
    }

    info!("semantic analysis passed");
    Ok((program, checker))
}

/// Build: check, then generate Python. Never generates when diagnostics
/// exist - check_file has already exited by then.
fn build_file(input: &PathBuf, output: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let (program, checker) = check_file(input, json)?;

    let python = PyCodeGen::new(checker.resolutions()).generate(&program);
    match output {
        Some(path) => {
            fs::write(&path, python).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{}", python),
    }
    Ok(())
}

fn dump_ast(input: &PathBuf) -> anyhow::Result<()> {
    let program = parse_file(input)?;
    println!("{:#?}", program);
    Ok(())
}
