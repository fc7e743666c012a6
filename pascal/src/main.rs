//! Pascal interpreter CLI

use clap::{Parser, Subcommand};
use pascal::{report_error, Error, Interpreter, InterpreterConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pascal", version, about = "Interpreter for a small Pascal subset")]
struct Cli {
    /// Log interpreter activity to stderr (RUST_LOG overrides the level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program and print its final global variables
    Run {
        /// Source file to run
        file: PathBuf,
        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
        /// Maximum nesting depth of procedure and function calls
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,
    },
    /// Parse and dump AST as JSON
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

/// Failure of a subcommand
enum Failure {
    /// Diagnostic tied to the source text
    Source { source: String, error: Error },
    Other(Box<dyn std::error::Error>),
}

impl<E: std::error::Error + 'static> From<E> for Failure {
    fn from(err: E) -> Self {
        Failure::Other(Box::new(err))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let (path, result) = match cli.command {
        Command::Run {
            file,
            json,
            max_depth,
        } => {
            let mut config = InterpreterConfig::default();
            if let Some(depth) = max_depth {
                config = config.with_max_call_depth(depth);
            }
            let result = run_file(&file, config, json);
            (file, result)
        }
        Command::Parse { file } => {
            let result = parse_file(&file);
            (file, result)
        }
        Command::Tokens { file } => {
            let result = tokenize_file(&file);
            (file, result)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(Failure::Source { source, error }) => {
            let filename = path.display().to_string();
            if let Err(io) = report_error(&filename, &source, &error) {
                eprintln!("Error: {error} ({io})");
            }
            ExitCode::FAILURE
        }
        Err(Failure::Other(e)) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn read_source(path: &Path) -> Result<String, Failure> {
    Ok(std::fs::read_to_string(path)?)
}

fn run_file(path: &Path, config: InterpreterConfig, json: bool) -> Result<(), Failure> {
    let source = read_source(path)?;
    tracing::info!(file = %path.display(), max_call_depth = config.max_call_depth, "running");

    let program = match pascal::parser::parse(&source) {
        Ok(program) => program,
        Err(e) => {
            return Err(Failure::Source {
                source,
                error: e.into(),
            });
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = match Interpreter::with_config(config, &mut out).run(&program) {
        Ok(result) => result,
        Err(e) => {
            return Err(Failure::Source {
                source,
                error: e.into(),
            });
        }
    };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        write!(out, "{result}")?;
    }
    Ok(())
}

fn parse_file(path: &Path) -> Result<(), Failure> {
    let source = read_source(path)?;
    match pascal::parser::parse(&source) {
        Ok(ast) => {
            println!("{}", serde_json::to_string_pretty(&ast)?);
            Ok(())
        }
        Err(e) => Err(Failure::Source {
            source,
            error: e.into(),
        }),
    }
}

fn tokenize_file(path: &Path) -> Result<(), Failure> {
    let source = read_source(path)?;
    match pascal::lexer::tokenize(&source) {
        Ok(tokens) => {
            for (tok, span) in &tokens {
                println!("{:?} @ {}..{}", tok, span.start, span.end);
            }
            Ok(())
        }
        Err(e) => Err(Failure::Source {
            source,
            error: e.into(),
        }),
    }
}
