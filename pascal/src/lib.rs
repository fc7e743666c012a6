//! Interpreter for a small Pascal subset
//!
//! Source text goes through [`lexer`], [`parser`] and [`interp`]; the result of
//! a run is the final state of the program's global variables.

pub mod ast;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;

pub use ast::Span;
pub use error::{report_error, Error, ParseError, Result};
pub use interp::{Interpreter, InterpreterConfig, RunResult, RuntimeError, Value};

use std::io::Write;

/// Stack growth parameters for the recursive parser and evaluator
pub(crate) const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
pub(crate) const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// Parse and run `source` with the default configuration.
///
/// Output of `writeln` goes to `out`.
pub fn interpret(source: &str, out: &mut dyn Write) -> std::result::Result<RunResult, Error> {
    interpret_with_config(source, InterpreterConfig::default(), out)
}

/// Parse and run `source` under `config`
pub fn interpret_with_config(
    source: &str,
    config: InterpreterConfig,
    out: &mut dyn Write,
) -> std::result::Result<RunResult, Error> {
    let program = parser::parse(source)?;
    let result = Interpreter::with_config(config, out).run(&program)?;
    Ok(result)
}
