//! Tree-walking interpreter
//!
//! Executes a parsed [`Program`] and returns a snapshot of its global scope.

mod builtins;
mod config;
mod env;
mod error;
mod eval;
mod snapshot;
mod value;

pub use builtins::{Builtin, BuiltinFn, Builtins};
pub use config::{InterpreterConfig, DEFAULT_MAX_CALL_DEPTH};
pub use env::{Binding, Closure, Scope, ScopeRef};
pub use error::{InterpResult, RuntimeError};
pub use eval::Interpreter;
pub use snapshot::{Bucket, RunResult};
pub use value::Value;

use crate::ast::Program;
use std::io::Write;

/// Run `program` with the default configuration, sending builtin output to `out`
pub fn run(program: &Program, out: &mut dyn Write) -> InterpResult<RunResult> {
    Interpreter::new(out).run(program)
}
