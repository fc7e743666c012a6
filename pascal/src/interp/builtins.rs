//! Host-provided procedures

use super::error::{InterpResult, RuntimeError};
use super::Value;
use std::collections::HashMap;
use std::io::Write;

/// Builtin procedure: receives the output sink and the evaluated arguments
pub type BuiltinFn = fn(&mut dyn Write, &[Value]) -> InterpResult<()>;

/// Table entry for a builtin
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub func: BuiltinFn,
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Builtin table, keyed by lowercase name
#[derive(Debug, Clone)]
pub struct Builtins {
    table: HashMap<&'static str, Builtin>,
}

impl Builtins {
    /// The standard table: `writeln`
    pub fn standard() -> Self {
        let mut builtins = Builtins {
            table: HashMap::new(),
        };
        builtins.register(Builtin {
            name: "writeln",
            arity: 1,
            func: builtin_writeln,
        });
        builtins
    }

    fn register(&mut self, builtin: Builtin) {
        self.table.insert(builtin.name, builtin);
    }

    /// Look up a builtin; names match case-insensitively
    pub fn get(&self, name: &str) -> Option<Builtin> {
        self.table.get(name.to_ascii_lowercase().as_str()).copied()
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Self::standard()
    }
}

/// writeln(x): textual form of `x` plus a newline
fn builtin_writeln(out: &mut dyn Write, args: &[Value]) -> InterpResult<()> {
    for arg in args {
        write!(out, "{arg}").map_err(|e| RuntimeError::io_error(&e))?;
    }
    writeln!(out).map_err(|e| RuntimeError::io_error(&e))
}
