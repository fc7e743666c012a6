//! Interpreter configuration

use serde::{Deserialize, Serialize};

/// Default maximum number of nested routine activations
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Interpreter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Calls nested deeper than this fail with a recursion-limit error
    pub max_call_depth: usize,
}

impl InterpreterConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}
