//! Runtime errors for the interpreter

use thiserror::Error;

/// Runtime error during interpretation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("undeclared variable: {name}")]
    UndeclaredVariable { name: String },

    #[error("variable {name} is read before it is assigned")]
    UninitializedVariable { name: String },

    #[error("duplicate declaration: {name}")]
    DuplicateDeclaration { name: String },

    #[error("undefined procedure or function: {name}")]
    UndefinedProcedure { name: String },

    #[error("{name} expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("type mismatch in {operation}: {operands}")]
    TypeMismatch { operation: String, operands: String },

    #[error("recursion limit exceeded: call depth {depth}")]
    RecursionLimit { depth: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: String },

    #[error("output error: {message}")]
    Io { message: String },
}

impl RuntimeError {
    pub fn undeclared_variable(name: &str) -> Self {
        Self::UndeclaredVariable {
            name: name.to_string(),
        }
    }

    pub fn uninitialized_variable(name: &str) -> Self {
        Self::UninitializedVariable {
            name: name.to_string(),
        }
    }

    pub fn duplicate_declaration(name: &str) -> Self {
        Self::DuplicateDeclaration {
            name: name.to_string(),
        }
    }

    pub fn undefined_procedure(name: &str) -> Self {
        Self::UndefinedProcedure {
            name: name.to_string(),
        }
    }

    pub fn arity_mismatch(name: &str, expected: usize, actual: usize) -> Self {
        Self::ArityMismatch {
            name: name.to_string(),
            expected,
            actual,
        }
    }

    pub fn type_mismatch(operation: impl Into<String>, operands: impl Into<String>) -> Self {
        Self::TypeMismatch {
            operation: operation.into(),
            operands: operands.into(),
        }
    }

    pub fn recursion_limit(depth: usize) -> Self {
        Self::RecursionLimit { depth }
    }

    pub fn integer_overflow(operation: impl Into<String>) -> Self {
        Self::IntegerOverflow {
            operation: operation.into(),
        }
    }

    pub fn io_error(err: &std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
