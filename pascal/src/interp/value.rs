//! Runtime values for the interpreter

use crate::ast::{Number, VarType};
use std::fmt;

/// Runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `INTEGER`
    Integer(i64),
    /// `REAL`
    Real(f64),
    /// Result of a relational comparison
    Boolean(bool),
    /// String literal, only ever passed to builtins
    Str(String),
}

impl Value {
    /// Zero value of a declared type (result of a function that never assigns its name)
    pub fn zero(ty: VarType) -> Self {
        match ty {
            VarType::Integer => Value::Integer(0),
            VarType::Real => Value::Real(0.0),
        }
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::Boolean(_) => "BOOLEAN",
            Value::Str(_) => "STRING",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Real(_))
    }

    /// Numeric value promoted to real
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(x) => Some(*x),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert for storage in a variable of type `ty`.
    ///
    /// INTEGER widens to REAL; nothing narrows. `None` means the value is not
    /// assignable to `ty`.
    pub fn coerce_to(self, ty: VarType) -> Option<Value> {
        match (self, ty) {
            (Value::Integer(n), VarType::Integer) => Some(Value::Integer(n)),
            (Value::Integer(n), VarType::Real) => Some(Value::Real(n as f64)),
            (Value::Real(x), VarType::Real) => Some(Value::Real(x)),
            _ => None,
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Integer(n) => Value::Integer(n),
            Number::Real(x) => Value::Real(x),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Real(x) => write!(f, "{x}"),
            Value::Boolean(true) => write!(f, "TRUE"),
            Value::Boolean(false) => write!(f, "FALSE"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}
