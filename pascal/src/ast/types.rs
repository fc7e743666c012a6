//! Declared variable types

use serde::{Deserialize, Serialize};

/// Type named in a `VAR` section, parameter list or function signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarType {
    /// `INTEGER`, a 64-bit signed integer
    Integer,
    /// `REAL`, a 64-bit float
    Real,
}

impl std::fmt::Display for VarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarType::Integer => write!(f, "INTEGER"),
            VarType::Real => write!(f, "REAL"),
        }
    }
}
