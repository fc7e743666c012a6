//! Expression AST nodes

use super::Spanned;
use serde::{Deserialize, Serialize};

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Integer or real literal
    Number(Number),
    /// Quoted string literal (only meaningful as a `writeln` argument)
    Str(String),

    /// Variable reference
    Var(String),

    /// Unary sign: `-x`, `+x`
    Unary {
        op: UnOp,
        expr: Box<Spanned<Expr>>,
    },

    /// Arithmetic: `+ - * DIV /`
    Binary {
        left: Box<Spanned<Expr>>,
        op: BinOp,
        right: Box<Spanned<Expr>>,
    },

    /// Comparison producing a boolean: `> < =`
    Relational {
        left: Box<Spanned<Expr>>,
        op: RelOp,
        right: Box<Spanned<Expr>>,
    },

    /// Function call used as an operand
    Call(Call),
}

/// Numeric literal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

/// Procedure or function invocation: `name(arg, ...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub name: Spanned<String>,
    pub args: Vec<Spanned<Expr>>,
}

/// Arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    /// `DIV`, truncating integer division
    IntDiv,
    /// `/`, always yields a real
    FloatDiv,
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::IntDiv => write!(f, "DIV"),
            BinOp::FloatDiv => write!(f, "/"),
        }
    }
}

/// Relational operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelOp {
    Gt,
    Lt,
    Eq,
}

impl std::fmt::Display for RelOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelOp::Gt => write!(f, ">"),
            RelOp::Lt => write!(f, "<"),
            RelOp::Eq => write!(f, "="),
        }
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    Plus,
    Minus,
}

impl std::fmt::Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnOp::Plus => write!(f, "+"),
            UnOp::Minus => write!(f, "-"),
        }
    }
}
