//! Abstract Syntax Tree definitions

mod expr;
mod span;
mod types;

pub use expr::*;
pub use span::*;
pub use types::*;

use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// `PROGRAM name; block.`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: Spanned<String>,
    pub block: Block,
}

/// Declarations followed by the compound statement they scope over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub declarations: Vec<Decl>,
    pub compound: Compound,
}

/// Entry in a block's declaration part, in source order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Var(VarDecl),
    /// Shared by every activation of the routine, including recursive ones
    Routine(Rc<RoutineDecl>),
}

impl Decl {
    pub fn name(&self) -> &Spanned<String> {
        match self {
            Decl::Var(var) => &var.name,
            Decl::Routine(routine) => &routine.name,
        }
    }
}

/// `name: TYPE` inside a `VAR` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: Spanned<String>,
    pub ty: VarType,
}

/// Procedure or function declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineDecl {
    pub name: Spanned<String>,
    pub params: Vec<Param>,
    /// Declared result type; `None` for a procedure
    pub ret_ty: Option<VarType>,
    pub block: Block,
    pub span: Span,
}

impl RoutineDecl {
    pub fn is_function(&self) -> bool {
        self.ret_ty.is_some()
    }

    pub fn kind(&self) -> &'static str {
        if self.is_function() { "function" } else { "procedure" }
    }
}

/// Formal parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: Spanned<String>,
    pub ty: VarType,
}

/// `BEGIN stmt; ... END`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compound {
    pub statements: Vec<Spanned<Stmt>>,
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// Nested `BEGIN ... END`
    Compound(Compound),

    /// `target := value`
    Assign {
        target: Spanned<String>,
        value: Spanned<Expr>,
    },

    /// Procedure call
    Call(Call),

    /// `IF cond THEN stmt [ELSE stmt]`
    If {
        cond: Spanned<Expr>,
        then_branch: Box<Spanned<Stmt>>,
        else_branch: Option<Box<Spanned<Stmt>>>,
    },

    /// `REPEAT stmts UNTIL cond`
    Repeat { body: Compound, cond: Spanned<Expr> },

    /// Empty statement
    NoOp,
}
