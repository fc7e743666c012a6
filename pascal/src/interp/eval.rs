//! Tree-walking evaluator

use super::builtins::Builtins;
use super::config::InterpreterConfig;
use super::env::{child_scope, Closure, Scope, ScopeRef};
use super::error::{InterpResult, RuntimeError};
use super::snapshot::RunResult;
use super::value::Value;
use crate::{STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::ast::{
    BinOp, Block, Call, Compound, Decl, Expr, Program, RelOp, Span, Spanned, Stmt, UnOp,
};
use std::io::Write;
use std::collections::HashSet;
use std::rc::Rc;

/// The interpreter.
///
/// Owns everything one run needs; two interpreters never share state.
pub struct Interpreter<'out> {
    config: InterpreterConfig,
    builtins: Builtins,
    /// Active frames; index 0 is the global scope while a run is in progress
    call_stack: Vec<ScopeRef>,
    /// Sink for builtin output
    out: &'out mut dyn Write,
}

impl<'out> Interpreter<'out> {
    /// Create an interpreter with the default configuration
    pub fn new(out: &'out mut dyn Write) -> Self {
        Self::with_config(InterpreterConfig::default(), out)
    }

    pub fn with_config(config: InterpreterConfig, out: &'out mut dyn Write) -> Self {
        Interpreter {
            config,
            builtins: Builtins::standard(),
            call_stack: Vec::new(),
            out,
        }
    }

    /// Run a program to completion and snapshot its global scope
    pub fn run(&mut self, program: &Program) -> InterpResult<RunResult> {
        tracing::debug!(program = %program.name.node, "run start");
        check_declarations(&program.block, &[])?;
        let global = Scope::global().into_ref();
        self.call_stack.clear();
        self.call_stack.push(Rc::clone(&global));

        let outcome = self.exec_block(&program.block, &global);
        self.call_stack.clear();
        outcome?;

        let result = RunResult::from_scope(&global.borrow());
        tracing::debug!(program = %program.name.node, "run finished");
        Ok(result)
    }

    /// Number of routine activations currently on the call stack
    fn call_depth(&self) -> usize {
        self.call_stack.len().saturating_sub(1)
    }

    // ============ Declarations ============

    /// Bind a block's declarations into `scope`, then run its compound statement
    fn exec_block(&mut self, block: &Block, scope: &ScopeRef) -> InterpResult<()> {
        for decl in &block.declarations {
            match decl {
                Decl::Var(var) => scope.borrow_mut().declare_var(&var.name.node, var.ty)?,
                Decl::Routine(routine) => {
                    tracing::trace!(
                        routine = %routine.name.node,
                        scope = scope.borrow().name(),
                        "declare {}", routine.kind()
                    );
                    scope
                        .borrow_mut()
                        .declare_routine(Rc::clone(routine), Rc::downgrade(scope))?
                }
            }
        }
        self.exec_compound(&block.compound, scope)
    }

    // ============ Statements ============

    fn exec_compound(&mut self, compound: &Compound, scope: &ScopeRef) -> InterpResult<()> {
        for stmt in &compound.statements {
            self.exec(stmt, scope)?;
        }
        Ok(())
    }

    /// Execute a statement with automatic stack growth for deep recursion
    fn exec(&mut self, stmt: &Spanned<Stmt>, scope: &ScopeRef) -> InterpResult<()> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.exec_inner(stmt, scope))
    }

    fn exec_inner(&mut self, stmt: &Spanned<Stmt>, scope: &ScopeRef) -> InterpResult<()> {
        match &stmt.node {
            Stmt::Compound(compound) => self.exec_compound(compound, scope),

            Stmt::Assign { target, value } => {
                let value = self.eval(value, scope)?;
                scope.borrow_mut().assign(&target.node, value)
            }

            // A function called as a statement discards its result
            Stmt::Call(call) => self.call(call, scope).map(drop),

            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_condition(cond, scope)? {
                    self.exec(then_branch, scope)
                } else if let Some(else_branch) = else_branch {
                    self.exec(else_branch, scope)
                } else {
                    Ok(())
                }
            }

            Stmt::Repeat { body, cond } => loop {
                self.exec_compound(body, scope)?;
                if self.eval_condition(cond, scope)? {
                    return Ok(());
                }
            },

            Stmt::NoOp => Ok(()),
        }
    }

    fn eval_condition(&mut self, cond: &Spanned<Expr>, scope: &ScopeRef) -> InterpResult<bool> {
        let value = self.eval(cond, scope)?;
        value
            .as_bool()
            .ok_or_else(|| RuntimeError::type_mismatch("condition", value.type_name()))
    }

    // ============ Expressions ============

    /// Evaluate an expression with automatic stack growth for deep recursion
    fn eval(&mut self, expr: &Spanned<Expr>, scope: &ScopeRef) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(expr, scope))
    }

    fn eval_inner(&mut self, expr: &Spanned<Expr>, scope: &ScopeRef) -> InterpResult<Value> {
        match &expr.node {
            Expr::Number(number) => Ok(Value::from(*number)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Var(name) => self.eval_var(name, &expr.span, scope),

            Expr::Unary { op, expr } => {
                let val = self.eval(expr, scope)?;
                eval_unary(*op, val)
            }

            Expr::Binary { left, op, right } => {
                let left = self.eval(left, scope)?;
                let right = self.eval(right, scope)?;
                eval_binary(*op, left, right)
            }

            Expr::Relational { left, op, right } => {
                let left = self.eval(left, scope)?;
                let right = self.eval(right, scope)?;
                eval_relational(*op, &left, &right)
            }

            Expr::Call(call) => self.call(call, scope)?.ok_or_else(|| {
                RuntimeError::type_mismatch(
                    format!("call to {}", call.name.node),
                    "procedure has no result",
                )
            }),
        }
    }

    /// Read a variable; a bare name with no variable binding calls a
    /// parameterless function of that name instead
    fn eval_var(&mut self, name: &str, span: &Span, scope: &ScopeRef) -> InterpResult<Value> {
        let lookup = scope.borrow().get(name);
        match lookup {
            Err(RuntimeError::UndeclaredVariable { .. })
                if scope.borrow().resolve_routine(name).is_some() =>
            {
                let call = Call {
                    name: Spanned::new(name.to_string(), *span),
                    args: Vec::new(),
                };
                self.eval_inner(&Spanned::new(Expr::Call(call), *span), scope)
            }
            other => other,
        }
    }

    // ============ Calls ============

    /// Call a routine or builtin by name; `None` for procedures
    fn call(&mut self, call: &Call, scope: &ScopeRef) -> InterpResult<Option<Value>> {
        let name = &call.name.node;

        // User routines shadow builtins
        let closure = scope.borrow().resolve_routine(name);
        if let Some(closure) = closure {
            return self.call_routine(&closure, &call.args, scope);
        }

        if let Some(builtin) = self.builtins.get(name) {
            if builtin.arity != call.args.len() {
                return Err(RuntimeError::arity_mismatch(
                    name,
                    builtin.arity,
                    call.args.len(),
                ));
            }
            let args = self.eval_args(&call.args, scope)?;
            (builtin.func)(&mut *self.out, &args)?;
            return Ok(None);
        }

        Err(RuntimeError::undefined_procedure(name))
    }

    fn eval_args(&mut self, args: &[Spanned<Expr>], scope: &ScopeRef) -> InterpResult<Vec<Value>> {
        args.iter().map(|arg| self.eval(arg, scope)).collect()
    }

    /// Run one activation of a user routine.
    ///
    /// Arguments are evaluated in the caller's `scope`; the body runs in a fresh
    /// scope enclosed by the routine's declaring scope.
    fn call_routine(
        &mut self,
        closure: &Closure,
        args: &[Spanned<Expr>],
        scope: &ScopeRef,
    ) -> InterpResult<Option<Value>> {
        let decl = &closure.decl;
        let name = &decl.name.node;

        if decl.params.len() != args.len() {
            return Err(RuntimeError::arity_mismatch(
                name,
                decl.params.len(),
                args.len(),
            ));
        }

        let args = self.eval_args(args, scope)?;

        if self.call_depth() >= self.config.max_call_depth {
            return Err(RuntimeError::recursion_limit(self.config.max_call_depth));
        }

        let enclosing = closure
            .declared_in
            .upgrade()
            .ok_or_else(|| RuntimeError::undefined_procedure(name))?;
        let frame = child_scope(name, &enclosing);
        {
            let mut frame = frame.borrow_mut();
            for (param, arg) in decl.params.iter().zip(args) {
                frame.declare_var(&param.name.node, param.ty)?;
                frame.assign(&param.name.node, arg)?;
            }
            if let Some(ret_ty) = decl.ret_ty {
                frame.declare_var(name, ret_ty)?;
            }
        }

        self.call_stack.push(Rc::clone(&frame));
        tracing::debug!(routine = %name, depth = self.call_depth(), "enter {}", decl.kind());
        let outcome = self.exec_block(&decl.block, &frame);
        self.call_stack.pop();
        outcome?;

        let result = decl.ret_ty.map(|ret_ty| {
            frame
                .borrow()
                .local_value(name)
                .cloned()
                .unwrap_or_else(|| Value::zero(ret_ty))
        });
        tracing::trace!(routine = %name, result = ?result, "leave {}", decl.kind());
        Ok(result)
    }
}

// ============ Declaration checks ============

/// Reject a name declared twice in one namespace, anywhere in the program.
///
/// `reserved` holds names the enclosing call frame binds before the block's
/// own declarations: parameters and the function result. Runs once before
/// execution so routines that are never called are checked too.
fn check_declarations(block: &Block, reserved: &[&str]) -> InterpResult<()> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
        let mut seen = HashSet::new();
        let names = reserved
            .iter()
            .copied()
            .chain(block.declarations.iter().map(|decl| decl.name().node.as_str()));
        for name in names {
            if !seen.insert(name) {
                return Err(RuntimeError::duplicate_declaration(name));
            }
        }

        for decl in &block.declarations {
            if let Decl::Routine(routine) = decl {
                let mut frame: Vec<&str> =
                    routine.params.iter().map(|p| p.name.node.as_str()).collect();
                if routine.is_function() {
                    frame.push(&routine.name.node);
                }
                check_declarations(&routine.block, &frame)?;
            }
        }
        Ok(())
    })
}

// ============ Operators ============

/// Evaluate unary operation
fn eval_unary(op: UnOp, val: Value) -> InterpResult<Value> {
    match (op, val) {
        (UnOp::Plus, val) if val.is_numeric() => Ok(val),
        (UnOp::Minus, Value::Integer(n)) => n
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| RuntimeError::integer_overflow("unary -")),
        (UnOp::Minus, Value::Real(x)) => Ok(Value::Real(-x)),
        (op, val) => Err(RuntimeError::type_mismatch(
            format!("unary {op}"),
            val.type_name(),
        )),
    }
}

/// Evaluate arithmetic: INTEGER op INTEGER stays INTEGER, any REAL operand
/// makes the result REAL, `/` is always REAL and `DIV` accepts only INTEGERs
fn eval_binary(op: BinOp, left: Value, right: Value) -> InterpResult<Value> {
    let mismatch = |left: &Value, right: &Value| {
        RuntimeError::type_mismatch(
            op.to_string(),
            format!("{} {op} {}", left.type_name(), right.type_name()),
        )
    };

    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul => match (&left, &right) {
            (Value::Integer(a), Value::Integer(b)) => {
                let result = match op {
                    BinOp::Add => a.checked_add(*b),
                    BinOp::Sub => a.checked_sub(*b),
                    _ => a.checked_mul(*b),
                };
                result
                    .map(Value::Integer)
                    .ok_or_else(|| RuntimeError::integer_overflow(op.to_string()))
            }
            _ => match (left.as_real(), right.as_real()) {
                (Some(a), Some(b)) => Ok(Value::Real(match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    _ => a * b,
                })),
                _ => Err(mismatch(&left, &right)),
            },
        },

        BinOp::IntDiv => match (&left, &right) {
            (Value::Integer(_), Value::Integer(0)) => Err(RuntimeError::DivisionByZero),
            // i64 `/` truncates toward zero
            (Value::Integer(a), Value::Integer(b)) => a
                .checked_div(*b)
                .map(Value::Integer)
                .ok_or_else(|| RuntimeError::integer_overflow(op.to_string())),
            _ => Err(mismatch(&left, &right)),
        },

        BinOp::FloatDiv => match (left.as_real(), right.as_real()) {
            (Some(a), Some(b)) => Ok(Value::Real(a / b)),
            _ => Err(mismatch(&left, &right)),
        },
    }
}

/// Compare two numeric values; INTEGER pairs compare exactly, mixed pairs as REAL
fn eval_relational(op: RelOp, left: &Value, right: &Value) -> InterpResult<Value> {
    let ordering = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
        _ => match (left.as_real(), right.as_real()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => {
                return Err(RuntimeError::type_mismatch(
                    op.to_string(),
                    format!("{} {op} {}", left.type_name(), right.type_name()),
                ));
            }
        },
    };

    // NaN compares false under every operator
    let result = ordering.is_some_and(|ordering| match op {
        RelOp::Gt => ordering.is_gt(),
        RelOp::Lt => ordering.is_lt(),
        RelOp::Eq => ordering.is_eq(),
    });
    Ok(Value::Boolean(result))
}
