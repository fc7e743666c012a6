//! Scopes (activation records) for variable and routine bindings

use super::error::{InterpResult, RuntimeError};
use super::Value;
use crate::ast::{RoutineDecl, VarType};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Shared reference to a scope
pub type ScopeRef = Rc<RefCell<Scope>>;

/// A declared variable and its current value
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub ty: VarType,
    /// `None` until the first assignment
    pub value: Option<Value>,
}

/// A routine together with the scope it was declared in.
///
/// The declaring scope is held weakly: it always outlives every activation
/// of the routine, and a strong link would form a cycle through the scope's
/// own routine table.
#[derive(Debug, Clone)]
pub struct Closure {
    pub decl: Rc<RoutineDecl>,
    pub declared_in: Weak<RefCell<Scope>>,
}

/// One activation record
#[derive(Debug)]
pub struct Scope {
    /// `"global"` or the name of the routine this frame belongs to
    name: String,
    /// Variables in declaration order
    bindings: Vec<Binding>,
    index: HashMap<String, usize>,
    routines: HashMap<String, Closure>,
    /// Lexically enclosing scope
    parent: Option<ScopeRef>,
}

impl Scope {
    /// Create the global scope
    pub fn global() -> Self {
        Scope {
            name: "global".to_string(),
            bindings: Vec::new(),
            index: HashMap::new(),
            routines: HashMap::new(),
            parent: None,
        }
    }

    /// Create a call scope enclosed by `parent`
    pub fn with_parent(name: impl Into<String>, parent: ScopeRef) -> Self {
        Scope {
            name: name.into(),
            parent: Some(parent),
            ..Scope::global()
        }
    }

    /// Wrap in Rc<RefCell<>>
    pub fn into_ref(self) -> ScopeRef {
        Rc::new(RefCell::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn is_declared_here(&self, name: &str) -> bool {
        self.index.contains_key(name) || self.routines.contains_key(name)
    }

    /// Declare an unassigned variable in this scope
    pub fn declare_var(&mut self, name: &str, ty: VarType) -> InterpResult<()> {
        if self.is_declared_here(name) {
            return Err(RuntimeError::duplicate_declaration(name));
        }
        self.index.insert(name.to_string(), self.bindings.len());
        self.bindings.push(Binding {
            name: name.to_string(),
            ty,
            value: None,
        });
        Ok(())
    }

    /// Declare a routine whose body will run enclosed by `declared_in`
    pub fn declare_routine(
        &mut self,
        decl: Rc<RoutineDecl>,
        declared_in: Weak<RefCell<Scope>>,
    ) -> InterpResult<()> {
        let name = decl.name.node.clone();
        if self.is_declared_here(&name) {
            return Err(RuntimeError::duplicate_declaration(&name));
        }
        self.routines.insert(name, Closure { decl, declared_in });
        Ok(())
    }

    /// Read a variable, searching outward through enclosing scopes
    pub fn get(&self, name: &str) -> InterpResult<Value> {
        if let Some(&slot) = self.index.get(name) {
            self.bindings[slot]
                .value
                .clone()
                .ok_or_else(|| RuntimeError::uninitialized_variable(name))
        } else if let Some(parent) = &self.parent {
            parent.borrow().get(name)
        } else {
            Err(RuntimeError::undeclared_variable(name))
        }
    }

    /// Assign to the nearest binding of `name`, applying the declared type's coercion
    pub fn assign(&mut self, name: &str, value: Value) -> InterpResult<()> {
        if let Some(&slot) = self.index.get(name) {
            let binding = &mut self.bindings[slot];
            let got = value.type_name();
            let coerced = value.coerce_to(binding.ty).ok_or_else(|| {
                RuntimeError::type_mismatch(
                    format!("assignment to {name}"),
                    format!("cannot store {got} in {}", binding.ty),
                )
            })?;
            binding.value = Some(coerced);
            Ok(())
        } else if let Some(parent) = &self.parent {
            parent.borrow_mut().assign(name, value)
        } else {
            Err(RuntimeError::undeclared_variable(name))
        }
    }

    /// Value bound to `name` in this scope only
    pub fn local_value(&self, name: &str) -> Option<&Value> {
        self.index
            .get(name)
            .and_then(|&slot| self.bindings[slot].value.as_ref())
    }

    /// Find a routine visible from this scope
    pub fn resolve_routine(&self, name: &str) -> Option<Closure> {
        if let Some(closure) = self.routines.get(name) {
            Some(closure.clone())
        } else if let Some(parent) = &self.parent {
            parent.borrow().resolve_routine(name)
        } else {
            None
        }
    }

    /// Variables declared directly in this scope, in declaration order
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

/// Create a call scope from the routine's declaring scope
pub fn child_scope(name: &str, parent: &ScopeRef) -> ScopeRef {
    Scope::with_parent(name, Rc::clone(parent)).into_ref()
}
