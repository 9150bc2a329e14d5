//! Builder for module scopes.

use std::collections::HashMap;
use std::rc::Rc;

use crate::parser::ast::{Literal, Node};
use crate::runner::ds::execution_context::CallContext;
use crate::runner::ds::function::{Args, FunctionEntry, NativeFn};
use crate::runner::ds::scope::{Scope, ScopeRef};
use crate::runner::eval::types::ValueResult;
use crate::runner::runtime::Runtime;

/// Module definition.
/// Represents a pre-built scope such as a `math` or `string` library.
pub struct ModuleBuilder {
    /// Name of the module, as used by `need`.
    pub name: String,

    /// Functions defined directly in the module scope.
    pub functions: HashMap<String, FunctionEntry>,

    /// Nested namespaces.
    pub children: HashMap<String, ScopeRef>,
}

impl ModuleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        ModuleBuilder {
            name: name.into(),
            functions: HashMap::new(),
            children: HashMap::new(),
        }
    }

    /// Add a compiled-in native.
    pub fn add_native(mut self, name: impl Into<String>, func: NativeFn) -> Self {
        self.functions.insert(name.into(), FunctionEntry::builtin(func));
        self
    }

    /// Add a host closure.
    pub fn add_plugin<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut Runtime, &CallContext, Args, Option<&Rc<Node>>) -> ValueResult + 'static,
    {
        self.functions.insert(name.into(), FunctionEntry::plugin(func));
        self
    }

    /// Add a constant, readable as a zero-argument call.
    pub fn add_constant(mut self, name: impl Into<String>, value: Literal) -> Self {
        self.functions
            .insert(name.into(), FunctionEntry::constant(Node::Literal(value)));
        self
    }

    pub fn add_child(mut self, name: impl Into<String>, scope: ScopeRef) -> Self {
        self.children.insert(name.into(), scope);
        self
    }

    /// Build the module scope. Modules have no parent: their custom
    /// functions only see what the module itself defines.
    pub fn build(self) -> ScopeRef {
        let scope = Scope::new_ref(None);
        {
            let mut module = scope.borrow_mut();
            for (name, entry) in self.functions {
                module.set_function(&name, entry);
            }
            for (name, child) in self.children {
                module.set_child_scope(&name, child);
            }
        }
        scope
    }

    /// Build the scope and register it under the builder's name.
    pub fn register(self, rt: &mut Runtime) -> ScopeRef {
        let name = self.name.clone();
        let scope = self.build();
        rt.register_module(name, Rc::clone(&scope));
        scope
    }
}
