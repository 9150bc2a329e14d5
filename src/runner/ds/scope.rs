use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use uuid::Uuid;

use crate::runner::ds::error::RuntimeError;
use crate::runner::ds::function::FunctionEntry;
use crate::runner::ds::value::Value;

pub type ScopeRef = Rc<RefCell<Scope>>;

/// A lexical environment.
///
/// Holds the functions defined in it, the namespaces (modules and `obj`
/// namespaces) attached to it, the value captured by `return`, and a link
/// to the enclosing scope for upward lookup.
pub struct Scope {
    id: Uuid,
    local_functions: HashMap<String, FunctionEntry>,
    child_scopes: HashMap<String, ScopeRef>,
    return_value: Option<Value>,
    parent: Option<ScopeRef>,
}

impl Scope {
    pub fn new(parent: Option<ScopeRef>) -> Self {
        Scope {
            id: Uuid::new_v4(),
            local_functions: HashMap::new(),
            child_scopes: HashMap::new(),
            return_value: None,
            parent,
        }
    }

    pub fn new_ref(parent: Option<ScopeRef>) -> ScopeRef {
        Rc::new(RefCell::new(Scope::new(parent)))
    }

    pub fn id(&self) -> String {
        self.id.to_hyphenated().to_string()
    }

    pub fn parent(&self) -> Option<ScopeRef> {
        self.parent.as_ref().map(Rc::clone)
    }

    pub fn has_local_function(&self, name: &str) -> bool {
        self.local_functions.contains_key(name)
    }

    pub fn get_local_function(&self, name: &str) -> Option<FunctionEntry> {
        self.local_functions.get(name).cloned()
    }

    pub fn set_function(&mut self, name: &str, function: FunctionEntry) {
        self.local_functions.insert(name.to_string(), function);
    }

    pub fn get_child_scope(&self, name: &str) -> Option<ScopeRef> {
        self.child_scopes.get(name).map(Rc::clone)
    }

    pub fn set_child_scope(&mut self, name: &str, scope: ScopeRef) {
        self.child_scopes.insert(name.to_string(), scope);
    }

    pub fn return_value(&self) -> Option<Value> {
        self.return_value.clone()
    }

    pub fn set_return_value(&mut self, value: Option<Value>) {
        self.return_value = value;
    }

    /// Empty the scope's tables and hand back the namespaces it held.
    pub fn clear(&mut self) -> Vec<ScopeRef> {
        self.local_functions.clear();
        self.return_value = None;
        self.child_scopes.drain().map(|(_, scope)| scope).collect()
    }

    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.local_functions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn child_scope_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.child_scopes.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id())
            .field("functions", &self.function_names())
            .field("child_scopes", &self.child_scope_names())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// A function found by chain lookup, together with the scope that holds it.
pub struct ResolvedFunction {
    pub entry: FunctionEntry,
    pub owner: ScopeRef,
}

/// Chain operations that need the shared handle rather than the scope itself.
pub trait ScopeExt {
    fn create_slot(&self, name: &str) -> Slot;
    fn has_function(&self, name: &str) -> bool;
    fn find_function(&self, name: &str) -> Option<ResolvedFunction>;
    fn find_child_scope(&self, name: &str) -> Option<ScopeRef>;
    fn resolve_call(&self, name: &str) -> Result<ResolvedFunction, RuntimeError>;
    fn descends_from(&self, ancestor: &ScopeRef) -> bool;
    fn chain_root(&self) -> ScopeRef;
}

impl ScopeExt for ScopeRef {
    fn create_slot(&self, name: &str) -> Slot {
        Slot {
            scope: Rc::downgrade(self),
            name: name.to_string(),
        }
    }

    fn has_function(&self, name: &str) -> bool {
        self.find_function(name).is_some()
    }

    fn find_function(&self, name: &str) -> Option<ResolvedFunction> {
        let mut current = Some(Rc::clone(self));
        while let Some(scope) = current {
            let borrowed = scope.borrow();
            if let Some(entry) = borrowed.get_local_function(name) {
                return Some(ResolvedFunction {
                    entry,
                    owner: Rc::clone(&scope),
                });
            }
            current = borrowed.parent();
        }
        None
    }

    fn find_child_scope(&self, name: &str) -> Option<ScopeRef> {
        let mut current = Some(Rc::clone(self));
        while let Some(scope) = current {
            let borrowed = scope.borrow();
            if let Some(child) = borrowed.get_child_scope(name) {
                return Some(child);
            }
            current = borrowed.parent();
        }
        None
    }

    fn descends_from(&self, ancestor: &ScopeRef) -> bool {
        let mut current = self.borrow().parent();
        while let Some(scope) = current {
            if Rc::ptr_eq(&scope, ancestor) {
                return true;
            }
            current = scope.borrow().parent();
        }
        false
    }

    /// The outermost scope of the chain: the runtime root, or a file module.
    fn chain_root(&self) -> ScopeRef {
        let mut current = Rc::clone(self);
        loop {
            let parent = current.borrow().parent();
            match parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// Resolves a call name. Plain names ascend the function chain; dotted
    /// names walk namespaces and only accept the member's own definitions.
    fn resolve_call(&self, name: &str) -> Result<ResolvedFunction, RuntimeError> {
        let not_found = || RuntimeError::ReferenceError(format!("Unknown value or function \"{}\"", name));
        let mut segments: Vec<&str> = name.split('.').collect();
        let member = segments.pop().ok_or_else(not_found)?;
        if segments.is_empty() {
            return self.find_function(member).ok_or_else(not_found);
        }

        let mut namespaces = segments.into_iter();
        let first = namespaces.next().ok_or_else(not_found)?;
        let mut namespace = self.find_child_scope(first).ok_or_else(|| {
            RuntimeError::ReferenceError(format!("Unknown namespace \"{}\"", first))
        })?;
        for segment in namespaces {
            let next = namespace.borrow().get_child_scope(segment);
            namespace = next.ok_or_else(|| {
                RuntimeError::ReferenceError(format!("Unknown namespace \"{}\"", segment))
            })?;
        }
        let entry = namespace.borrow().get_local_function(member);
        match entry {
            Some(entry) => Ok(ResolvedFunction {
                entry,
                owner: namespace,
            }),
            None => Err(not_found()),
        }
    }
}

/// A (scope, name) binding handle produced by evaluating a Memory literal.
///
/// Creating a slot never touches the scope; only `set` writes to it. The
/// slot does not keep its scope alive.
#[derive(Clone, Debug)]
pub struct Slot {
    scope: Weak<RefCell<Scope>>,
    name: String,
}

impl Slot {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> Option<ScopeRef> {
        self.scope.upgrade()
    }

    /// Whether the owning scope itself (not its parents) binds this name.
    pub fn is_bound(&self) -> bool {
        self.scope()
            .map(|s| s.borrow().has_local_function(&self.name))
            .unwrap_or(false)
    }

    pub fn get(&self) -> Option<FunctionEntry> {
        self.scope()
            .and_then(|s| s.borrow().get_local_function(&self.name))
    }

    pub fn set(&self, function: FunctionEntry) -> Result<(), RuntimeError> {
        match self.scope() {
            Some(scope) => {
                scope.borrow_mut().set_function(&self.name, function);
                Ok(())
            }
            None => Err(RuntimeError::MemoryError(format!(
                "The scope holding <{}> no longer exists",
                self.name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{Literal, Node};
    use crate::runner::ds::function::{Closure, CustomFunction};

    fn constant(n: f64) -> FunctionEntry {
        FunctionEntry::Custom(CustomFunction {
            closure: Closure::Owner,
            body: Some(Rc::new(Node::Literal(Literal::Number(n)))),
        })
    }

    #[test]
    fn test_lookup_ascends_and_nearest_wins() {
        let root = Scope::new_ref(None);
        let child = Scope::new_ref(Some(Rc::clone(&root)));
        root.borrow_mut().set_function("x", constant(1.0));
        assert!(child.has_function("x"));
        let found = child.find_function("x").map(|r| Rc::ptr_eq(&r.owner, &root));
        assert_eq!(found, Some(true));

        child.borrow_mut().set_function("x", constant(2.0));
        let found = child.find_function("x").map(|r| Rc::ptr_eq(&r.owner, &child));
        assert_eq!(found, Some(true));
    }

    #[test]
    fn test_slot_creation_is_lazy() {
        let root = Scope::new_ref(None);
        let slot = root.create_slot("y");
        assert!(!slot.is_bound());
        assert!(root.borrow().function_names().is_empty());
        slot.set(constant(3.0)).unwrap();
        assert!(slot.is_bound());
        assert!(slot.get().is_some());
    }

    #[test]
    fn test_slot_does_not_keep_scope_alive() {
        let slot = Scope::new_ref(None).create_slot("z");
        assert!(slot.scope().is_none());
        assert!(slot.set(constant(1.0)).is_err());
    }

    #[test]
    fn test_member_call_does_not_ascend_inside_namespace() {
        let root = Scope::new_ref(None);
        let module = Scope::new_ref(None);
        module.borrow_mut().set_function("double", constant(2.0));
        root.borrow_mut().set_function("shared", constant(0.0));
        root.borrow_mut().set_child_scope("math", Rc::clone(&module));
        let inner = Scope::new_ref(Some(Rc::clone(&root)));

        assert!(inner.resolve_call("math.double").is_ok());
        assert!(inner.resolve_call("math.shared").is_err());
        assert!(inner.resolve_call("nope.double").is_err());
    }

    #[test]
    fn test_chain_root() {
        let root = Scope::new_ref(None);
        let child = Scope::new_ref(Some(Rc::clone(&root)));
        let grandchild = Scope::new_ref(Some(Rc::clone(&child)));
        assert!(Rc::ptr_eq(&grandchild.chain_root(), &root));
        assert!(Rc::ptr_eq(&root.chain_root(), &root));
    }
}
