use std::rc::Rc;

use crate::parser::ast::Node;
use crate::runner::ds::scope::ScopeRef;
use crate::runner::ds::value::Value;

/// Ephemeral state for one call or block.
#[derive(Clone)]
pub struct CallContext {
    pub scope: ScopeRef,
    /// Evaluated arguments of the innermost custom call, read by `param`.
    pub parameters: Rc<Vec<Option<Value>>>,
    /// The yield subtree handed to the innermost custom call, run by `yield`.
    pub yield_function: Option<Rc<Node>>,
    /// When set, blocks evaluate to their own scope instead of their return value.
    pub return_scope: bool,
}

impl CallContext {
    pub fn new(scope: ScopeRef) -> Self {
        CallContext {
            scope,
            parameters: Rc::new(Vec::new()),
            yield_function: None,
            return_scope: false,
        }
    }

    pub fn with_scope(&self, scope: ScopeRef) -> Self {
        CallContext {
            scope,
            ..self.clone()
        }
    }

    pub fn returning_scope(&self) -> Self {
        CallContext {
            return_scope: true,
            ..self.clone()
        }
    }

    pub fn parameter(&self, index: usize) -> Option<Value> {
        self.parameters.get(index).cloned().flatten()
    }
}
