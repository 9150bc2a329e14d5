//! Definition builtins: `def`, `defI`, `set` and `obj`.

use std::rc::Rc;

use crate::parser::ast::Node;
use crate::runner::ds::error::RuntimeError;
use crate::runner::ds::execution_context::CallContext;
use crate::runner::ds::function::{Args, Closure, CustomFunction, FunctionEntry, NativeFn};
use crate::runner::ds::scope::ScopeRef;
use crate::runner::ds::value::{MemoryRef, Value};
use crate::runner::eval::execute;
use crate::runner::eval::types::ValueResult;
use crate::runner::runtime::Runtime;

use super::args::{expect_memory, expect_name, reduce_to_literal, type_name_of};

pub const BUILTINS: &[(&str, NativeFn)] = &[
    ("def", def),
    ("defI", def_immediate),
    ("set", set),
    ("obj", obj),
];

fn ensure_undefined(memory: &MemoryRef) -> Result<(), RuntimeError> {
    if memory.slot.is_bound() {
        return Err(RuntimeError::MemoryError(format!(
            "Value <{}> is already defined",
            memory.name
        )));
    }
    Ok(())
}

/// The closure for an entry stored through `memory` while running in `scope`.
fn closure_for(memory: &MemoryRef, scope: &ScopeRef) -> Closure {
    match memory.slot.scope() {
        Some(owner) if Rc::ptr_eq(&owner, scope) => Closure::Owner,
        _ => Closure::Captured(Rc::clone(scope)),
    }
}

/// `def(<name>): body` stores the unevaluated body as a custom function.
fn def(_rt: &mut Runtime, ctx: &CallContext, args: Args, yield_function: Option<&Rc<Node>>) -> ValueResult {
    let memory = expect_memory(&args, 0)?;
    ensure_undefined(memory)?;

    tracing::debug!(name = %memory.name, "def");
    memory.slot.set(FunctionEntry::Custom(CustomFunction {
        closure: closure_for(memory, &ctx.scope),
        body: yield_function.map(Rc::clone),
    }))?;
    Ok(None)
}

/// `defI(<name>): expr` evaluates `expr` now and stores the resulting literal.
fn def_immediate(
    rt: &mut Runtime,
    ctx: &CallContext,
    args: Args,
    yield_function: Option<&Rc<Node>>,
) -> ValueResult {
    let memory = expect_memory(&args, 0)?;
    ensure_undefined(memory)?;

    let literal = reduce_to_literal(rt, ctx, yield_function)?;
    tracing::debug!(name = %memory.name, value = %literal, "defI");
    memory.slot.set(FunctionEntry::Custom(CustomFunction {
        closure: closure_for(memory, &ctx.scope),
        body: Some(Rc::new(Node::Literal(literal))),
    }))?;
    Ok(None)
}

/// `set(<name>): expr` overwrites a binding of the current scope.
fn set(rt: &mut Runtime, ctx: &CallContext, args: Args, yield_function: Option<&Rc<Node>>) -> ValueResult {
    let memory = expect_memory(&args, 0)?;
    if !ctx.scope.borrow().has_local_function(&memory.name) {
        return Err(RuntimeError::MemoryError(format!(
            "Value <{}> is not defined",
            memory.name
        )));
    }

    let literal = reduce_to_literal(rt, ctx, yield_function)?;
    tracing::debug!(name = %memory.name, value = %literal, "set");
    ctx.scope
        .borrow_mut()
        .set_function(&memory.name, FunctionEntry::constant(Node::Literal(literal)));
    Ok(None)
}

/// `obj(<name>) { ... }` runs the block and keeps its scope as a namespace.
fn obj(rt: &mut Runtime, ctx: &CallContext, args: Args, yield_function: Option<&Rc<Node>>) -> ValueResult {
    let name = expect_name(&args, 0)?;
    let node = match yield_function {
        Some(node) => node,
        None => {
            return Err(RuntimeError::TypeError(
                "Yield to obj must be a block. Instead, I got nothing".to_string(),
            ))
        }
    };

    // A block is captured directly; anything else must evaluate to a scope.
    let result = match node.as_ref() {
        Node::Block(_) => execute(node, rt, &ctx.returning_scope())?,
        _ => execute(node, rt, ctx)?,
    };
    let scope = match result {
        Some(Value::Scope(scope)) => scope,
        other => {
            return Err(RuntimeError::TypeError(format!(
                "Yield to obj must be a block. Instead, I got {}",
                type_name_of(other.as_ref())
            )))
        }
    };

    tracing::debug!(name = %name, scope = %scope.borrow().id(), "obj");
    ctx.scope.borrow_mut().set_child_scope(&name, scope);
    Ok(None)
}
