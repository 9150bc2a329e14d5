//! Argument helpers shared by the builtins.

use std::rc::Rc;

use crate::parser::ast::{Literal, Node};
use crate::runner::ds::error::RuntimeError;
use crate::runner::ds::execution_context::CallContext;
use crate::runner::ds::function::Args;
use crate::runner::ds::value::{MemoryRef, Value};
use crate::runner::eval::execute;
use crate::runner::runtime::Runtime;

/// Type name used in messages; an absent value reads as `nothing`.
pub fn type_name_of(value: Option<&Value>) -> &'static str {
    value.map(Value::type_name).unwrap_or("nothing")
}

pub fn arg(args: &Args, index: usize) -> Option<&Value> {
    args.get(index).and_then(Option::as_ref)
}

/// Display text of a possibly absent value.
pub fn render(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "[null]".to_string(),
    }
}

pub fn expect_memory(args: &Args, index: usize) -> Result<&MemoryRef, RuntimeError> {
    match arg(args, index) {
        Some(Value::Memory(memory)) => Ok(memory),
        other => Err(RuntimeError::TypeError(format!(
            "Expected Memory, instead got {}",
            type_name_of(other)
        ))),
    }
}

/// A name given either as `<name>` or as a string.
pub fn expect_name(args: &Args, index: usize) -> Result<String, RuntimeError> {
    match arg(args, index) {
        Some(Value::Memory(memory)) => Ok(memory.name.clone()),
        Some(Value::String(name)) => Ok(name.clone()),
        other => Err(RuntimeError::TypeError(format!(
            "Expected Memory, instead got {}",
            type_name_of(other)
        ))),
    }
}

pub fn cast_to_boolean(value: Option<&Value>) -> Result<bool, RuntimeError> {
    value.and_then(Value::truthy).ok_or_else(|| {
        RuntimeError::TypeError(format!(
            "{} is not type cast-able to boolean",
            type_name_of(value)
        ))
    })
}

/// Evaluate the yield subtree, if any, under `ctx`.
pub fn run_yield(
    rt: &mut Runtime,
    ctx: &CallContext,
    yield_function: Option<&Rc<Node>>,
) -> Result<Option<Value>, RuntimeError> {
    match yield_function {
        Some(node) => execute(node, rt, ctx),
        None => Ok(None),
    }
}

/// Evaluate the yield subtree down to a literal.
///
/// Evaluation only ever produces values, so a single step either lands on a
/// literal or on something that can never become one. Runaway recursion
/// inside the subtree is stopped by the depth budget.
pub fn reduce_to_literal(
    rt: &mut Runtime,
    ctx: &CallContext,
    yield_function: Option<&Rc<Node>>,
) -> Result<Literal, RuntimeError> {
    let value = run_yield(rt, ctx, yield_function)?;
    match value.as_ref().and_then(Value::to_literal) {
        Some(literal) => Ok(literal),
        None => Err(RuntimeError::TypeError(format!(
            "Expected a literal, instead got {}",
            type_name_of(value.as_ref())
        ))),
    }
}
