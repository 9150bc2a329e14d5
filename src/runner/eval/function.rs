//! Function call execution.
//!
//! Natives get their arguments evaluated in the caller's context and see the
//! caller's context themselves. Custom functions run their body in a fresh
//! context rooted at the closure scope.

use std::rc::Rc;

use crate::parser::ast::{FunctionCallData, Node};
use crate::runner::ds::error::RuntimeError;
use crate::runner::ds::execution_context::CallContext;
use crate::runner::ds::function::{Args, CustomFunction, FunctionEntry};
use crate::runner::ds::scope::{ScopeExt, ScopeRef};
use crate::runner::runtime::Runtime;

use super::node::execute;
use super::types::ValueResult;

#[tracing::instrument(level = "trace", skip_all, fields(name = %call.name))]
pub fn call_function(call: &FunctionCallData, rt: &mut Runtime, ctx: &CallContext) -> ValueResult {
    let resolved = ctx.scope.resolve_call(&call.name)?;

    match resolved.entry {
        FunctionEntry::Native(native) => {
            let args = evaluate_arguments(&call.parameters, rt, ctx)?;
            native.call(rt, ctx, args, call.yield_function.as_ref())
        }
        FunctionEntry::Custom(custom) => {
            // A call site without arguments forwards the caller's parameters.
            let parameters = if call.parameters.is_empty() {
                Rc::clone(&ctx.parameters)
            } else {
                Rc::new(evaluate_arguments(&call.parameters, rt, ctx)?)
            };
            call_custom(&custom, &resolved.owner, parameters, call.yield_function.clone(), rt)
        }
    }
}

/// Run a custom function's body against its closure scope.
pub fn call_custom(
    custom: &CustomFunction,
    owner: &ScopeRef,
    parameters: Rc<Args>,
    yield_function: Option<Rc<Node>>,
    rt: &mut Runtime,
) -> ValueResult {
    let body = match &custom.body {
        Some(body) => Rc::clone(body),
        None => return Ok(None),
    };
    let inner = CallContext {
        scope: custom.closure_scope(owner),
        parameters,
        yield_function,
        return_scope: false,
    };
    execute(&body, rt, &inner)
}

/// Evaluate argument expressions left to right.
pub fn evaluate_arguments(parameters: &[Node], rt: &mut Runtime, ctx: &CallContext) -> Result<Args, RuntimeError> {
    let mut args = Vec::with_capacity(parameters.len());
    for parameter in parameters {
        args.push(execute(parameter, rt, ctx)?);
    }
    Ok(args)
}
