//! Node execution.
//!
//! `execute` is the single entry point every construct and builtin goes
//! through, so the depth budget and stack growth apply uniformly.

use std::rc::Rc;

use crate::parser::ast::{BlockData, Node};
use crate::runner::ds::execution_context::CallContext;
use crate::runner::ds::scope::{Scope, ScopeExt};
use crate::runner::ds::value::Value;
use crate::runner::runtime::Runtime;

use super::function::call_function;
use super::stack::ensure_sufficient_stack;
use super::types::ValueResult;

/// Evaluate `node` under `ctx`.
pub fn execute(node: &Node, rt: &mut Runtime, ctx: &CallContext) -> ValueResult {
    rt.enter_node()?;
    let result = ensure_sufficient_stack(|| execute_node(node, rt, ctx));
    rt.leave_node();
    result
}

fn execute_node(node: &Node, rt: &mut Runtime, ctx: &CallContext) -> ValueResult {
    match node {
        Node::Literal(literal) => Ok(Some(Value::from_literal(literal, &ctx.scope))),

        Node::FunctionCall(call) => call_function(call, rt, ctx),

        Node::Block(block) => execute_block(block, rt, ctx),

        Node::Program(body) => {
            for statement in body {
                execute(statement, rt, ctx)?;
            }
            Ok(None)
        }

        Node::ParameterBlock(body) => {
            let mut last = None;
            for expression in body {
                last = execute(expression, rt, ctx)?;
            }
            Ok(last)
        }

        Node::ModuleImport(name) => {
            let scope = rt.import_into(name, &ctx.scope.chain_root())?;
            Ok(Some(Value::Scope(scope)))
        }
    }
}

/// Execute a block.
///
/// Every statement runs, even after a `return`; the captured value is only
/// read once the block is done.
fn execute_block(block: &BlockData, rt: &mut Runtime, ctx: &CallContext) -> ValueResult {
    let scope = match &block.scope {
        Some(scope) => Rc::clone(scope),
        None => Scope::new_ref(Some(Rc::clone(&ctx.scope))),
    };
    tracing::trace!(scope = %scope.borrow().id(), statements = block.body.len(), "enter block");

    // The scope request applies to this block only, not to nested ones.
    let inner = CallContext {
        return_scope: false,
        ..ctx.with_scope(Rc::clone(&scope))
    };
    for statement in block.body.iter() {
        execute(statement, rt, &inner)?;
    }

    if ctx.return_scope {
        return Ok(Some(Value::Scope(scope)));
    }
    let value = scope.borrow().return_value();
    Ok(value)
}
