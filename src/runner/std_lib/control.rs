//! Control builtins: parameters, yield blocks, `return` and conditionals.

use std::rc::Rc;

use crate::parser::ast::Node;
use crate::runner::ds::execution_context::CallContext;
use crate::runner::ds::function::{Args, NativeFn};
use crate::runner::ds::scope::ScopeExt;
use crate::runner::ds::value::Value;
use crate::runner::eval::types::ValueResult;
use crate::runner::runtime::Runtime;

use super::args::{arg, cast_to_boolean, expect_name, run_yield};

pub const BUILTINS: &[(&str, NativeFn)] = &[
    ("param", param),
    ("yield", yield_block),
    ("return", return_value),
    ("if", if_block),
    ("unless", unless_block),
    ("not", not),
    ("exists", exists),
    ("is", is),
];

/// `param(i)`: the i-th argument of the innermost custom call, or nothing
/// when `i` is not a whole number naming one.
fn param(_rt: &mut Runtime, ctx: &CallContext, args: Args, _yield: Option<&Rc<Node>>) -> ValueResult {
    let index = match arg(&args, 0) {
        Some(Value::Number(n)) => *n,
        _ => return Ok(None),
    };
    if index < 0.0 || index.fract() != 0.0 {
        return Ok(None);
    }
    Ok(ctx.parameter(index as usize))
}

/// `yield()`: run the block the caller handed to the current custom function.
fn yield_block(rt: &mut Runtime, ctx: &CallContext, _args: Args, _yield: Option<&Rc<Node>>) -> ValueResult {
    let block = ctx.yield_function.clone();
    run_yield(rt, ctx, block.as_ref())
}

/// `return(v)` records `v` on the current scope. Later statements still run.
fn return_value(_rt: &mut Runtime, ctx: &CallContext, args: Args, _yield: Option<&Rc<Node>>) -> ValueResult {
    let value = args.into_iter().next().flatten();
    ctx.scope.borrow_mut().set_return_value(value.clone());
    Ok(value)
}

fn run_when(
    expected: bool,
    rt: &mut Runtime,
    ctx: &CallContext,
    args: &Args,
    yield_function: Option<&Rc<Node>>,
) -> ValueResult {
    let condition = cast_to_boolean(arg(args, 0))?;
    if condition != expected {
        return Ok(Some(Value::Boolean(false)));
    }
    run_yield(rt, ctx, yield_function)?;
    Ok(Some(Value::Boolean(true)))
}

fn if_block(rt: &mut Runtime, ctx: &CallContext, args: Args, yield_function: Option<&Rc<Node>>) -> ValueResult {
    run_when(true, rt, ctx, &args, yield_function)
}

fn unless_block(rt: &mut Runtime, ctx: &CallContext, args: Args, yield_function: Option<&Rc<Node>>) -> ValueResult {
    run_when(false, rt, ctx, &args, yield_function)
}

fn not(_rt: &mut Runtime, _ctx: &CallContext, args: Args, _yield: Option<&Rc<Node>>) -> ValueResult {
    let condition = cast_to_boolean(arg(&args, 0))?;
    Ok(Some(Value::Boolean(!condition)))
}

/// `exists(<name>)`: whether the name resolves from the current scope.
fn exists(_rt: &mut Runtime, ctx: &CallContext, args: Args, _yield: Option<&Rc<Node>>) -> ValueResult {
    let name = expect_name(&args, 0)?;
    Ok(Some(Value::Boolean(ctx.scope.has_function(&name))))
}

/// `is(a): b`: true when both sides have the same type and value.
fn is(rt: &mut Runtime, ctx: &CallContext, args: Args, yield_function: Option<&Rc<Node>>) -> ValueResult {
    let expected = run_yield(rt, ctx, yield_function)?;
    let matches = match (arg(&args, 0), expected.as_ref()) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    };
    Ok(Some(Value::Boolean(matches)))
}
