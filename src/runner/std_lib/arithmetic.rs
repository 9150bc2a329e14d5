//! Arithmetic builtins. Numbers follow IEEE 754 double semantics, so
//! dividing by zero gives an infinity rather than an error.

use std::rc::Rc;

use crate::parser::ast::Node;
use crate::runner::ds::error::RuntimeError;
use crate::runner::ds::execution_context::CallContext;
use crate::runner::ds::function::{Args, NativeFn};
use crate::runner::ds::value::Value;
use crate::runner::eval::types::ValueResult;
use crate::runner::runtime::Runtime;

use super::args::{arg, type_name_of};

pub const BUILTINS: &[(&str, NativeFn)] = &[("add", add), ("sub", sub), ("mul", mul), ("div", div)];

/// `add(a, b, ...)`: sum of numbers or concatenation of strings.
fn add(_rt: &mut Runtime, _ctx: &CallContext, args: Args, _yield: Option<&Rc<Node>>) -> ValueResult {
    let first = arg(&args, 0);
    if let Some(mismatch) = args.iter().map(Option::as_ref).find(|v| type_name_of(*v) != type_name_of(first)) {
        return Err(RuntimeError::TypeError(format!(
            "Cannot add a {} to a {}. Please type cast using str()",
            type_name_of(mismatch),
            type_name_of(first)
        )));
    }

    match first {
        Some(Value::Number(_)) => {
            let sum = args.iter().flatten().filter_map(Value::as_number).sum();
            Ok(Some(Value::Number(sum)))
        }
        Some(Value::String(_)) => {
            let mut joined = String::new();
            for value in args.iter().flatten() {
                if let Value::String(s) = value {
                    joined.push_str(s);
                }
            }
            Ok(Some(Value::String(joined)))
        }
        other => Err(RuntimeError::TypeError(format!(
            "Cannot add values of type {}",
            type_name_of(other)
        ))),
    }
}

fn number_pair(args: &Args, message: &str) -> Result<(f64, f64), RuntimeError> {
    match (arg(args, 0), arg(args, 1)) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => Ok((*a, *b)),
        _ => Err(RuntimeError::TypeError(message.to_string())),
    }
}

fn sub(_rt: &mut Runtime, _ctx: &CallContext, args: Args, _yield: Option<&Rc<Node>>) -> ValueResult {
    let (a, b) = number_pair(&args, "To subtract, both objects must be numbers")?;
    Ok(Some(Value::Number(a - b)))
}

fn div(_rt: &mut Runtime, _ctx: &CallContext, args: Args, _yield: Option<&Rc<Node>>) -> ValueResult {
    let (a, b) = number_pair(&args, "To divide, both objects must be numbers")?;
    Ok(Some(Value::Number(a / b)))
}

/// `mul(a, n)`: numeric product, or for a string `a` the string cycled out to
/// `len(a) * n` characters.
fn mul(_rt: &mut Runtime, _ctx: &CallContext, args: Args, _yield: Option<&Rc<Node>>) -> ValueResult {
    let count = match arg(&args, 1) {
        Some(Value::Number(n)) => *n,
        _ => {
            return Err(RuntimeError::TypeError(
                "To multiply, the second object must be a number".to_string(),
            ))
        }
    };

    match arg(&args, 0) {
        Some(Value::Number(n)) => Ok(Some(Value::Number(n * count))),
        Some(Value::String(s)) => Ok(Some(Value::String(repeat_to_length(s, count)?))),
        other => Err(RuntimeError::TypeError(format!(
            "Cannot multiply a {}",
            type_name_of(other)
        ))),
    }
}

/// Longest string a script can build, in characters.
pub const MAX_STRING_LENGTH: usize = (1 << 30) - 25;

fn repeat_to_length(s: &str, count: f64) -> Result<String, RuntimeError> {
    let target = s.chars().count() as f64 * count;
    if target.is_nan() || target <= 0.0 || s.is_empty() {
        return Ok(String::new());
    }
    if target.trunc() > MAX_STRING_LENGTH as f64 {
        return Err(RuntimeError::RangeError("Invalid string length".to_string()));
    }
    Ok(s.chars().cycle().take(target.trunc() as usize).collect())
}
