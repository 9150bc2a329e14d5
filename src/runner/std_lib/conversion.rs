//! Conversion builtins: `str` and `num`.

use std::rc::Rc;

use crate::parser::ast::Node;
use crate::runner::ds::execution_context::CallContext;
use crate::runner::ds::function::{Args, NativeFn};
use crate::runner::ds::value::Value;
use crate::runner::eval::types::ValueResult;
use crate::runner::runtime::Runtime;

use super::args::{arg, render};

pub const BUILTINS: &[(&str, NativeFn)] = &[("str", to_str), ("num", to_num)];

fn to_str(_rt: &mut Runtime, _ctx: &CallContext, args: Args, _yield: Option<&Rc<Node>>) -> ValueResult {
    Ok(Some(Value::String(render(arg(&args, 0)))))
}

/// `num(x)`: the leading integer of `x`'s text, or NaN.
fn to_num(_rt: &mut Runtime, _ctx: &CallContext, args: Args, _yield: Option<&Rc<Node>>) -> ValueResult {
    let parsed = arg(&args, 0)
        .and_then(Value::raw_text)
        .map(|text| parse_int(&text))
        .unwrap_or(f64::NAN);
    Ok(Some(Value::Number(parsed)))
}

/// Integer prefix parse: optional sign, optional `0x`, then as many digits
/// as match. Leading whitespace is skipped.
pub fn parse_int(text: &str) -> f64 {
    let mut rest = text.trim_start();
    let mut sign = 1.0;
    if let Some(stripped) = rest.strip_prefix('-') {
        sign = -1.0;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }

    let mut radix = 10;
    if let Some(stripped) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        radix = 16;
        rest = stripped;
    }

    let mut value = 0.0;
    let mut digits = 0;
    for c in rest.chars() {
        match c.to_digit(radix) {
            Some(d) => {
                value = value * radix as f64 + d as f64;
                digits += 1;
            }
            None => break,
        }
    }

    if digits == 0 {
        f64::NAN
    } else {
        sign * value
    }
}
