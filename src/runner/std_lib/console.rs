//! `print`, forwarding rendered text to the runtime's output sink.

use std::rc::Rc;

use crate::parser::ast::Node;
use crate::runner::ds::execution_context::CallContext;
use crate::runner::ds::function::{Args, NativeFn};
use crate::runner::eval::types::ValueResult;
use crate::runner::runtime::Runtime;

use super::args::render;

pub const BUILTINS: &[(&str, NativeFn)] = &[("print", print)];

/// Format all arguments for output, separated by spaces.
fn format_args(args: &Args) -> String {
    args.iter()
        .map(|value| render(value.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print(rt: &mut Runtime, _ctx: &CallContext, args: Args, _yield: Option<&Rc<Node>>) -> ValueResult {
    let text = format_args(&args);
    rt.write_output(&text);
    Ok(None)
}
