use std::fmt;
use std::rc::Rc;

use crate::parser::ast::Node;
use crate::runner::ds::execution_context::CallContext;
use crate::runner::ds::scope::ScopeRef;
use crate::runner::ds::value::Value;
use crate::runner::eval::types::ValueResult;
use crate::runner::runtime::Runtime;

/// Evaluated positional arguments. An argument expression may evaluate to nothing.
pub type Args = Vec<Option<Value>>;

/// Signature for compiled-in builtins.
/// Natives receive the evaluated arguments, the caller's context and the
/// raw yield subtree, and decide themselves whether to evaluate it.
pub type NativeFn = fn(
    rt: &mut Runtime,
    ctx: &CallContext,
    args: Args,
    yield_function: Option<&Rc<Node>>,
) -> ValueResult;

pub type PluginFn = dyn Fn(&mut Runtime, &CallContext, Args, Option<&Rc<Node>>) -> ValueResult;

/// Host-supplied procedure.
#[derive(Clone)]
pub enum NativeFunction {
    /// Direct function pointer.
    Builtin(NativeFn),
    /// Host closure, e.g. one registered by a module that captures state.
    Plugin(Rc<PluginFn>),
}

impl NativeFunction {
    pub fn call(
        &self,
        rt: &mut Runtime,
        ctx: &CallContext,
        args: Args,
        yield_function: Option<&Rc<Node>>,
    ) -> ValueResult {
        match self {
            NativeFunction::Builtin(f) => f(rt, ctx, args, yield_function),
            NativeFunction::Plugin(f) => f(rt, ctx, args, yield_function),
        }
    }
}

/// Where a custom function's body runs.
#[derive(Clone)]
pub enum Closure {
    /// The scope that holds the entry, which is also where it was defined.
    /// Kept implicit so a scope never owns a handle to itself.
    Owner,
    Captured(ScopeRef),
}

#[derive(Clone)]
pub struct CustomFunction {
    pub closure: Closure,
    /// `None` when defined without a yield block; calling it yields nothing.
    pub body: Option<Rc<Node>>,
}

impl CustomFunction {
    pub fn closure_scope(&self, owner: &ScopeRef) -> ScopeRef {
        match &self.closure {
            Closure::Owner => Rc::clone(owner),
            Closure::Captured(scope) => Rc::clone(scope),
        }
    }
}

#[derive(Clone)]
pub enum FunctionEntry {
    Native(NativeFunction),
    Custom(CustomFunction),
}

impl FunctionEntry {
    pub fn builtin(f: NativeFn) -> Self {
        FunctionEntry::Native(NativeFunction::Builtin(f))
    }

    pub fn plugin<F>(f: F) -> Self
    where
        F: Fn(&mut Runtime, &CallContext, Args, Option<&Rc<Node>>) -> ValueResult + 'static,
    {
        FunctionEntry::Native(NativeFunction::Plugin(Rc::new(f)))
    }

    /// An argument-less custom function whose body is a fixed literal node.
    pub fn constant(body: Node) -> Self {
        FunctionEntry::Custom(CustomFunction {
            closure: Closure::Owner,
            body: Some(Rc::new(body)),
        })
    }

    pub fn is_native(&self) -> bool {
        matches!(self, FunctionEntry::Native(_))
    }
}

impl fmt::Debug for FunctionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionEntry::Native(NativeFunction::Builtin(_)) => write!(f, "FunctionEntry::Native(builtin)"),
            FunctionEntry::Native(NativeFunction::Plugin(_)) => write!(f, "FunctionEntry::Native(plugin)"),
            FunctionEntry::Custom(c) => match &c.body {
                Some(body) => write!(f, "FunctionEntry::Custom({})", body.kind_name()),
                None => write!(f, "FunctionEntry::Custom(empty)"),
            },
        }
    }
}
