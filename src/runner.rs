//! Evaluation: values and scopes, the recursive evaluator, builtins and
//! the host-facing module surface.

pub mod config;
pub mod ds;
pub mod eval;
pub mod plugin;
pub mod runtime;
pub mod std_lib;

pub use config::RuntimeConfig;
pub use runtime::{Runtime, ScriptError};
