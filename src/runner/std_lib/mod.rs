//! Standard library builtins.
//!
//! Every builtin is a native function with the same signature: evaluated
//! arguments, the caller's context and the raw yield subtree. They are
//! installed into the root scope of each new runtime.

pub mod args;
pub mod core;
pub mod arithmetic;
pub mod console;
pub mod control;
pub mod conversion;
pub mod definition;

pub use self::core::{core_builtin, core_builtin_names, register_core_builtins};
