//! Evaluation module for executing beans AST.
//!
//! This module contains the recursive dispatcher and the call protocol
//! shared by native and custom functions.

pub mod function;
pub mod node;
pub mod stack;
pub mod types;

pub use node::execute;
pub use types::ValueResult;
