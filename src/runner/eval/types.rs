//! Core types for the evaluation engine.

use crate::runner::ds::error::RuntimeError;
use crate::runner::ds::value::Value;

/// Result of evaluating a node: a value, or nothing at all.
pub type ValueResult = Result<Option<Value>, RuntimeError>;
