use std::fmt;
use std::fmt::{Display, Formatter};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Reference,
    Type,
    Memory,
    Range,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Reference => "Reference",
            ErrorKind::Type => "Type",
            ErrorKind::Memory => "Memory",
            ErrorKind::Range => "Range",
        };
        write!(f, "{}", name)
    }
}

/// Every evaluation failure is fatal to the running program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("Uncaught reference error: {0}.")]
    ReferenceError(String),
    #[error("Uncaught type error: {0}.")]
    TypeError(String),
    #[error("Uncaught memory error: {0}.")]
    MemoryError(String),
    #[error("Uncaught range error: {0}.")]
    RangeError(String),
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::ReferenceError(_) => ErrorKind::Reference,
            RuntimeError::TypeError(_) => ErrorKind::Type,
            RuntimeError::MemoryError(_) => ErrorKind::Memory,
            RuntimeError::RangeError(_) => ErrorKind::Range,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RuntimeError::ReferenceError(m)
            | RuntimeError::TypeError(m)
            | RuntimeError::MemoryError(m)
            | RuntimeError::RangeError(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = RuntimeError::MemoryError("Value <x> is already defined".to_string());
        assert_eq!(err.kind(), ErrorKind::Memory);
        assert_eq!(
            err.to_string(),
            "Uncaught memory error: Value <x> is already defined."
        );
    }
}
