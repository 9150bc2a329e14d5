pub mod error;
pub mod execution_context;
pub mod function;
pub mod scope;
pub mod value;

pub use error::{ErrorKind, RuntimeError};
pub use execution_context::CallContext;
pub use function::{Args, Closure, CustomFunction, FunctionEntry, NativeFn, NativeFunction};
pub use scope::{ResolvedFunction, Scope, ScopeExt, ScopeRef, Slot};
pub use value::{MemoryRef, Value};
