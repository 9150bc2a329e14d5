//! Host-facing plugin surface.
//!
//! Modules are pre-built scopes registered by the host and attached to the
//! root scope when a program first `need`s them:
//!
//! ```text
//! need math            // ModuleImport: registry lookup, bound into root.child_scopes
//! math.double(21)      // member call: resolved in math's own function table
//! ```
//!
//! - **[`ModuleRegistry`]**: named modules, eager or lazily built
//! - **[`ModuleBuilder`]**: assembles a module scope from natives, closures and constants
//! - **[`OutputSink`]**: where `print` writes

pub mod output;
pub mod registry;
pub mod types;

pub use output::{BufferedSink, OutputSink, StdoutSink};
pub use registry::ModuleRegistry;
pub use types::ModuleBuilder;
