//! # beans - a yield-block scripting language in Rust
//!
//! A small dynamically-typed language whose functions may receive an
//! unevaluated block of code from their caller, featuring:
//! - PEG parser producing a compact AST
//! - Tree-walking evaluator with lexical scopes and closures
//! - Named storage slots (`<name>`) decoupling a binding from its value
//! - Host modules and script-file modules attached on demand with `need`
//!
//! ## Quick Start
//!
//! ### Parsing a script
//!
//! ```
//! use beans::parser::parse_to_ast;
//! use beans::parser::ast::Node;
//!
//! let ast = parse_to_ast("print(add(1, 2))").unwrap();
//! match ast {
//!     Node::Program(body) => assert_eq!(body.len(), 1),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! ### Running a script
//!
//! ```
//! use beans::runner::Runtime;
//! use beans::runner::plugin::BufferedSink;
//!
//! let output = BufferedSink::new();
//! let mut rt = Runtime::new().with_output(Box::new(output.clone()));
//!
//! rt.run_script("defI(<x>): add(2, 3)\nprint(x)").unwrap();
//! assert_eq!(output.lines(), vec!["5"]);
//! ```
//!
//! ## Yield Blocks
//!
//! A call may carry a trailing block, or any expression after `:`. The
//! callee decides if and when it runs; custom functions run it with
//! `yield()`:
//!
//! ```text
//! def(<twice>) { yield() yield() }
//! twice { print("hi") }
//! ```
//!
//! `def` stores its block without evaluating it, `defI` and `set` store the
//! literal it evaluates to, and `if`/`unless` run it conditionally.
//!
//! ## Modules
//!
//! Modules are scopes built by the host and registered on a runtime. A
//! script attaches one with `need` and calls its members by dotted name:
//!
//! ```
//! use beans::runner::Runtime;
//! use beans::runner::ds::Value;
//! use beans::runner::plugin::{BufferedSink, ModuleBuilder};
//!
//! let output = BufferedSink::new();
//! let mut rt = Runtime::new().with_output(Box::new(output.clone()));
//!
//! ModuleBuilder::new("math")
//!     .add_plugin("double", |_rt, _ctx, args, _yield| match args.first() {
//!         Some(Some(Value::Number(n))) => Ok(Some(Value::Number(n * 2.0))),
//!         _ => Ok(None),
//!     })
//!     .register(&mut rt);
//!
//! rt.run_script("need math\nprint(math.double(21))").unwrap();
//! assert_eq!(output.lines(), vec!["42"]);
//! ```
//!
//! ## Architecture
//!
//! - **[`parser`]** - PEG grammar, parser and AST types
//! - **[`runner`]** - Evaluation
//!   - **[`runner::ds`]** - Values, scopes, slots and function entries
//!   - **[`runner::eval`]** - The recursive evaluator and call protocol
//!   - **[`runner::std_lib`]** - Builtins installed into every root scope
//!   - **[`runner::plugin`]** - Module registry, module builder, output sinks

#[macro_use]
extern crate lazy_static;

pub mod parser;
pub mod runner;
