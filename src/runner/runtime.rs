//! The runtime: root scope, module registry, output sink and limits.
//!
//! Every piece of state a program can mutate lives here, so separate
//! runtimes never observe each other's definitions.

use std::fs;
use std::rc::Rc;

use thiserror::Error;

use crate::parser::ast::Node;
use crate::parser::{parse_to_ast, ParseError};
use crate::runner::config::RuntimeConfig;
use crate::runner::ds::error::RuntimeError;
use crate::runner::ds::execution_context::CallContext;
use crate::runner::ds::scope::{Scope, ScopeExt, ScopeRef};
use crate::runner::ds::value::Value;
use crate::runner::eval::execute;
use crate::runner::eval::types::ValueResult;
use crate::runner::plugin::output::{OutputSink, StdoutSink};
use crate::runner::plugin::registry::{is_file_module, ModuleRegistry};
use crate::runner::std_lib::register_core_builtins;

/// Failure of a script run from source.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

pub struct Runtime {
    root: ScopeRef,
    modules: ModuleRegistry,
    output: Box<dyn OutputSink>,
    config: RuntimeConfig,
    depth: usize,
}

impl Runtime {
    /// A runtime with the core builtins installed, printing to stdout.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let root = Scope::new_ref(None);
        register_core_builtins(&mut root.borrow_mut());
        Runtime {
            root,
            modules: ModuleRegistry::new(),
            output: Box::new(StdoutSink),
            config,
            depth: 0,
        }
    }

    pub fn with_output(mut self, output: Box<dyn OutputSink>) -> Self {
        self.output = output;
        self
    }

    pub fn root(&self) -> &ScopeRef {
        &self.root
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.modules
    }

    pub fn register_module(&mut self, name: impl Into<String>, scope: ScopeRef) {
        self.modules.register(name, scope);
    }

    /// A context at the root scope with no parameters and no yield block.
    pub fn root_context(&self) -> CallContext {
        CallContext::new(Rc::clone(&self.root))
    }

    /// Register `named_modules`, then evaluate `ast` at the root scope.
    pub fn run<I, S>(&mut self, ast: &Node, named_modules: I) -> ValueResult
    where
        I: IntoIterator<Item = (S, ScopeRef)>,
        S: Into<String>,
    {
        for (name, scope) in named_modules {
            self.register_module(name, scope);
        }
        let ctx = self.root_context();
        self.execute(ast, &ctx)
    }

    /// Parse `source` and run it at the root scope.
    pub fn run_script(&mut self, source: &str) -> Result<Option<Value>, ScriptError> {
        let ast = parse_to_ast(source)?;
        let ctx = self.root_context();
        Ok(self.execute(&ast, &ctx)?)
    }

    pub fn execute(&mut self, node: &Node, ctx: &CallContext) -> ValueResult {
        execute(node, self, ctx)
    }

    /// Resolve a module and attach it to the root scope.
    pub fn import_module(&mut self, name: &str) -> Result<ScopeRef, RuntimeError> {
        let root = Rc::clone(&self.root);
        self.import_into(name, &root)
    }

    /// Resolve a module and attach it to `target`. Registered modules keep
    /// their name; a file module is attached under its file stem.
    pub(crate) fn import_into(&mut self, name: &str, target: &ScopeRef) -> Result<ScopeRef, RuntimeError> {
        let (binding, scope) = if is_file_module(name) {
            self.load_file_module(name)?
        } else {
            let scope = self
                .modules
                .resolve(name)
                .ok_or_else(|| RuntimeError::ReferenceError(format!("Unknown module '{}'", name)))?;
            (name.to_string(), scope)
        };

        let attached = target
            .borrow()
            .get_child_scope(&binding)
            .map(|s| Rc::ptr_eq(&s, &scope))
            .unwrap_or(false);
        if !attached {
            tracing::debug!(module = name, binding = %binding, "attaching module");
            target.borrow_mut().set_child_scope(&binding, Rc::clone(&scope));
        }
        Ok(scope)
    }

    /// Evaluate a script file into a module scope of its own, once per path.
    fn load_file_module(&mut self, name: &str) -> Result<(String, ScopeRef), RuntimeError> {
        let path = self.modules.file_path(name);
        let binding = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| RuntimeError::ReferenceError(format!("Invalid module path '{}'", name)))?;

        if let Some(scope) = self.modules.file_module(&path) {
            return Ok((binding, scope));
        }
        if self.modules.is_loading(&path) {
            return Err(RuntimeError::ReferenceError(format!(
                "Module '{}' is imported while it is still being loaded",
                name
            )));
        }

        let source = fs::read_to_string(&path).map_err(|e| {
            RuntimeError::ReferenceError(format!("Cannot read module file {}: {}", path.display(), e))
        })?;
        let ast = parse_to_ast(&source).map_err(|e| {
            RuntimeError::ReferenceError(format!("Cannot parse module file {}: {}", path.display(), e))
        })?;

        tracing::debug!(module = name, path = %path.display(), "loading file module");
        let scope = Scope::new_ref(None);
        register_core_builtins(&mut scope.borrow_mut());
        let ctx = CallContext::new(Rc::clone(&scope));

        self.modules.begin_loading(path.clone());
        let result = self.execute(&ast, &ctx);
        self.modules.finish_loading(&path);
        result?;

        self.modules.insert_file_module(path, Rc::clone(&scope));
        Ok((binding, scope))
    }

    pub fn write_output(&mut self, text: &str) {
        self.output.write_line(text);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn enter_node(&mut self) -> Result<(), RuntimeError> {
        if let Some(max_depth) = self.config.max_depth {
            if self.depth >= max_depth {
                return Err(RuntimeError::RangeError(format!(
                    "Maximum evaluation depth of {} exceeded",
                    max_depth
                )));
            }
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave_node(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Namespaces link to their parent and are held by it, so the tables filled
/// by the program and by file modules are emptied here to let those scopes
/// go. Module scopes built by the host are left intact.
impl Drop for Runtime {
    fn drop(&mut self) {
        let mut tops = self.modules.file_modules();
        tops.push(Rc::clone(&self.root));
        for top in tops {
            let mut pending = vec![Rc::clone(&top)];
            while let Some(scope) = pending.pop() {
                let children = scope.borrow_mut().clear();
                pending.extend(children.into_iter().filter(|child| child.descends_from(&top)));
            }
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
