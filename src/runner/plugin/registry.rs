//! Module registry for named pre-built scopes and script-file modules.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::runner::ds::scope::ScopeRef;

type ModuleInit = Box<dyn FnOnce() -> ScopeRef>;

enum RegistryEntry {
    Available(ScopeRef),
    /// Built on first import, then replaced by `Available`.
    Uninitialized(ModuleInit),
}

/// File modules are named by a path relative to the importing script,
/// written without the extension.
pub const MODULE_FILE_EXTENSION: &str = "bean";

/// `true` for `need` targets that name a script file rather than a
/// registered module.
pub fn is_file_module(name: &str) -> bool {
    name.starts_with("./") || name.starts_with("../")
}

/// Registry of the modules a program may `need`.
pub struct ModuleRegistry {
    modules: HashMap<String, RegistryEntry>,
    base_dir: PathBuf,
    files: HashMap<PathBuf, ScopeRef>,
    /// Files whose top level is being evaluated, innermost last.
    loading: Vec<PathBuf>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        ModuleRegistry {
            modules: HashMap::new(),
            base_dir: PathBuf::from("."),
            files: HashMap::new(),
            loading: Vec::new(),
        }
    }

    /// Register a ready-made module scope, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, scope: ScopeRef) {
        self.modules.insert(name.into(), RegistryEntry::Available(scope));
    }

    /// Register a module that is only built when a program first imports it.
    pub fn register_lazy<F>(&mut self, name: impl Into<String>, init: F)
    where
        F: FnOnce() -> ScopeRef + 'static,
    {
        self.modules
            .insert(name.into(), RegistryEntry::Uninitialized(Box::new(init)));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn is_initialized(&self, name: &str) -> bool {
        matches!(self.modules.get(name), Some(RegistryEntry::Available(_)))
    }

    /// Get a module's scope, building it first if it was registered lazily.
    pub fn resolve(&mut self, name: &str) -> Option<ScopeRef> {
        let needs_init = matches!(self.modules.get(name), Some(RegistryEntry::Uninitialized(_)));
        if needs_init {
            if let Some(RegistryEntry::Uninitialized(init)) = self.modules.remove(name) {
                tracing::debug!(module = name, "initializing lazy module");
                self.modules
                    .insert(name.to_string(), RegistryEntry::Available(init()));
            }
        }

        match self.modules.get(name) {
            Some(RegistryEntry::Available(scope)) => Some(Rc::clone(scope)),
            _ => None,
        }
    }

    /// Directory that file modules of the main program resolve against.
    pub fn set_base_dir(&mut self, dir: impl Into<PathBuf>) {
        self.base_dir = dir.into();
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the file a `./name` import refers to. Imports made while a
    /// file is loading resolve against that file's directory.
    pub fn file_path(&self, name: &str) -> PathBuf {
        let dir = self
            .loading
            .last()
            .and_then(|file| file.parent())
            .unwrap_or(self.base_dir.as_path());
        let path = dir.join(format!("{}.{}", name, MODULE_FILE_EXTENSION));
        fs::canonicalize(&path).unwrap_or(path)
    }

    pub fn file_module(&self, path: &Path) -> Option<ScopeRef> {
        self.files.get(path).map(Rc::clone)
    }

    pub fn is_loading(&self, path: &Path) -> bool {
        self.loading.iter().any(|p| p == path)
    }

    pub(crate) fn begin_loading(&mut self, path: PathBuf) {
        self.loading.push(path);
    }

    pub(crate) fn finish_loading(&mut self, path: &Path) {
        self.loading.retain(|p| p != path);
    }

    pub(crate) fn insert_file_module(&mut self, path: PathBuf, scope: ScopeRef) {
        self.files.insert(path, scope);
    }

    /// Scopes of every file module loaded so far.
    pub fn file_modules(&self) -> Vec<ScopeRef> {
        self.files.values().map(Rc::clone).collect()
    }

    pub fn names(&self) -> Vec<&String> {
        let mut names: Vec<&String> = self.modules.keys().collect();
        names.sort();
        names
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.names())
            .field("base_dir", &self.base_dir)
            .field("files", &self.files.keys().collect::<Vec<_>>())
            .finish()
    }
}
