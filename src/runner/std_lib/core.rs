//! Core builtins registration.
//!
//! Collects the tables of every builtin module and installs them into a
//! runtime's root scope.

use std::collections::HashMap;

use crate::runner::ds::function::{FunctionEntry, NativeFn};
use crate::runner::ds::scope::Scope;

use super::arithmetic;
use super::console;
use super::control;
use super::conversion;
use super::definition;

lazy_static! {
    static ref CORE_BUILTINS: HashMap<&'static str, NativeFn> = {
        let tables = [
            definition::BUILTINS,
            console::BUILTINS,
            control::BUILTINS,
            arithmetic::BUILTINS,
            conversion::BUILTINS,
        ];
        let mut builtins = HashMap::new();
        for table in tables.iter() {
            for (name, function) in table.iter() {
                builtins.insert(*name, *function);
            }
        }
        builtins
    };
}

/// Install every core builtin into `scope`.
pub fn register_core_builtins(scope: &mut Scope) {
    for (name, function) in CORE_BUILTINS.iter() {
        scope.set_function(name, FunctionEntry::builtin(*function));
    }
}

/// Look up a core builtin by name.
pub fn core_builtin(name: &str) -> Option<NativeFn> {
    CORE_BUILTINS.get(name).copied()
}

pub fn core_builtin_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = CORE_BUILTINS.keys().copied().collect();
    names.sort_unstable();
    names
}
