use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::parser::ast::Literal;
use crate::runner::ds::scope::{ScopeExt, ScopeRef, Slot};

/// An evaluated Memory literal: the name plus the slot it resolved to.
#[derive(Clone, Debug)]
pub struct MemoryRef {
    pub name: String,
    pub slot: Slot,
}

impl MemoryRef {
    pub fn new(name: impl Into<String>, slot: Slot) -> Self {
        MemoryRef {
            name: name.into(),
            slot,
        }
    }
}

pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
    Memory(MemoryRef),
    Scope(ScopeRef),
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Value::Number(n) => Value::Number(*n),
            Value::String(s) => Value::String(s.to_string()),
            Value::Boolean(b) => Value::Boolean(*b),
            Value::Memory(m) => Value::Memory(m.clone()),
            Value::Scope(s) => Value::Scope(Rc::clone(s)),
        }
    }
}

impl Value {
    /// Literal to value. Memory literals resolve a slot in `scope`.
    pub fn from_literal(literal: &Literal, scope: &ScopeRef) -> Self {
        match literal {
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Memory(name) => Value::Memory(MemoryRef::new(name, scope.create_slot(name))),
        }
    }

    /// Value to literal; `None` for scopes, which have no literal form.
    pub fn to_literal(&self) -> Option<Literal> {
        match self {
            Value::Number(n) => Some(Literal::Number(*n)),
            Value::String(s) => Some(Literal::String(s.clone())),
            Value::Boolean(b) => Some(Literal::Boolean(*b)),
            Value::Memory(m) => Some(Literal::Memory(m.name.clone())),
            Value::Scope(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Boolean(_) => "Boolean",
            Value::Memory(_) => "Memory",
            Value::Scope(_) => "Scope",
        }
    }

    /// Boolean cast. Scopes carry no value and cannot be cast.
    pub fn truthy(&self) -> Option<bool> {
        match self {
            Value::Number(n) => Some(*n != 0.0 && !n.is_nan()),
            Value::String(s) => Some(!s.is_empty()),
            Value::Boolean(b) => Some(*b),
            Value::Memory(m) => Some(!m.name.is_empty()),
            Value::Scope(_) => None,
        }
    }

    /// The textual payload of a literal, as `num` reads it.
    pub fn raw_text(&self) -> Option<String> {
        match self {
            Value::Number(n) => Some(format_number(*n)),
            Value::String(s) => Some(s.clone()),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Memory(m) => Some(m.name.clone()),
            Value::Scope(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Render a number the way scripts see it: integral values have no fraction.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Display text, as produced by `print` and `str`.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Memory(m) => write!(f, "<{}>", m.name),
            Value::Scope(_) => write!(f, "[scope]"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Value::Number({})", format_number(*n)),
            Value::String(s) => write!(f, "Value::String({:?})", s),
            Value::Boolean(b) => write!(f, "Value::Boolean({})", b),
            Value::Memory(m) => write!(f, "Value::Memory(<{}>)", m.name),
            Value::Scope(s) => write!(f, "Value::Scope({})", s.borrow().id()),
        }
    }
}

/// Literals compare by type and value; scopes by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Memory(a), Value::Memory(b)) => a.name == b.name,
            (Value::Scope(a), Value::Scope(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
