use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::runner::ds::scope::ScopeRef;

/// A literal is both syntax and a first-class runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
    Memory(String),
}

impl Literal {
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Number(_) => "Number",
            Literal::String(_) => "String",
            Literal::Boolean(_) => "Boolean",
            Literal::Memory(_) => "Memory",
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Memory(name) => write!(f, "<{}>", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCallData {
    /// Plain identifier, or a dotted member path such as `math.double`.
    pub name: String,
    pub parameters: Vec<Node>,
    /// Unevaluated subtree handed to the callee.
    pub yield_function: Option<Rc<Node>>,
}

impl FunctionCallData {
    pub fn new(name: impl Into<String>) -> Self {
        FunctionCallData {
            name: name.into(),
            parameters: Vec::new(),
            yield_function: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<Node>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_yield(mut self, yield_function: Node) -> Self {
        self.yield_function = Some(Rc::new(yield_function));
        self
    }
}

#[derive(Debug, Clone)]
pub struct BlockData {
    pub body: Vec<Node>,
    /// When present the block evaluates inside this scope instead of a fresh child.
    pub scope: Option<ScopeRef>,
}

impl BlockData {
    pub fn new(body: Vec<Node>) -> Self {
        BlockData { body, scope: None }
    }

    pub fn with_scope(mut self, scope: ScopeRef) -> Self {
        self.scope = Some(scope);
        self
    }
}

impl PartialEq for BlockData {
    fn eq(&self, other: &Self) -> bool {
        let same_scope = match (&self.scope, &other.scope) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        };
        same_scope && self.body == other.body
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(Literal),
    FunctionCall(FunctionCallData),
    Block(BlockData),
    Program(Vec<Node>),
    ParameterBlock(Vec<Node>),
    ModuleImport(String),
}

impl Node {
    pub fn number(n: f64) -> Self {
        Node::Literal(Literal::Number(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Node::Literal(Literal::String(s.into()))
    }

    pub fn boolean(b: bool) -> Self {
        Node::Literal(Literal::Boolean(b))
    }

    pub fn memory(name: impl Into<String>) -> Self {
        Node::Literal(Literal::Memory(name.into()))
    }

    pub fn call(call: FunctionCallData) -> Self {
        Node::FunctionCall(call)
    }

    pub fn block(body: Vec<Node>) -> Self {
        Node::Block(BlockData::new(body))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Literal(l) => l.type_name(),
            Node::FunctionCall(_) => "FunctionCall",
            Node::Block(_) => "Block",
            Node::Program(_) => "Program",
            Node::ParameterBlock(_) => "ParameterBlock",
            Node::ModuleImport(_) => "ModuleImport",
        }
    }
}
