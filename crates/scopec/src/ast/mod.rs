//! Syntax tree handed over by the parser
//!
//! The tree is generic: every node has a kind tag, an optional line, an
//! optional literal value and ordered children. Only the kinds the resolver
//! cares about get their own `NodeKind` variant; everything else is carried
//! through as `NodeKind::Other`.

#[cfg(test)]
pub(crate) mod build;
mod shape;

pub use shape::{FunctionShape, ParamShape, ReferenceShape, VariableShape};

use crate::common::Line;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Node kind tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// `[return_type, name, "(", parameters, ")", body]`
    FunctionDeclaration,
    /// `[type, name, ...initializer]` at top level
    GlobalVariableDeclaration,
    /// Same shape as a global declaration, inside a function body
    VariableDeclaration,
    /// `[name]`, or `[name, argument_list]` when it is really a call
    VariableReference,
    /// `[name, ...arguments]`
    FunctionCall,
    /// `[type, name]`, a child of a function's parameter list
    Parameter,
    /// Marks the reference before it as a call
    ArgumentList,
    /// Any kind that only needs its children visited
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::FunctionDeclaration => "function_declaration",
            NodeKind::GlobalVariableDeclaration => "global_variable_declaration",
            NodeKind::VariableDeclaration => "variable_declaration",
            NodeKind::VariableReference => "variable_reference",
            NodeKind::FunctionCall => "function_call",
            NodeKind::Parameter => "parameter",
            NodeKind::ArgumentList => "argument_list",
            NodeKind::Other(tag) => tag,
        }
    }
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        match tag {
            "function_declaration" => NodeKind::FunctionDeclaration,
            "global_variable_declaration" => NodeKind::GlobalVariableDeclaration,
            "variable_declaration" => NodeKind::VariableDeclaration,
            "variable_reference" => NodeKind::VariableReference,
            "function_call" => NodeKind::FunctionCall,
            "parameter" => NodeKind::Parameter,
            "argument_list" => NodeKind::ArgumentList,
            other => NodeKind::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        NodeKind::from(tag.as_str())
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal value attached to a leaf node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A syntax tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Literal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: impl Into<NodeKind>) -> Self {
        Self {
            kind: kind.into(),
            line: None,
            value: None,
            children: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: Option<Line>) -> Self {
        self.line = line;
        self
    }

    pub fn with_value(mut self, value: Literal) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    /// The node's value when it is a string literal (identifiers, type names)
    pub fn text(&self) -> Option<&str> {
        self.value.as_ref().and_then(Literal::as_str)
    }

    /// Parse a tree serialized as JSON.
    ///
    /// Parse trees nest one object and one array per level, so the default
    /// recursion limit is lifted and the stack grows on demand instead.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let node = Node::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(node)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
