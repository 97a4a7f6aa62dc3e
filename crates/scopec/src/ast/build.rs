//! Shorthand constructors producing trees in the parser's layout
//!
//! Lines are plain `u32`s here; 0 means "no line".

use super::{Literal, Node, NodeKind};
use crate::common::Line;

/// Leaf node carrying a string value
pub fn token(kind: &str, text: &str) -> Node {
    Node::new(kind).with_value(Literal::Str(text.to_string()))
}

pub fn ident(name: &str) -> Node {
    token("identifier", name)
}

pub fn punct(text: &str) -> Node {
    token("punctuation", text)
}

/// `type_specifier` wrapping the type name token
pub fn type_spec(ty: &str) -> Node {
    Node::new("type_specifier").with_children(vec![token("type", ty)])
}

pub fn param(ty: &str, name: &str) -> Node {
    Node::new(NodeKind::Parameter).with_children(vec![type_spec(ty), ident(name)])
}

pub fn function(line: u32, return_type: &str, name: &str, params: Vec<Node>, body: Vec<Node>) -> Node {
    Node::new(NodeKind::FunctionDeclaration)
        .with_line(Line::new(line))
        .with_children(vec![
            type_spec(return_type),
            ident(name),
            punct("("),
            Node::new("parameters").with_children(params),
            punct(")"),
            block(body),
        ])
}

pub fn global_var(line: u32, ty: &str, name: &str) -> Node {
    declaration(NodeKind::GlobalVariableDeclaration, line, ty, name)
}

pub fn local_var(line: u32, ty: &str, name: &str) -> Node {
    declaration(NodeKind::VariableDeclaration, line, ty, name)
}

fn declaration(kind: NodeKind, line: u32, ty: &str, name: &str) -> Node {
    Node::new(kind)
        .with_line(Line::new(line))
        .with_children(vec![type_spec(ty), ident(name)])
}

pub fn var_ref(line: u32, name: &str) -> Node {
    Node::new(NodeKind::VariableReference)
        .with_line(Line::new(line))
        .with_children(vec![ident(name)])
}

pub fn call(line: u32, name: &str, args: Vec<Node>) -> Node {
    let mut children = vec![ident(name)];
    children.extend(args);
    Node::new(NodeKind::FunctionCall)
        .with_line(Line::new(line))
        .with_children(children)
}

/// Generic pass-through node with the given kind
pub fn node(kind: &str, line: u32, children: Vec<Node>) -> Node {
    Node::new(kind).with_line(Line::new(line)).with_children(children)
}

pub fn block(items: Vec<Node>) -> Node {
    Node::new("block").with_children(items)
}

pub fn program(items: Vec<Node>) -> Node {
    Node::new("program").with_children(items)
}
