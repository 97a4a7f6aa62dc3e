//! Typed views over declaration and reference nodes
//!
//! The parser places the interesting parts of each construct at fixed child
//! positions. These views pull them out once, and turn any deviation into a
//! `MalformedNode` error instead of an out-of-bounds access.

use super::{Node, NodeKind};
use crate::common::{Line, SemanticError, SemanticResult};

const FN_RETURN_TYPE: usize = 0;
const FN_NAME: usize = 1;
const FN_PARAMS: usize = 3;
const FN_BODY: usize = 5;

const DECL_TYPE: usize = 0;
const DECL_NAME: usize = 1;

const REF_NAME: usize = 0;

/// A function declaration
#[derive(Debug, Clone)]
pub struct FunctionShape<'a> {
    pub name: &'a str,
    pub return_type: &'a str,
    pub params: Vec<ParamShape<'a>>,
    pub body: &'a Node,
    pub line: Option<Line>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamShape<'a> {
    pub name: &'a str,
    pub ty: &'a str,
}

/// A variable declaration, global or local
#[derive(Debug, Clone)]
pub struct VariableShape<'a> {
    pub name: &'a str,
    pub ty: &'a str,
    pub line: Option<Line>,
    /// Children after the name, e.g. an initializer expression
    pub initializer: &'a [Node],
}

/// A variable reference or function call
#[derive(Debug, Clone)]
pub struct ReferenceShape<'a> {
    pub name: &'a str,
    /// Set when a call-argument marker follows the name
    pub is_call: bool,
    pub line: Option<Line>,
    /// Children after the name (call arguments)
    pub rest: &'a [Node],
}

impl<'a> FunctionShape<'a> {
    pub fn from_node(node: &'a Node) -> SemanticResult<Self> {
        let return_type = type_name(node, FN_RETURN_TYPE, "return type")?;
        let name_node = child(node, FN_NAME, "function name")?;
        let name = identifier(node, name_node, "function name")?;
        let params_node = child(node, FN_PARAMS, "parameter list")?;
        let body = child(node, FN_BODY, "body")?;

        let params = params_node
            .children
            .iter()
            .filter(|p| p.kind == NodeKind::Parameter)
            .map(|p| {
                let ty = type_name(p, DECL_TYPE, "parameter type")?;
                let name = identifier(p, child(p, DECL_NAME, "parameter name")?, "parameter name")?;
                Ok::<_, SemanticError>(ParamShape { name, ty })
            })
            .collect::<SemanticResult<Vec<_>>>()?;

        Ok(Self {
            name,
            return_type,
            params,
            body,
            line: node.line.or(name_node.line),
        })
    }
}

impl<'a> VariableShape<'a> {
    pub fn from_node(node: &'a Node) -> SemanticResult<Self> {
        let ty = type_name(node, DECL_TYPE, "variable type")?;
        let name_node = child(node, DECL_NAME, "variable name")?;
        let name = identifier(node, name_node, "variable name")?;

        Ok(Self {
            name,
            ty,
            line: node.line.or(name_node.line),
            initializer: &node.children[DECL_NAME + 1..],
        })
    }
}

impl<'a> ReferenceShape<'a> {
    pub fn from_node(node: &'a Node) -> SemanticResult<Self> {
        let name_node = child(node, REF_NAME, "referenced name")?;
        let name = identifier(node, name_node, "referenced name")?;
        let rest = &node.children[REF_NAME + 1..];
        let is_call = rest.first().is_some_and(is_call_marker);

        Ok(Self {
            name,
            is_call,
            line: node.line.or(name_node.line),
            rest,
        })
    }
}

/// An argument list, or a bare `(` token, turns a reference into a call
fn is_call_marker(node: &Node) -> bool {
    node.kind == NodeKind::ArgumentList || node.text() == Some("(")
}

fn child<'a>(node: &'a Node, index: usize, role: &str) -> SemanticResult<&'a Node> {
    node.child(index).ok_or_else(|| {
        SemanticError::malformed(
            node.kind.as_str(),
            format!("missing {role} at child {index}"),
            node.line,
        )
    })
}

fn identifier<'a>(owner: &Node, node: &'a Node, role: &str) -> SemanticResult<&'a str> {
    node.text().ok_or_else(|| {
        SemanticError::malformed(
            owner.kind.as_str(),
            format!("{role} `{}` carries no identifier", node.kind),
            owner.line.or(node.line),
        )
    })
}

/// Type names come either directly on the node or on its first child
/// (`type_specifier -> int`).
fn type_name<'a>(owner: &'a Node, index: usize, role: &str) -> SemanticResult<&'a str> {
    let node = child(owner, index, role)?;
    node.text()
        .or_else(|| node.child(0).and_then(Node::text))
        .ok_or_else(|| {
            SemanticError::malformed(
                owner.kind.as_str(),
                format!("{role} `{}` carries no type name", node.kind),
                owner.line.or(node.line),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_function_shape() {
        let node = build::function(
            3,
            "int",
            "add",
            vec![build::param("int", "a"), build::param("float", "b")],
            vec![],
        );
        let shape = FunctionShape::from_node(&node).unwrap();

        assert_eq!(shape.name, "add");
        assert_eq!(shape.return_type, "int");
        assert_eq!(shape.line, Line::new(3));
        assert_eq!(
            shape.params,
            vec![ParamShape { name: "a", ty: "int" }, ParamShape { name: "b", ty: "float" }]
        );
        assert!(shape.body.children.is_empty());
    }

    #[test]
    fn test_parameter_list_skips_separators() {
        let mut node = build::function(1, "void", "f", vec![build::param("int", "a"), build::param("int", "b")], vec![]);
        node.children[3].children.insert(1, build::punct(","));

        let shape = FunctionShape::from_node(&node).unwrap();
        assert_eq!(shape.params.len(), 2);
    }

    #[test]
    fn test_function_without_body_is_malformed() {
        let mut node = build::function(7, "int", "f", vec![], vec![]);
        node.children.truncate(5);

        let err = FunctionShape::from_node(&node).unwrap_err();
        assert!(err.is_internal());
        assert_eq!(err.line(), Line::new(7));
        assert_eq!(err.message(), "malformed `function_declaration` node: missing body at child 5");
    }

    #[test]
    fn test_type_name_directly_on_node() {
        let node = Node::new(NodeKind::GlobalVariableDeclaration)
            .with_line(Line::new(2))
            .with_children(vec![build::token("type", "char"), build::ident("c")]);

        let shape = VariableShape::from_node(&node).unwrap();
        assert_eq!(shape.ty, "char");
        assert_eq!(shape.name, "c");
        assert!(shape.initializer.is_empty());
    }

    #[test]
    fn test_line_taken_from_name_child() {
        let node = Node::new(NodeKind::VariableDeclaration)
            .with_children(vec![build::type_spec("int"), build::ident("x").with_line(Line::new(7))]);
        assert_eq!(VariableShape::from_node(&node).unwrap().line, Line::new(7));

        let lined = node.with_line(Line::new(3));
        assert_eq!(VariableShape::from_node(&lined).unwrap().line, Line::new(3));
    }

    #[test]
    fn test_numeric_name_is_malformed() {
        let node = Node::new(NodeKind::GlobalVariableDeclaration).with_children(vec![
            build::type_spec("int"),
            Node::new("number").with_value(crate::ast::Literal::Int(5)),
        ]);

        let err = VariableShape::from_node(&node).unwrap_err();
        assert!(err.message().contains("carries no identifier"));
    }

    #[test]
    fn test_reference_call_marker() {
        let plain = build::var_ref(4, "x");
        let shape = ReferenceShape::from_node(&plain).unwrap();
        assert!(!shape.is_call);

        let with_args = Node::new(NodeKind::VariableReference)
            .with_children(vec![build::ident("f"), Node::new(NodeKind::ArgumentList)]);
        assert!(ReferenceShape::from_node(&with_args).unwrap().is_call);

        let with_paren = Node::new(NodeKind::VariableReference)
            .with_children(vec![build::ident("f"), build::punct("("), build::punct(")")]);
        let shape = ReferenceShape::from_node(&with_paren).unwrap();
        assert!(shape.is_call);
        assert_eq!(shape.rest.len(), 2);
    }
}
