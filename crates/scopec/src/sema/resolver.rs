//! Resolver - builds the symbol table and checks references
//!
//! One pre-order walk over the tree. Declarations are registered the moment
//! they are reached, so a reference resolves only against what precedes it.
//! Errors never stop the walk: each is recorded and the walker moves on to
//! the next sibling.

use crate::ast::{FunctionShape, Node, NodeKind, ReferenceShape, VariableShape};
use crate::common::{Line, SemanticError, SymbolCategory};
use super::report::SymbolReport;
use super::scope::SymbolTable;

/// Remaining stack below which the walk grows the stack
const RED_ZONE: usize = 100 * 1024;
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Analysis policy
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverConfig {
    /// Stop the whole walk at the first malformed node
    pub abort_on_malformed: bool,
}

/// Result of resolving one tree
#[derive(Debug, Clone)]
pub struct Analysis {
    pub table: SymbolTable,
    /// In traversal order
    pub diagnostics: Vec<SemanticError>,
}

impl Analysis {
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_internal_errors(&self) -> bool {
        self.diagnostics.iter().any(SemanticError::is_internal)
    }

    pub fn report(&self) -> SymbolReport {
        SymbolReport::from_table(&self.table)
    }
}

/// Semantic resolver
pub struct Resolver {
    config: ResolverConfig,
    diagnostics: Vec<SemanticError>,
    halted: bool,
    /// Line of the function whose body is being walked
    enclosing_line: Option<Line>,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            diagnostics: Vec::new(),
            halted: false,
            enclosing_line: None,
        }
    }

    /// Resolve a tree with the default configuration
    pub fn analyze(root: &Node) -> Analysis {
        Self::new(ResolverConfig::default()).run(root)
    }

    pub fn run(mut self, root: &Node) -> Analysis {
        let mut table = SymbolTable::new();
        self.walk(root, &mut table);
        debug_assert_eq!(table.scope_depth(), 1, "scope stack left unbalanced");

        tracing::debug!(
            symbols = table.len(),
            diagnostics = self.diagnostics.len(),
            "resolution complete"
        );
        Analysis {
            table,
            diagnostics: self.diagnostics,
        }
    }

    fn walk(&mut self, node: &Node, table: &mut SymbolTable) {
        if self.halted {
            return;
        }
        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || self.dispatch(node, table));
    }

    fn dispatch(&mut self, node: &Node, table: &mut SymbolTable) {
        match &node.kind {
            NodeKind::FunctionDeclaration => self.function_declaration(node, table),
            NodeKind::GlobalVariableDeclaration | NodeKind::VariableDeclaration => {
                self.variable_declaration(node, table);
            }
            NodeKind::VariableReference => self.variable_reference(node, table),
            NodeKind::FunctionCall => self.function_call(node, table),
            NodeKind::Parameter | NodeKind::ArgumentList | NodeKind::Other(_) => {
                self.walk_all(&node.children, table);
            }
        }
    }

    fn walk_all(&mut self, nodes: &[Node], table: &mut SymbolTable) {
        for node in nodes {
            self.walk(node, table);
        }
    }

    fn function_declaration(&mut self, node: &Node, table: &mut SymbolTable) {
        let shape = match FunctionShape::from_node(node) {
            Ok(shape) => shape,
            Err(e) => return self.record(e),
        };

        let params = shape
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.ty.to_string()))
            .collect();

        match table.declare_function(shape.name, shape.return_type, params, shape.line) {
            Ok(_) => {}
            // A second `foo` is skipped entirely, body included
            Err(e) if e.category() == Some(SymbolCategory::Function) => return self.record(e),
            // Duplicate parameter: the function exists, keep checking its body
            Err(e) => self.record(e),
        }

        tracing::trace!(function = shape.name, "entering function scope");
        let outer = std::mem::replace(&mut self.enclosing_line, shape.line);
        let mut scope = table.scoped(shape.name);
        self.walk(shape.body, &mut scope);
        self.enclosing_line = outer;
    }

    fn variable_declaration(&mut self, node: &Node, table: &mut SymbolTable) {
        let shape = match VariableShape::from_node(node) {
            Ok(shape) => shape,
            Err(e) => return self.record(e),
        };

        let line = shape.line.or(self.enclosing_line);
        if let Err(e) = table.declare_variable(shape.name, shape.ty, line) {
            self.record(e);
        }
        self.walk_all(shape.initializer, table);
    }

    fn variable_reference(&mut self, node: &Node, table: &mut SymbolTable) {
        let shape = match ReferenceShape::from_node(node) {
            Ok(shape) => shape,
            Err(e) => return self.record(e),
        };

        if shape.is_call {
            self.check_call(&shape, table);
        } else if table.lookup_variable(shape.name).is_none() {
            self.record(SemanticError::undefined(
                SymbolCategory::Variable,
                shape.name,
                table.current_scope_name(),
                shape.line,
            ));
        }
        self.walk_all(shape.rest, table);
    }

    fn function_call(&mut self, node: &Node, table: &mut SymbolTable) {
        let shape = match ReferenceShape::from_node(node) {
            Ok(shape) => shape,
            Err(e) => return self.record(e),
        };

        self.check_call(&shape, table);
        self.walk_all(shape.rest, table);
    }

    fn check_call(&mut self, shape: &ReferenceShape<'_>, table: &SymbolTable) {
        if table.lookup_function(shape.name).is_none() {
            self.record(SemanticError::undefined(
                SymbolCategory::Function,
                shape.name,
                table.current_scope_name(),
                shape.line,
            ));
        }
    }

    fn record(&mut self, error: SemanticError) {
        tracing::debug!(code = error.code(), line = ?error.line(), "{error}");
        if error.is_internal() && self.config.abort_on_malformed {
            self.halted = true;
        }
        self.diagnostics.push(error);
    }
}
