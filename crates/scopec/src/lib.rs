//! Scope Checker - symbol table construction and name resolution
//!
//! This library is the semantic phase of a small C-like compiler front end.
//! It takes the syntax tree produced by the parser, registers every global,
//! function, parameter and local declaration, and checks that each variable
//! reference and function call resolves to an earlier declaration.
//!
//! ## Architecture
//!
//! - **AST** (`ast/`): the parser's generic tree and typed views over it
//! - **Sema** (`sema/`): symbol table, resolver, and symbol report
//! - **Common** (`common/`): error taxonomy, lines, diagnostic rendering
//! - **Driver** (`driver/`): loading, analysis and output for the CLI

pub mod ast;
pub mod common;
pub mod driver;
pub mod sema;

// Re-exports for convenience
pub use ast::{Node, NodeKind};
pub use common::{DiagnosticReporter, Line, SemanticError, SemanticResult, SymbolCategory};
pub use driver::{Pipeline, ReportFormat};
pub use sema::{Analysis, Resolver, ResolverConfig, SymbolReport, SymbolTable};
