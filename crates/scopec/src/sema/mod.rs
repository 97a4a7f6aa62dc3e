//! Semantic analysis module
//!
//! This module builds the symbol table and resolves references.

mod report;
mod resolver;
mod scope;
mod symbol;

pub use report::{ReportRow, SymbolReport};
pub use resolver::{Analysis, Resolver, ResolverConfig};
pub use scope::{ActiveScope, Scope, SymbolTable, GLOBAL_SCOPE};
pub use symbol::{FunctionSymbol, ScopeId, Symbol, SymbolId, VariableSymbol};
