//! Symbols stored in the symbol table

use crate::common::{Line, SymbolCategory};

/// Index of a scope inside the table; the global scope is always 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);

    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a symbol, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A declared variable (global, local, or parameter)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSymbol {
    pub id: SymbolId,
    pub name: String,
    pub ty: String,
    pub scope: ScopeId,
    pub line: Option<Line>,
    pub is_parameter: bool,
}

/// A declared function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSymbol {
    pub id: SymbolId,
    pub name: String,
    pub return_type: String,
    /// `(name, type)` in declaration order
    pub params: Vec<(String, String)>,
    pub line: Option<Line>,
    /// The function's own scope, holding its parameters and locals
    pub scope: ScopeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Variable(VariableSymbol),
    Function(FunctionSymbol),
}

impl Symbol {
    pub fn id(&self) -> SymbolId {
        match self {
            Symbol::Variable(v) => v.id,
            Symbol::Function(f) => f.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(v) => &v.name,
            Symbol::Function(f) => &f.name,
        }
    }

    pub fn category(&self) -> SymbolCategory {
        match self {
            Symbol::Variable(_) => SymbolCategory::Variable,
            Symbol::Function(_) => SymbolCategory::Function,
        }
    }

    /// Declared type for variables, return type for functions
    pub fn ty(&self) -> &str {
        match self {
            Symbol::Variable(v) => &v.ty,
            Symbol::Function(f) => &f.return_type,
        }
    }

    pub fn line(&self) -> Option<Line> {
        match self {
            Symbol::Variable(v) => v.line,
            Symbol::Function(f) => f.line,
        }
    }

    /// Scope the symbol is declared in; functions always live in the global namespace
    pub fn owner(&self) -> ScopeId {
        match self {
            Symbol::Variable(v) => v.scope,
            Symbol::Function(_) => ScopeId::GLOBAL,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableSymbol> {
        match self {
            Symbol::Variable(v) => Some(v),
            Symbol::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionSymbol> {
        match self {
            Symbol::Function(f) => Some(f),
            Symbol::Variable(_) => None,
        }
    }
}
