//! Symbol table and scope management
//!
//! There is one global scope plus one flat scope per declared function.
//! Functions share a single global namespace that is separate from
//! variables. Scopes are never discarded: leaving a function only changes
//! which scope is active, so the table can be queried after resolution.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::common::{Line, SemanticError, SemanticResult, SymbolCategory};
use super::symbol::{FunctionSymbol, ScopeId, Symbol, SymbolId, VariableSymbol};

/// Name of the global scope in diagnostics and reports
pub const GLOBAL_SCOPE: &str = "global";

/// A scope containing variable symbols
#[derive(Debug, Clone)]
pub struct Scope {
    id: ScopeId,
    name: String,
    symbols: HashMap<String, SymbolId>,
}

impl Scope {
    fn new(id: ScopeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            symbols: HashMap::new(),
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// `global`, or the name of the owning function
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a name in this scope only
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Registry of every declared variable and function
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    functions: HashMap<String, SymbolId>,
    scopes: Vec<Scope>,
    /// Active scopes; the global scope is always at the bottom
    stack: Vec<ScopeId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            functions: HashMap::new(),
            scopes: vec![Scope::new(ScopeId::GLOBAL, GLOBAL_SCOPE)],
            stack: vec![ScopeId::GLOBAL],
        }
    }

    /// Declare a variable in the active scope
    pub fn declare_variable(&mut self, name: &str, ty: &str, line: Option<Line>) -> SemanticResult<SymbolId> {
        let scope = self.current_scope();
        self.insert_variable(scope, name, ty, line, false)
    }

    /// Declare a function and its parameters.
    ///
    /// A duplicate function name registers nothing. A duplicate parameter name
    /// leaves the function registered with the parameters before it.
    pub fn declare_function(
        &mut self,
        name: &str,
        return_type: &str,
        params: Vec<(String, String)>,
        line: Option<Line>,
    ) -> SemanticResult<SymbolId> {
        if let Some(existing) = self.functions.get(name) {
            return Err(SemanticError::duplicate(
                SymbolCategory::Function,
                name,
                GLOBAL_SCOPE,
                line,
                self.symbols[existing.index()].line(),
            ));
        }

        let scope = ScopeId::from_raw(self.scopes.len() as u32);
        self.scopes.push(Scope::new(scope, name));

        let id = self.next_symbol_id();
        self.symbols.push(Symbol::Function(FunctionSymbol {
            id,
            name: name.to_string(),
            return_type: return_type.to_string(),
            params: params.clone(),
            line,
            scope,
        }));
        self.functions.insert(name.to_string(), id);
        tracing::trace!(function = name, params = params.len(), "declared function");

        for (param_name, param_ty) in &params {
            self.insert_variable(scope, param_name, param_ty, line, true)?;
        }

        Ok(id)
    }

    /// Make a function's scope active. Returns false, and does nothing,
    /// when no such function is declared.
    pub fn enter_scope(&mut self, function: &str) -> bool {
        let Some(scope) = self.lookup_function(function).map(|f| f.scope) else {
            return false;
        };
        self.stack.push(scope);
        true
    }

    /// Leave the active scope. The global scope is never left.
    pub fn exit_scope(&mut self) -> Option<ScopeId> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Enter a function's scope for as long as the returned guard lives
    pub fn scoped(&mut self, function: &str) -> ActiveScope<'_> {
        let depth = self.stack.len();
        let entered = self.enter_scope(function);
        ActiveScope {
            table: self,
            depth,
            entered,
        }
    }

    /// Look up a variable in the active scope, then in the global scope
    pub fn lookup_variable(&self, name: &str) -> Option<&VariableSymbol> {
        let current = self.current_scope();
        self.variable_in(current, name).or_else(|| {
            if current == ScopeId::GLOBAL {
                None
            } else {
                self.variable_in(ScopeId::GLOBAL, name)
            }
        })
    }

    /// Look up a variable declared directly in the named scope
    pub fn lookup_variable_in(&self, scope: &str, name: &str) -> Option<&VariableSymbol> {
        let scope = self.scope_named(scope)?;
        self.variable_in(scope.id(), name)
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FunctionSymbol> {
        self.functions
            .get(name)
            .and_then(|id| self.symbols[id.index()].as_function())
    }

    pub fn current_scope(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId::GLOBAL)
    }

    pub fn current_scope_name(&self) -> &str {
        self.scopes[self.current_scope().index()].name()
    }

    /// Number of active scopes, global included
    pub fn scope_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.index())
    }

    /// `global`, or the scope owned by the named function
    pub fn scope_named(&self, name: &str) -> Option<&Scope> {
        if name == GLOBAL_SCOPE {
            return self.scope(ScopeId::GLOBAL);
        }
        self.lookup_function(name).and_then(|f| self.scope(f.scope))
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    /// All symbols in declaration order
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn variables(&self) -> impl Iterator<Item = &VariableSymbol> {
        self.symbols.iter().filter_map(Symbol::as_variable)
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionSymbol> {
        self.symbols.iter().filter_map(Symbol::as_function)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn variable_in(&self, scope: ScopeId, name: &str) -> Option<&VariableSymbol> {
        self.scope(scope)?
            .lookup(name)
            .and_then(|id| self.symbols[id.index()].as_variable())
    }

    fn insert_variable(
        &mut self,
        scope: ScopeId,
        name: &str,
        ty: &str,
        line: Option<Line>,
        is_parameter: bool,
    ) -> SemanticResult<SymbolId> {
        let owner = &self.scopes[scope.index()];
        if let Some(existing) = owner.lookup(name) {
            return Err(SemanticError::duplicate(
                SymbolCategory::Variable,
                name,
                owner.name(),
                line,
                self.symbols[existing.index()].line(),
            ));
        }

        let id = self.next_symbol_id();
        self.symbols.push(Symbol::Variable(VariableSymbol {
            id,
            name: name.to_string(),
            ty: ty.to_string(),
            scope,
            line,
            is_parameter,
        }));
        self.scopes[scope.index()].symbols.insert(name.to_string(), id);
        tracing::trace!(variable = name, scope = self.scopes[scope.index()].name(), "declared variable");
        Ok(id)
    }

    fn next_symbol_id(&self) -> SymbolId {
        SymbolId::from_raw(self.symbols.len() as u32)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A function scope kept active until the guard is dropped.
///
/// Dropping the guard restores the scope stack to the depth it had before
/// entering, even if the body handler returned early.
pub struct ActiveScope<'t> {
    table: &'t mut SymbolTable,
    depth: usize,
    entered: bool,
}

impl ActiveScope<'_> {
    /// False when the function was not declared and nothing was pushed
    pub fn entered(&self) -> bool {
        self.entered
    }
}

impl Deref for ActiveScope<'_> {
    type Target = SymbolTable;

    fn deref(&self) -> &SymbolTable {
        self.table
    }
}

impl DerefMut for ActiveScope<'_> {
    fn deref_mut(&mut self) -> &mut SymbolTable {
        self.table
    }
}

impl Drop for ActiveScope<'_> {
    fn drop(&mut self) {
        self.table.stack.truncate(self.depth);
    }
}
