//! Symbol table
//!
//! Scoped storage of declared names. Scopes are tracked by depth level:
//! entering a scope (function body, loop body, if block) bumps the level,
//! exiting clears that level's symbols and drops back. Lookup searches from
//! the current scope up to the global scope (level 0).

use std::collections::BTreeMap;

use log::trace;

use crate::types::SemType;
use crate::utils::Span;

/// What a symbol is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Var,
    Param,
    Func,
    Lambda,
}

/// A declared name
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub ty: SemType,
    pub kind: SymbolKind,
    pub scope: usize,
    /// Declared arity for callables. `None` means unknown (a function value
    /// that came out of another call), which skips call validation.
    pub num_params: Option<usize>,
    pub param_types: Vec<SemType>,
    pub return_type: Option<SemType>,
    pub span: Span,
}

impl Symbol {
    /// A plain variable
    pub fn var(name: impl Into<String>, ty: SemType, span: Span) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: SymbolKind::Var,
            scope: 0,
            num_params: Some(0),
            param_types: Vec::new(),
            return_type: None,
            span,
        }
    }

    /// A function with a known signature
    pub fn func(
        name: impl Into<String>,
        param_types: Vec<SemType>,
        return_type: SemType,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            ty: SemType::Function,
            kind: SymbolKind::Func,
            scope: 0,
            num_params: Some(param_types.len()),
            param_types,
            return_type: Some(return_type),
            span,
        }
    }

    /// Check if this symbol can be called
    pub fn is_callable(&self) -> bool {
        self.kind == SymbolKind::Func || self.ty == SemType::Function
    }
}

/// A hierarchical symbol table supporting nested scopes.
///
/// Scope maps are ordered so stem scans visit names deterministically.
pub struct SymbolTable {
    /// Scope maps indexed by level; level 0 is global and never popped
    scopes: Vec<BTreeMap<String, Symbol>>,
    current: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![BTreeMap::new()],
            current: 0,
        }
    }

    /// The current scope level
    pub fn current_scope(&self) -> usize {
        self.current
    }

    /// Enter a new nested scope. Returns the new scope level.
    pub fn enter_scope(&mut self) -> usize {
        self.current += 1;
        if self.current == self.scopes.len() {
            self.scopes.push(BTreeMap::new());
        }
        trace!("enter scope {}", self.current);
        self.current
    }

    /// Exit the current scope, clearing its symbols. Returns the new
    /// (outer) scope level.
    ///
    /// Panics if already at the global scope: that is a checker bug, not a
    /// user-facing diagnostic.
    pub fn exit_scope(&mut self) -> usize {
        assert!(self.current > 0, "cannot exit the global scope");
        self.scopes[self.current].clear();
        self.current -= 1;
        trace!("exit to scope {}", self.current);
        self.current
    }

    /// Add a symbol to the current scope. Errs with a message if the exact
    /// name already exists at this level (this check is exact-name, not
    /// stem-based).
    pub fn declare(&mut self, mut symbol: Symbol) -> Result<(), String> {
        let scope = &mut self.scopes[self.current];
        if scope.contains_key(&symbol.name) {
            return Err(format!(
                "Variable name already exists in this scope: '{}'",
                symbol.name
            ));
        }
        symbol.scope = self.current;
        scope.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Look up a symbol by name, searching from the current scope up to the
    /// global scope. Inner scopes shadow outer ones.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        for level in (0..=self.current).rev() {
            if let Some(sym) = self.scopes[level].get(name) {
                return Some(sym);
            }
        }
        None
    }

    /// Look up a symbol only in the current scope
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.scopes[self.current].get(name)
    }

    /// Visit every visible symbol from the innermost scope outward,
    /// skipping outer-scope entries shadowed by an exact-name match further
    /// in. Used only for stem scanning.
    pub fn visit_visible<'a>(&'a self, mut f: impl FnMut(&'a Symbol) -> bool) {
        let mut seen: Vec<&str> = Vec::new();
        for level in (0..=self.current).rev() {
            for (name, sym) in &self.scopes[level] {
                if seen.contains(&name.as_str()) {
                    continue;
                }
                seen.push(name.as_str());
                if f(sym) {
                    return;
                }
            }
        }
    }

    /// Names declared in the current scope, for retirement scans
    pub fn local_names(&self) -> Vec<String> {
        self.scopes[self.current].keys().cloned().collect()
    }

    /// Remove a symbol from the current scope. Returns true if removed.
    /// Used solely by stem retirement during declaration.
    pub fn remove_local(&mut self, name: &str) -> bool {
        self.scopes[self.current].remove(name).is_some()
    }

    /// Read-only view of the global scope, for code generators needing
    /// function signatures.
    pub fn globals(&self) -> &BTreeMap<String, Symbol> {
        &self.scopes[0]
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
