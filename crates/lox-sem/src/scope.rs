//! The resolver's scope stack (`spec.md` S4.3).
//!
//! Each entry is one block/function/class scope's `name -> defined` table;
//! `false` means "declared but its initializer hasn't finished resolving
//! yet" (used to catch `var a = a;`). The global scope is never pushed here
//! - names that fall off the bottom of this stack resolve dynamically at
//! the global environment at runtime.

use lox_util::FxHashMap;
use lox_util::Symbol;

#[derive(Default)]
pub struct ScopeStack {
    scopes: Vec<FxHashMap<Symbol, bool>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn push(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Mark `name` as declared-but-not-yet-defined in the innermost scope.
    /// Returns `true` if `name` was already present in that scope (the
    /// caller reports `DuplicateLocalDeclaration` in that case).
    pub fn declare(&mut self, name: Symbol) -> bool {
        match self.scopes.last_mut() {
            Some(scope) => {
                let duplicate = scope.contains_key(&name);
                scope.insert(name, false);
                duplicate
            }
            None => false,
        }
    }

    /// Mark `name` as fully defined in the innermost scope.
    pub fn define(&mut self, name: Symbol) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, true);
        }
    }

    /// `Some(false)` if `name` is declared-but-not-defined in the innermost
    /// scope (a read inside its own initializer); `None` if absent there.
    pub fn innermost_status(&self, name: Symbol) -> Option<bool> {
        self.scopes.last().and_then(|scope| scope.get(&name).copied())
    }

    /// Distance from the innermost scope to the nearest enclosing scope that
    /// binds `name` (0 = innermost), or `None` if no local scope binds it
    /// (spec: resolve at the global environment in that case).
    pub fn resolve_distance(&self, name: Symbol) -> Option<usize> {
        self.scopes
            .iter()
            .rev()
            .position(|scope| scope.contains_key(&name))
    }
}
