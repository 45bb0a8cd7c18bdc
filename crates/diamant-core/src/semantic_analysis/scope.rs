// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Scope tracking for semantic analysis.
//!
//! A [`Scope`] maps names to what they denote: an ordinary variable, or a
//! function definition carrying its closure environment. Scopes nest in a
//! [`ScopeStack`]; lookup traverses innermost-outward.
//!
//! Entries keep insertion order so the passes that iterate a closing scope
//! (liveness marking, unused-variable detection) are deterministic. Scopes
//! are small, so a linear scan beats hashing here.

use ecow::EcoString;

use super::VarSet;

/// What a scope entry denotes.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeValue {
    /// An ordinary bound variable.
    Variable,
    /// A function definition; carries the function's closure environment
    /// (empty until the definition has been annotated).
    Function(VarSet),
}

/// A single scope level: names in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    entries: Vec<(EcoString, ScopeValue)>,
}

impl Scope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines or redefines a name in this scope.
    pub fn define(&mut self, name: impl Into<EcoString>, value: ScopeValue) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Looks up a name in this scope only.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ScopeValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns `true` if this scope defines `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &EcoString> {
        self.entries.iter().map(|(n, _)| n)
    }

    /// Returns `true` if the scope has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A stack of nested scopes, innermost last.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    /// Creates an empty scope stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a new nested scope.
    pub fn push(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    /// Exits the current scope, returning it.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty; pushes and pops are always paired by
    /// the annotator.
    pub fn pop(&mut self) -> Scope {
        self.scopes.pop().expect("scope stack is never popped empty")
    }

    /// The nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Defines a name in the innermost scope.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn define(&mut self, name: impl Into<EcoString>, value: ScopeValue) {
        self.scopes
            .last_mut()
            .expect("a scope is pushed before defining names")
            .define(name, value);
    }

    /// Looks up a name, searching innermost to outermost.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&ScopeValue> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic_analysis::Action;

    #[test]
    fn define_and_lookup() {
        let mut scopes = ScopeStack::new();
        scopes.push(Scope::new());
        scopes.define("x", ScopeValue::Variable);
        assert_eq!(scopes.lookup("x"), Some(&ScopeValue::Variable));
        assert_eq!(scopes.lookup("y"), None);
    }

    #[test]
    fn lookup_searches_outer_scopes() {
        let mut scopes = ScopeStack::new();
        scopes.push(Scope::new());
        scopes.define("outer", ScopeValue::Variable);
        scopes.push(Scope::new());
        scopes.define("inner", ScopeValue::Variable);

        assert!(scopes.lookup("outer").is_some());
        assert!(scopes.lookup("inner").is_some());
    }

    #[test]
    fn innermost_entry_shadows() {
        let mut scopes = ScopeStack::new();
        scopes.push(Scope::new());
        scopes.define("f", ScopeValue::Variable);
        scopes.push(Scope::new());
        scopes.define("f", ScopeValue::Function(VarSet::new()));

        assert!(matches!(scopes.lookup("f"), Some(ScopeValue::Function(_))));
        scopes.pop();
        assert_eq!(scopes.lookup("f"), Some(&ScopeValue::Variable));
    }

    #[test]
    fn redefining_updates_in_place() {
        let mut scope = Scope::new();
        scope.define("f", ScopeValue::Function(VarSet::new()));
        scope.define("g", ScopeValue::Variable);
        scope.define("f", ScopeValue::Function(VarSet::singleton("y", Action::Access)));

        // Insertion order is preserved across redefinition.
        let names: Vec<&str> = scope.names().map(EcoString::as_str).collect();
        assert_eq!(names, vec!["f", "g"]);
        match scope.get("f") {
            Some(ScopeValue::Function(env)) => assert!(env.contains("y")),
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[test]
    fn pop_returns_the_scope_with_its_names() {
        let mut scopes = ScopeStack::new();
        scopes.push(Scope::new());
        scopes.define("a", ScopeValue::Variable);
        scopes.define("b", ScopeValue::Variable);
        let popped = scopes.pop();
        let names: Vec<&str> = popped.names().map(EcoString::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(scopes.depth(), 0);
    }
}
