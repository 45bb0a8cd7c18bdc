// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Variable sets and access actions.
//!
//! A [`VarSet`] maps variable names to the role they play within a subtree.
//! During annotation every container node receives the union of its
//! children's varsets; when a scope closes, the closing construct subtracts
//! its locally bound names before exposing the set upward.
//!
//! Varset values are only ever [`Action::Bind`] or [`Action::Access`]; the
//! refined tags (`first`, `last`, `only`, `discard`) are assigned to `var`
//! nodes and closure environments by the liveness passes.

use std::collections::BTreeMap;

use ecow::EcoString;

/// How a variable occurrence relates to reference-count insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// The variable is bound at this pattern position.
    Bind,
    /// The variable is bound here but never accessed; it can be dropped
    /// immediately.
    Discard,
    /// The guaranteed first access (reference count incremented here).
    First,
    /// An access that is neither guaranteed first nor guaranteed last.
    Access,
    /// The guaranteed last access (reference count decremented here).
    Last,
    /// The only access: both first and last.
    Only,
}

impl Action {
    /// The action's name as it appears in dumps and tests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bind => "bind",
            Self::Discard => "discard",
            Self::First => "first",
            Self::Access => "access",
            Self::Last => "last",
            Self::Only => "only",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered mapping from variable names to their [`Action`] within a
/// subtree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VarSet {
    vars: BTreeMap<EcoString, Action>,
}

impl VarSet {
    /// Creates an empty varset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a varset containing a single variable.
    #[must_use]
    pub fn singleton(name: impl Into<EcoString>, action: Action) -> Self {
        let mut set = Self::new();
        set.insert(name, action);
        set
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// The number of variables in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns `true` if the set contains `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Returns the action recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Action> {
        self.vars.get(name).copied()
    }

    /// Inserts or overwrites the action for `name`.
    pub fn insert(&mut self, name: impl Into<EcoString>, action: Action) {
        self.vars.insert(name.into(), action);
    }

    /// Removes `name` from the set.
    pub fn remove(&mut self, name: &str) -> Option<Action> {
        self.vars.remove(name)
    }

    /// Merges `other` into `self`.
    ///
    /// A name bound on both sides stays `bind`; any other combination is an
    /// `access` (`bind ⊕ access → access`). Refined tags from `other` also
    /// normalize to `access` so propagated varsets stay in
    /// {`bind`, `access`}.
    pub fn union(&mut self, other: &Self) {
        for (name, &action) in &other.vars {
            let incoming = if action == Action::Bind {
                Action::Bind
            } else {
                Action::Access
            };
            match self.vars.get(name) {
                None => {
                    self.vars.insert(name.clone(), incoming);
                }
                Some(Action::Bind) if incoming == Action::Bind => {}
                Some(_) => {
                    self.vars.insert(name.clone(), Action::Access);
                }
            }
        }
    }

    /// Iterates over the variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&EcoString, Action)> {
        self.vars.iter().map(|(name, &action)| (name, action))
    }

    /// Iterates over the variable names in name order.
    pub fn names(&self) -> impl Iterator<Item = &EcoString> {
        self.vars.keys()
    }
}

impl FromIterator<(EcoString, Action)> for VarSet {
    fn from_iter<I: IntoIterator<Item = (EcoString, Action)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}
