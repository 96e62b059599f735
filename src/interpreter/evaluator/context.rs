use indexmap::IndexMap;

use crate::{ast::Expr, interpreter::parser::core::Scope};

/// The result of evaluating one row.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedEntry {
    /// The tree parsed from the row's formula, without any buff applied.
    pub base_tree:    Expr,
    /// The tree to show: `base_tree` wrapped in buff nodes when active
    /// modifiers target this row, `base_tree` unchanged otherwise.
    pub display_tree: Expr,
    /// The row's final value, after modifiers.
    pub value:        f64,
    /// Whether at least one active modifier targets this row.
    pub is_buffed:    bool,
}

/// Maps row names to computed entries for one evaluation pass.
///
/// A fresh context is built for every pass, one row at a time, in row order.
/// Because the parser resolves names against the context as it stands, a row
/// only sees names evaluated above it. When two rows share a name the later
/// one replaces the earlier entry for every row below it; the entry keeps the
/// position at which the name first appeared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedContext {
    entries: IndexMap<String, ComputedEntry>,
}

impl ComputedContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `name`, if a row with that name was evaluated.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ComputedEntry> {
        self.entries.get(name)
    }

    /// Returns the final value of `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).map(|entry| entry.value)
    }

    /// Records the entry for `name`, replacing any earlier one.
    ///
    /// Returns the replaced entry.
    pub fn insert(&mut self, name: impl Into<String>, entry: ComputedEntry) -> Option<ComputedEntry> {
        self.entries.insert(name.into(), entry)
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no row has been evaluated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over names and entries in first-definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComputedEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}

impl Scope for ComputedContext {
    fn is_defined(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

impl<'a> IntoIterator for &'a ComputedContext {
    type IntoIter = indexmap::map::Iter<'a, String, ComputedEntry>;
    type Item = (&'a String, &'a ComputedEntry);

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: f64) -> ComputedEntry {
        ComputedEntry { base_tree: Expr::value(value),
                        display_tree: Expr::value(value),
                        value,
                        is_buffed: false }
    }

    #[test]
    fn later_entries_replace_earlier_ones() {
        let mut context = ComputedContext::new();
        assert!(context.insert("X", entry(1.0)).is_none());
        context.insert("Y", entry(2.0));
        let replaced = context.insert("X", entry(3.0));

        assert_eq!(replaced.map(|e| e.value), Some(1.0));
        assert_eq!(context.value("X"), Some(3.0));
        assert_eq!(context.len(), 2);
        let names: Vec<&str> = context.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["X", "Y"]);
    }

    #[test]
    fn scope_follows_entries() {
        let mut context = ComputedContext::new();
        assert!(!context.is_defined("X"));
        context.insert("X", entry(1.0));
        assert!(context.is_defined("X"));
    }
}
