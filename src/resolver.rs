//! Ranked synonym resolution over a flattened response.
//!
//! Providers spell the same field differently (`ИНН`, `inn`, `egrul.inn`, ...)
//! and bury it at varying depths. A field is described by an ordered pattern
//! list and resolved against a case-insensitive index of every flattened path.
//!
//! For each pattern, in priority order:
//! 1. an index key equal to the pattern wins if its value renders non-empty;
//! 2. otherwise the first key (in index order) containing the pattern with a
//!    non-empty render wins.
//!
//! Only when both passes fail does the next pattern get a turn.

use crate::renderer::{normalize_whitespace, render};
use crate::tree::{flatten, Node};
use std::collections::HashMap;

/// Lower-cased path → value view of a response tree.
///
/// Built once per lookup. When two paths collide after lower-casing, the later
/// value replaces the earlier one but keeps the earlier slot in scan order.
#[derive(Debug, Default)]
pub struct FlattenedIndex<'a> {
    entries: Vec<(String, &'a Node)>,
    positions: HashMap<String, usize>,
}

impl<'a> FlattenedIndex<'a> {
    pub fn build(root: &'a Node) -> Self {
        let mut index = Self::default();
        for (path, node) in flatten(root) {
            index.insert(path.to_lowercase(), node);
        }
        index
    }

    fn insert(&mut self, key: String, node: &'a Node) {
        match self.positions.get(&key) {
            Some(&pos) => self.entries[pos].1 = node,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, node));
            }
        }
    }

    /// Value stored under an exact lower-cased path.
    pub fn get(&self, key: &str) -> Option<&'a Node> {
        self.positions.get(key).map(|&pos| self.entries[pos].1)
    }

    /// Entries in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &'a Node)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Finds the best value for one canonical field. `None` is a normal outcome.
pub fn resolve<'a>(index: &FlattenedIndex<'a>, patterns: &[&str]) -> Option<&'a Node> {
    patterns.iter().find_map(|pattern| {
        let pattern = pattern.to_lowercase();
        exact_match(index, &pattern).or_else(|| substring_match(index, &pattern))
    })
}

/// Resolves a field and returns its rendered, whitespace-normalized text.
pub fn resolve_text(index: &FlattenedIndex<'_>, patterns: &[&str]) -> Option<String> {
    resolve(index, patterns).map(|node| normalize_whitespace(&render(node)))
}

fn exact_match<'a>(index: &FlattenedIndex<'a>, pattern: &str) -> Option<&'a Node> {
    index.get(pattern).filter(|node| renders_non_empty(node))
}

fn substring_match<'a>(index: &FlattenedIndex<'a>, pattern: &str) -> Option<&'a Node> {
    index
        .iter()
        .find(|(key, node)| key.contains(pattern) && renders_non_empty(node))
        .map(|(_, node)| node)
}

fn renders_non_empty(node: &Node) -> bool {
    !render(node).trim().is_empty()
}
