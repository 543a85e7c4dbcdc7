// canopy-tree: a concurrent hierarchical directory tree
// Copyright (C) 2026  canopy-tree contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::collections::HashMap;
use std::sync::Arc;

use crate::node::Node;

/// The name -> child-node map each directory owns, a thin wrapper over
/// `std::collections::HashMap` so the locking/traversal code in `crate::tree`
/// never touches the underlying container type directly.
#[derive(Default)]
pub(crate) struct ChildMap {
    entries: HashMap<String, Arc<Node>>,
}

impl ChildMap {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<Node>> {
        self.entries.get(name).cloned()
    }

    pub fn insert(&mut self, name: String, node: Arc<Node>) {
        self.entries.insert(name, node);
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<Node>> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the direct children into a comma-separated listing
    /// string. Order matches the map's own iteration order, which is
    /// unspecified, callers must not depend on it beyond set membership.
    pub fn listing(&self) -> String {
        self.entries
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn listing_contains_every_name() {
        let mut map = ChildMap::new();
        map.insert("a".to_string(), Node::new());
        map.insert("b".to_string(), Node::new());

        let listing = map.listing();
        let names: std::collections::HashSet<&str> = listing.split(',').collect();
        assert_eq!(names, std::collections::HashSet::from(["a", "b"]));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn remove_drops_entry() {
        let mut map = ChildMap::new();
        map.insert("a".to_string(), Node::new());
        assert!(map.remove("a").is_some());
        assert!(map.is_empty());
        assert!(map.remove("a").is_none());
    }
}
