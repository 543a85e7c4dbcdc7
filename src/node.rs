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

use std::sync::{Arc, Weak};

use parking_lot::{Mutex as PlMutex, RwLock};

use crate::children::ChildMap;
use crate::sync::NodeSync;

/// A single directory. Owned by its parent's `ChildMap`, with a
/// non-owning back-reference to that parent used only to unwind
/// `in_subtree` counters on the way back up, never for routing. The
/// back-reference is a `Weak` specifically to break the ownership cycle
/// the parent link would otherwise create (see `DESIGN.md`).
pub(crate) struct Node {
    parent: PlMutex<Weak<Node>>,
    pub(crate) children: RwLock<ChildMap>,
    pub(crate) sync: NodeSync,
}

impl Node {
    pub fn new() -> Arc<Node> {
        Arc::new(Node {
            parent: PlMutex::new(Weak::new()),
            children: RwLock::new(ChildMap::new()),
            sync: NodeSync::new(),
        })
    }

    pub fn set_parent(&self, parent: &Arc<Node>) {
        *self.parent.lock() = Arc::downgrade(parent);
    }

    #[cfg(test)]
    pub fn parent(&self) -> Option<Arc<Node>> {
        self.parent.lock().upgrade()
    }

    /// `before_read(self)`, look up `name`, and, while still holding that
    /// read access, `enter_subtree` on the child if found, then
    /// `after_read(self)`. This is the one-hop step of the traversal and
    /// rollback protocol: every hop down records the node it entered so
    /// the walk can unwind cleanly on any exit path.
    pub fn read_and_enter_child(&self, name: &str) -> Option<Arc<Node>> {
        self.sync.before_read();
        let child = self.children.read().get(name);
        if let Some(child) = &child {
            child.sync.enter_subtree();
        }
        self.sync.after_read();
        child
    }

    /// Looks up `name` without going through the read-admission protocol.
    /// Only valid while the caller already holds write (or otherwise
    /// exclusive) access to `self`, e.g. via `before_write`.
    pub fn peek_child(&self, name: &str) -> Option<Arc<Node>> {
        self.children.read().get(name)
    }

    pub fn children_len(&self) -> usize {
        self.children.read().len()
    }

    pub fn listing(&self) -> String {
        self.children.read().listing()
    }
}
