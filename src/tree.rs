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

use std::sync::Arc;

use crate::config::TreeConfig;
use crate::error::TreeError;
use crate::node::Node;
use crate::path;

/// The tree itself: traversal/rollback helpers and the four public
/// operations (`list`, `create`, `remove`, `move_node`) built on top of
/// `crate::node` and `crate::sync`.
///
/// Every operation begins by entering the root's subtree and walks down,
/// recording every node it enters in a stack. On any exit path (success,
/// `ENOENT`, or any other error) it unwinds that stack back to (and
/// including) the root. Forgetting an unwind anywhere would permanently
/// block a future `remove`/`move` above the leaked node, so every return
/// path below goes through `unwind`.
pub struct Tree {
    root: Arc<Node>,
    config: TreeConfig,
}

impl Tree {
    /// Creates a fresh, empty tree with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Creates a fresh, empty tree with the given path-validation bounds.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            root: Node::new(),
            config,
        }
    }

    /// Lists the direct children of the directory at `path` as a
    /// comma-separated string. The node named by `path` is the target
    /// itself, not its parent.
    pub fn list(&self, path: &str) -> Result<String, TreeError> {
        path::validate(path, &self.config)?;
        let components = path::split_components(path);

        let (node, stack) = descend(&self.root, &components)?;

        node.sync.before_read();
        let listing = node.listing();
        node.sync.after_read();

        unwind(stack);
        Ok(listing)
    }

    /// Creates a new, empty directory at `path`.
    pub fn create(&self, path: &str) -> Result<(), TreeError> {
        path::validate(path, &self.config)?;
        if path::is_root(path) {
            return Err(TreeError::AlreadyExists);
        }

        let components = path::split_components(path);
        let (name, parent_components) = components.split_last().expect("non-root path");

        let (parent, stack) = descend(&self.root, parent_components)?;

        parent.sync.before_write();

        if parent.peek_child(name).is_some() {
            parent.sync.after_write();
            unwind(stack);
            return Err(TreeError::AlreadyExists);
        }

        let child = Node::new();
        child.set_parent(&parent);
        parent.children.write().insert(name.clone(), child);

        parent.sync.after_write();
        unwind(stack);
        Ok(())
    }

    /// Removes the empty directory at `path`.
    pub fn remove(&self, path: &str) -> Result<(), TreeError> {
        path::validate(path, &self.config)?;
        if path::is_root(path) {
            return Err(TreeError::Busy);
        }

        let components = path::split_components(path);
        let (name, parent_components) = components.split_last().expect("non-root path");

        let (parent, stack) = descend(&self.root, parent_components)?;

        parent.sync.before_write();

        let child = match parent.peek_child(name) {
            Some(child) => child,
            None => {
                parent.sync.after_write();
                unwind(stack);
                return Err(TreeError::NotFound);
            }
        };

        // Wait for the target's own subtree to quiesce before deciding
        // whether it's empty, otherwise a concurrent `create` underneath
        // it could race the emptiness check.
        child.sync.before_remove();

        if child.children_len() > 0 {
            parent.sync.after_write();
            unwind(stack);
            return Err(TreeError::NotEmpty);
        }

        parent.children.write().remove(name);

        parent.sync.after_write();
        unwind(stack);

        // Destroy-after-unlock: briefly re-acquire the removed node's own
        // mutex before it is dropped. The protocol already guarantees no
        // other thread can be touching it at this point; kept anyway to
        // preserve the habit verbatim.
        child.sync.quiesce_for_destruction();
        drop(child);

        Ok(())
    }

    /// Moves the directory at `source` to `target`, optionally renaming
    /// it in the process. A no-op if `source == target`.
    pub fn move_node(&self, source: &str, target: &str) -> Result<(), TreeError> {
        path::validate(source, &self.config)?;
        path::validate(target, &self.config)?;
        if path::is_root(source) {
            return Err(TreeError::Busy);
        }
        if path::is_root(target) {
            return Err(TreeError::AlreadyExists);
        }
        if path::is_strict_prefix(source, target) {
            return Err(TreeError::MovingToSubtree);
        }

        let src_components = path::split_components(source);
        let trg_components = path::split_components(target);
        let src_parent = &src_components[..src_components.len() - 1];
        let trg_parent = &trg_components[..trg_components.len() - 1];
        let src_name = src_components.last().expect("non-root source");
        let trg_name = trg_components.last().expect("non-root target");

        // Phase 1: descend from root while the parent paths still agree,
        // to find the deepest shared ancestor.
        let mut stack = vec![Arc::clone(&self.root)];
        self.root.sync.enter_subtree();
        let mut common_ancestor = Arc::clone(&self.root);
        let mut depth = 0;
        while depth < src_parent.len()
            && depth < trg_parent.len()
            && src_parent[depth] == trg_parent[depth]
        {
            match common_ancestor.read_and_enter_child(&src_parent[depth]) {
                Some(child) => {
                    stack.push(Arc::clone(&child));
                    common_ancestor = child;
                    depth += 1;
                }
                None => {
                    unwind(stack);
                    return Err(TreeError::NotFound);
                }
            }
        }

        // Write-locking the common ancestor before touching anything
        // deeper is what linearizes two `move`s whose paths overlap:
        // whichever gets here first forces the other to wait right here,
        // before it can acquire any lock further down.
        common_ancestor.sync.before_write();

        let (src_entered, src_result) = descend_remainder(&common_ancestor, &src_parent[depth..]);
        let parent_src = match src_result {
            Ok(parent) => parent,
            Err(err) => {
                unwind(src_entered);
                common_ancestor.sync.after_write();
                unwind(stack);
                return Err(err);
            }
        };

        let (trg_entered, trg_result) = descend_remainder(&common_ancestor, &trg_parent[depth..]);
        let parent_trg = match trg_result {
            Ok(parent) => parent,
            Err(err) => {
                unwind(trg_entered);
                unwind(src_entered);
                common_ancestor.sync.after_write();
                unwind(stack);
                return Err(err);
            }
        };

        let src_is_common = Arc::ptr_eq(&parent_src, &common_ancestor);
        let trg_is_common = Arc::ptr_eq(&parent_trg, &common_ancestor);
        let trg_is_src = Arc::ptr_eq(&parent_trg, &parent_src);

        if !src_is_common {
            parent_src.sync.before_write();
        }
        if !trg_is_common && !trg_is_src {
            parent_trg.sync.before_write();
        }

        // Both parents are now write-locked (or aliased to one that is);
        // the common ancestor no longer needs to block the path.
        let mut common_write_held = true;
        if !src_is_common && !trg_is_common {
            common_ancestor.sync.after_write();
            common_write_held = false;
        }

        let move_locks = MoveLocks {
            parent_src: Arc::clone(&parent_src),
            parent_trg: Arc::clone(&parent_trg),
            common_ancestor,
            common_write_held,
            src_is_common,
            trg_is_common,
            trg_is_src,
        };

        let child_src = match parent_src.peek_child(src_name) {
            Some(child) => child,
            None => {
                move_locks.release(src_entered, trg_entered, stack);
                return Err(TreeError::NotFound);
            }
        };

        if source == target {
            move_locks.release(src_entered, trg_entered, stack);
            return Ok(());
        }

        if parent_trg.peek_child(trg_name).is_some() {
            move_locks.release(src_entered, trg_entered, stack);
            return Err(TreeError::AlreadyExists);
        }

        // Wait for the source subtree to quiesce before re-parenting it.
        child_src.sync.before_remove();

        parent_src.children.write().remove(src_name);
        parent_trg
            .children
            .write()
            .insert(trg_name.clone(), Arc::clone(&child_src));
        child_src.set_parent(&parent_trg);

        move_locks.release(src_entered, trg_entered, stack);
        Ok(())
    }
}

/// The set of write-locks a `move` may be holding by the time it reaches
/// its terminal mutation, plus which of them alias each other. Bundled
/// together because every exit path from that point on releases exactly
/// this set in the same order: target parent, source parent, common
/// ancestor (skipping any that alias a node already released), then
/// unwinds the subtree counters target-side, source-side, and finally
/// root-ward.
struct MoveLocks {
    parent_src: Arc<Node>,
    parent_trg: Arc<Node>,
    common_ancestor: Arc<Node>,
    common_write_held: bool,
    src_is_common: bool,
    trg_is_common: bool,
    trg_is_src: bool,
}

impl MoveLocks {
    fn release(self, src_entered: Vec<Arc<Node>>, trg_entered: Vec<Arc<Node>>, stack: Vec<Arc<Node>>) {
        if !self.trg_is_common && !self.trg_is_src {
            self.parent_trg.sync.after_write();
        }
        if !self.src_is_common {
            self.parent_src.sync.after_write();
        }
        if self.common_write_held {
            self.common_ancestor.sync.after_write();
        }
        unwind(trg_entered);
        unwind(src_entered);
        unwind(stack);
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Descends from `root` through `components`, entering each node's
/// subtree along the way. On success, returns the final node plus the
/// full stack of entered nodes (root included) for the caller to unwind
/// once it's done. On failure, already unwinds the stack itself and
/// returns `NotFound`.
fn descend(root: &Arc<Node>, components: &[String]) -> Result<(Arc<Node>, Vec<Arc<Node>>), TreeError> {
    let mut stack = vec![Arc::clone(root)];
    root.sync.enter_subtree();
    let mut current = Arc::clone(root);

    for name in components {
        match current.read_and_enter_child(name) {
            Some(child) => {
                stack.push(Arc::clone(&child));
                current = child;
            }
            None => {
                unwind(stack);
                return Err(TreeError::NotFound);
            }
        }
    }

    Ok((current, stack))
}

/// Continues a `move`'s traversal from the common ancestor down the
/// remainder of one side's parent path. The first hop is special: the
/// common ancestor is already write-locked by the caller, so it is read
/// without going through `before_read`/`after_read` again; every hop
/// after that uses the ordinary read-admission protocol.
///
/// Always returns whatever prefix of `components` it managed to enter,
/// so the caller can unwind it regardless of the outcome.
fn descend_remainder(
    common_ancestor: &Arc<Node>,
    components: &[String],
) -> (Vec<Arc<Node>>, Result<Arc<Node>, TreeError>) {
    let mut stack = Vec::new();
    let mut current = Arc::clone(common_ancestor);

    for (index, name) in components.iter().enumerate() {
        let already_write_locked = index == 0;

        if !already_write_locked {
            current.sync.before_read();
        }
        let child = current.peek_child(name);
        if let Some(child) = &child {
            child.sync.enter_subtree();
        }
        if !already_write_locked {
            current.sync.after_read();
        }

        match child {
            Some(child) => {
                stack.push(Arc::clone(&child));
                current = child;
            }
            None => return (stack, Err(TreeError::NotFound)),
        }
    }

    (stack, Ok(current))
}

/// Leaves the subtree of every node in `stack`, from the deepest back up
/// to (and including) the root. The sole reason nodes carry a parent
/// back-link is to make this unwind possible after traversal aborts.
fn unwind(stack: Vec<Arc<Node>>) {
    for node in stack.into_iter().rev() {
        node.sync.leave_subtree();
    }
}
