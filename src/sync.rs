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

use std::sync::{Condvar, Mutex};

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// What the last wake-up on a node signalled, so the woken class can't
/// be overtaken by a later arrival of a competing class. The discriminants
/// mirror the original source's raw `change` tag (`-1, 0, 1, 2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(i8)]
enum Change {
    None = -1,
    HandoffWriter = 0,
    HandoffReaders = 1,
    HandoffRemover = 2,
}

struct State {
    reading: usize,
    writing: bool,
    r_wait: usize,
    w_wait: usize,
    in_subtree: usize,
    change: Change,
}

impl State {
    fn new() -> Self {
        Self {
            reading: 0,
            writing: false,
            r_wait: 0,
            w_wait: 0,
            in_subtree: 0,
            change: Change::None,
        }
    }
}

/// Per-node readers/writers/removers synchronizer.
///
/// Three request classes compete for a node's children map: readers
/// (lookup/iterate/size), writers (insert/remove/re-parent), and removers
/// (a write that additionally requires the whole subtree to be idle).
/// Admission is governed entirely by the counters and `change` tag above,
/// under a single `Mutex`; the actual children map lives behind its own
/// `RwLock` (see `crate::node::Node`), so that once the protocol admits a
/// reader, Rust lets it actually read concurrently with other admitted
/// readers instead of re-serializing them.
///
/// Any poisoned-lock failure here is treated as fatal, matching the spec:
/// synchronization-primitive failures abort the process rather than
/// propagate as an ordinary `Result`.
pub(crate) struct NodeSync {
    state: Mutex<State>,
    readers: Condvar,
    writers: Condvar,
    removers: Condvar,
}

impl NodeSync {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::new()),
            readers: Condvar::new(),
            writers: Condvar::new(),
            removers: Condvar::new(),
        }
    }

    /// Blocks until this node may be read. Writers have priority over
    /// fresh readers: a reader never admits itself while a writer is
    /// active or queued.
    pub fn before_read(&self) {
        let mut state = self.state.lock().unwrap();

        if state.w_wait > 0 || state.writing {
            state.r_wait += 1;
            state = self.readers.wait(state).unwrap();
            while state.writing {
                state = self.readers.wait(state).unwrap();
            }
            state.r_wait -= 1;
        }

        state.reading += 1;

        if state.r_wait > 0 {
            state.change = Change::HandoffReaders;
            self.readers.notify_one();
        }
    }

    /// Releases read access. The last reader to leave hands off to a
    /// waiting writer.
    pub fn after_read(&self) {
        let mut state = self.state.lock().unwrap();

        state.reading -= 1;
        if state.reading == 0 {
            state.change = Change::HandoffWriter;
            self.writers.notify_one();
        }
    }

    /// Blocks until this node may be written.
    pub fn before_write(&self) {
        let mut state = self.state.lock().unwrap();

        if state.reading > 0 || state.writing {
            state.w_wait += 1;
            while state.change != Change::HandoffWriter || state.reading > 0 || state.writing {
                state = self.writers.wait(state).unwrap();
            }
            state.w_wait -= 1;
        }

        state.writing = true;
    }

    /// Releases write access, preferring to hand off to waiting readers
    /// over waiting writers (chain-wake of a queued reader burst).
    pub fn after_write(&self) {
        let mut state = self.state.lock().unwrap();

        state.writing = false;

        if state.r_wait > 0 {
            state.change = Change::HandoffReaders;
            self.readers.notify_one();
        } else if state.w_wait > 0 {
            state.change = Change::HandoffWriter;
            self.writers.notify_one();
        }
    }

    /// Records that a thread is now operating somewhere in this node's
    /// subtree (including the node itself). Always paired with a later
    /// [`Self::leave_subtree`] on every exit path, including rollback.
    pub fn enter_subtree(&self) {
        let mut state = self.state.lock().unwrap();
        state.in_subtree += 1;
    }

    /// Records that a thread has left this node's subtree. The last one
    /// out wakes a blocked remover, if any.
    pub fn leave_subtree(&self) {
        let mut state = self.state.lock().unwrap();
        state.in_subtree -= 1;
        if state.in_subtree == 0 {
            state.change = Change::HandoffRemover;
            self.removers.notify_one();
        }
    }

    /// Blocks until this node's subtree is fully quiescent, i.e. safe to
    /// unlink and destroy. Does not itself take the write lock: callers
    /// already hold the parent's write lock, which keeps fresh traffic
    /// from entering this subtree while they wait here.
    pub fn before_remove(&self) {
        let mut state = self.state.lock().unwrap();
        if state.in_subtree > 0 {
            while state.change != Change::HandoffRemover || state.in_subtree > 0 {
                state = self.removers.wait(state).unwrap();
            }
        }
    }

    /// Acquires and immediately releases the node's own mutex once. Used
    /// right before destroying a removed node, mirroring the original's
    /// habit of flushing a just-exited signaller before teardown.
    pub fn quiesce_for_destruction(&self) {
        let _state = self.state.lock().unwrap();
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> (usize, bool, usize, usize, usize) {
        let state = self.state.lock().unwrap();
        (
            state.reading,
            state.writing,
            state.r_wait,
            state.w_wait,
            state.in_subtree,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn change_tag_round_trips_through_its_original_discriminants() {
        assert_eq!(Change::try_from(-1i8).unwrap(), Change::None);
        assert_eq!(Change::try_from(0i8).unwrap(), Change::HandoffWriter);
        assert_eq!(Change::try_from(1i8).unwrap(), Change::HandoffReaders);
        assert_eq!(Change::try_from(2i8).unwrap(), Change::HandoffRemover);
        assert_eq!(i8::from(Change::HandoffRemover), 2);
    }

    #[test]
    fn single_reader_does_not_block() {
        let sync = NodeSync::new();
        sync.before_read();
        assert_eq!(sync.snapshot(), (1, false, 0, 0, 0));
        sync.after_read();
        assert_eq!(sync.snapshot(), (0, false, 0, 0, 0));
    }

    #[test]
    fn writer_excludes_readers() {
        let sync = Arc::new(NodeSync::new());
        sync.before_write();

        let sync2 = Arc::clone(&sync);
        let reader = thread::spawn(move || {
            sync2.before_read();
            sync2.after_read();
        });

        thread::sleep(Duration::from_millis(50));
        assert_eq!(sync.snapshot().2, 1); // r_wait: the reader is queued behind the writer
        sync.after_write();
        reader.join().unwrap();
        assert_eq!(sync.snapshot(), (0, false, 0, 0, 0));
    }

    #[test]
    fn subtree_gate_blocks_remover_until_drained() {
        let sync = Arc::new(NodeSync::new());
        sync.enter_subtree();
        assert_eq!(sync.snapshot().4, 1);

        let sync2 = Arc::clone(&sync);
        let remover = thread::spawn(move || {
            sync2.before_remove();
        });

        thread::sleep(Duration::from_millis(50));
        assert!(!remover.is_finished());

        sync.leave_subtree();
        remover.join().unwrap();
    }

    #[test]
    fn many_readers_proceed_concurrently() {
        let sync = Arc::new(NodeSync::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sync = Arc::clone(&sync);
                thread::spawn(move || {
                    sync.before_read();
                    thread::sleep(Duration::from_millis(20));
                    sync.after_read();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(sync.snapshot(), (0, false, 0, 0, 0));
    }
}
