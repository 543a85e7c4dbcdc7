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

use thiserror::Error;

/// Error taxonomy returned by [`crate::tree::Tree`] operations.
///
/// These mirror the POSIX-ish error set a real filesystem namespace would
/// return, with one addition (`MovingToSubtree`) that has no errno
/// equivalent and is never conflated with the others by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The path is malformed: missing leading/trailing slash, an empty or
    /// overlong component, or a component using characters other than
    /// lowercase ASCII letters.
    #[error("invalid path")]
    InvalidPath,

    /// No node exists at the requested path (or along the walk to it).
    #[error("no such directory")]
    NotFound,

    /// A node already exists where one would be created or moved to.
    #[error("directory already exists")]
    AlreadyExists,

    /// `remove` was asked to remove a directory that still has children.
    #[error("directory not empty")]
    NotEmpty,

    /// The operation targets the root, which can never be removed or moved.
    #[error("operation not permitted on root")]
    Busy,

    /// `move` was asked to move a directory into its own subtree.
    #[error("cannot move a directory into its own subtree")]
    MovingToSubtree,
}
