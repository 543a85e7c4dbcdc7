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

/// Tunables for path validation. The distilled spec leaves component
/// length and path depth "bounded" without naming a bound; this resolves
/// that open point with sane defaults that a caller can override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Maximum length, in bytes, of a single path component (e.g. `a` in
    /// `/a/b/`).
    pub max_component_len: usize,
    /// Maximum number of components a path may have.
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_component_len: 255,
            max_depth: 256,
        }
    }
}
