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

use crate::config::TreeConfig;
use crate::error::TreeError;

/// Returns true if `path` denotes the root directory.
pub fn is_root(path: &str) -> bool {
    path.is_empty() || path == "/"
}

/// Validates `path` against the grammar and the bounds in `config`.
///
/// Paths look like `/a/b/c/`: they start and end with `/`, and components
/// are non-empty runs of lowercase ASCII letters. `/` (and, for
/// convenience, the empty string) denote the root.
pub fn validate(path: &str, config: &TreeConfig) -> Result<(), TreeError> {
    if is_root(path) {
        return Ok(());
    }

    if !path.starts_with('/') || !path.ends_with('/') {
        return Err(TreeError::InvalidPath);
    }

    let components = split_components(path);
    if components.len() > config.max_depth {
        return Err(TreeError::InvalidPath);
    }

    for component in &components {
        if component.is_empty()
            || component.len() > config.max_component_len
            || !component.bytes().all(|b| b.is_ascii_lowercase())
        {
            return Err(TreeError::InvalidPath);
        }
    }

    Ok(())
}

/// Splits a validated path into its components, e.g. `/a/b/` -> `["a", "b"]`.
/// The root yields an empty vector.
pub fn split_components(path: &str) -> Vec<String> {
    if is_root(path) {
        return Vec::new();
    }
    path[1..path.len() - 1]
        .split('/')
        .map(str::to_string)
        .collect()
}

/// Returns true if `target` has `source` as a strict, component-aligned
/// prefix, i.e. moving `source` to `target` would move it into its own
/// subtree. Both paths are assumed already validated.
pub fn is_strict_prefix(source: &str, target: &str) -> bool {
    target.len() > source.len() && target.starts_with(source)
}
