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

mod children;
pub mod config;
pub mod error;
mod node;
pub mod path;
mod sync;
pub mod tree;
pub mod ui;

pub use config::TreeConfig;
pub use error::TreeError;
pub use tree::Tree;
