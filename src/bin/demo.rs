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

use anyhow::{Result, bail};
use canopy_tree::{Tree, TreeError};

fn expect(actual: Result<(), TreeError>, expected: Result<(), TreeError>, what: &str) -> Result<()> {
    if actual != expected {
        bail!("{what}: expected {expected:?}, got {actual:?}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let tree = Tree::new();

    tree.create("/c/")?;
    tree.create("/c/a/")?;
    tree.create("/c/a/a/")?;
    tree.create("/c/a/a/a/")?;

    tree.create("/c/c/")?;
    tree.create("/c/c/c/")?;
    tree.create("/c/c/d/")?;

    tree.create("/b/")?;
    tree.create("/b/a/")?;

    canopy_tree::ui::log_info("demo", &format!("root listing: {}", tree.list("/")?));

    expect(tree.remove("/"), Err(TreeError::Busy), "remove root")?;
    expect(
        tree.remove("/c/a/a/"),
        Err(TreeError::NotEmpty),
        "remove non-empty /c/a/a/",
    )?;
    expect(tree.remove("/c/c/c/"), Ok(()), "remove /c/c/c/")?;
    expect(
        tree.remove("/a/a/a/a/"),
        Err(TreeError::NotFound),
        "remove missing /a/a/a/a/",
    )?;
    expect(
        tree.remove("/b/"),
        Err(TreeError::NotEmpty),
        "remove non-empty /b/",
    )?;
    expect(
        tree.remove("/a/a/c/a/"),
        Err(TreeError::NotFound),
        "remove missing /a/a/c/a/",
    )?;
    expect(
        tree.remove("/c/c/"),
        Err(TreeError::NotEmpty),
        "remove non-empty /c/c/",
    )?;
    expect(
        tree.remove("/c/"),
        Err(TreeError::NotEmpty),
        "remove non-empty /c/",
    )?;

    tree.move_node("/b/a/", "/c/a/a/a/b/")?;
    canopy_tree::ui::log_info(
        "demo",
        &format!("/c/a/a/a/ after move: {}", tree.list("/c/a/a/a/")?),
    );

    match tree.move_node("/c/a/", "/c/a/a/") {
        Err(TreeError::MovingToSubtree) => {}
        other => bail!("expected MovingToSubtree, got {other:?}"),
    }

    canopy_tree::ui::log_success("demo", "all assertions passed");
    Ok(())
}
