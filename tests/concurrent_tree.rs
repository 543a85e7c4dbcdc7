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

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use canopy_tree::{Tree, TreeError};
use rayon::prelude::*;

const STRESS_DURATION: Duration = Duration::from_millis(400);

/// Four threads race `move(/a/, /b/a/)` against `move(/b/a/, /a/)` in a
/// loop for a fixed duration; once they've all stopped, the tree must have
/// settled on exactly one of the two valid configurations, never both or
/// neither. Checking this mid-flight isn't meaningful: `list("/")` and
/// `list("/b/")` are two independent calls, so a `move` landing between
/// them can make a racing pair of reads see both or neither even though
/// the tree itself is never in an inconsistent state at any single point.
#[test]
fn overlapping_moves_never_duplicate_or_lose_the_directory() {
    let tree = Arc::new(Tree::new());
    tree.create("/a/").unwrap();
    tree.create("/b/").unwrap();

    let stop = Arc::new(AtomicBool::new(false));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let tree = Arc::clone(&tree);
        let stop = Arc::clone(&stop);
        handles.push(thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                let _ = tree.move_node("/a/", "/b/a/");
                let _ = tree.move_node("/b/a/", "/a/");
            }
        }));
    }

    thread::sleep(STRESS_DURATION);
    stop.store(true, Ordering::Relaxed);
    for h in handles {
        h.join().unwrap();
    }

    let has_a = has_name(&tree.list("/").unwrap(), "a");
    let has_b_a = has_name(&tree.list("/b/").unwrap(), "a");
    assert!(has_a ^ has_b_a, "final state must settle on exactly one side");
}

/// Many readers call `list("/")` while one thread repeatedly creates and
/// removes `/x/`; every reader must see a complete, valid snapshot, never
/// a name cut off mid-write.
#[test]
fn concurrent_readers_never_observe_a_torn_listing() {
    let tree = Arc::new(Tree::new());
    tree.create("/keep/").unwrap();

    let stop = Arc::new(AtomicBool::new(false));

    let writer_tree = Arc::clone(&tree);
    let writer_stop = Arc::clone(&stop);
    let writer = thread::spawn(move || {
        while !writer_stop.load(Ordering::Relaxed) {
            let _ = writer_tree.create("/x/");
            let _ = writer_tree.remove("/x/");
        }
    });

    let mut readers = Vec::new();
    for _ in 0..8 {
        let tree = Arc::clone(&tree);
        let stop = Arc::clone(&stop);
        readers.push(thread::spawn(move || {
            let deadline = Instant::now() + STRESS_DURATION;
            while Instant::now() < deadline && !stop.load(Ordering::Relaxed) {
                let listing = tree.list("/").expect("root always exists");
                let names: Vec<&str> = if listing.is_empty() {
                    Vec::new()
                } else {
                    listing.split(',').collect()
                };
                assert!(names.contains(&"keep"), "torn listing: {listing:?}");
                for name in &names {
                    assert!(
                        *name == "keep" || *name == "x",
                        "listing contained an unexpected fragment: {listing:?}"
                    );
                }
            }
        }));
    }

    thread::sleep(STRESS_DURATION);
    stop.store(true, Ordering::Relaxed);
    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }

    assert_eq!(tree.list("/").unwrap().contains("keep"), true);
}

/// A burst of concurrent `create`s under disjoint parents should all
/// succeed independently; a burst under the *same* parent should yield
/// exactly one success per distinct name and `AlreadyExists` for repeats.
#[test]
fn disjoint_creates_run_in_parallel_without_interference() {
    let tree = Arc::new(Tree::new());
    tree.create("/root/").unwrap();

    let names: Vec<String> = (0..64).map(|i| format!("d{i}")).collect();
    let results: Vec<Result<(), TreeError>> = names
        .par_iter()
        .map(|name| tree.create(&format!("/root/{name}/")))
        .collect();

    assert!(results.iter().all(|r| r.is_ok()));

    let listing = tree.list("/root/").unwrap();
    let created: std::collections::HashSet<&str> = listing.split(',').collect();
    assert_eq!(created.len(), names.len());
    for name in &names {
        assert!(created.contains(name.as_str()));
    }
}

fn has_name(listing: &str, name: &str) -> bool {
    listing.split(',').any(|n| n == name)
}
