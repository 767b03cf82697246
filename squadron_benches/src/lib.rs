// Copyright 2025 the Squadron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared scene setup for the Squadron benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use squadron_quadtree::{Entry, QuadTree, Rect};

/// Side of the square objects in a generated scene.
pub const OBJECT_SIZE: f64 = 20.0;

/// Scatter `count` objects uniformly inside a `width` by `height` field.
///
/// Positions come from a [`StdRng`] seeded with `seed`, so every run of a
/// benchmark sees the same scene. Both dimensions must exceed [`OBJECT_SIZE`].
pub fn scene(count: usize, width: f64, height: f64, seed: u64) -> Vec<Rect<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = rng.gen_range(0.0..width - OBJECT_SIZE);
            let y = rng.gen_range(0.0..height - OBJECT_SIZE);
            Rect::from_xywh(x, y, OBJECT_SIZE, OBJECT_SIZE)
        })
        .collect()
}

/// Build a tree holding every rectangle in `areas`, keyed by index.
pub fn populated(areas: &[Rect<f64>]) -> QuadTree<f64, usize> {
    let mut tree = QuadTree::new();
    for (i, area) in areas.iter().enumerate() {
        tree.insert(Entry::new(*area, i))
            .expect("generated scenes only contain finite rectangles");
    }
    tree
}
