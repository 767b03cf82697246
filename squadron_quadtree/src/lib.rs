// Copyright 2025 the Squadron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Squadron Quadtree: a growable loose quadtree for 2D overlap broadphase.
//!
//! Squadron Quadtree indexes axis-aligned rectangles so that "what overlaps this box?"
//! can be answered without testing every pair of objects, every frame.
//!
//! - Insert rectangles with a caller-chosen payload handle (an id, slot index, ...).
//! - Remove by payload, looked up at the node the rectangle maps to.
//! - Visit every entry strictly overlapping a query rectangle.
//!
//! The covered square is centered on the origin and doubles whenever an entry lands
//! outside it, so there is no world size to pick up front. It never shrinks.
//!
//! Entries are placed by size: each one sinks to the deepest node whose children are
//! still at least as wide as the entry, choosing quadrants by its top-left corner. Big
//! objects stay near the root; small ones sink. This is the "loose" part: queries test
//! every node against a square twice its nominal span, which covers whatever hangs off
//! the node's right and bottom edges.
//!
//! # Example
//!
//! ```rust
//! use squadron_quadtree::{Entry, QuadTree, Rect};
//!
//! // Three objects, identified by index into a caller-owned array.
//! let boxes = [
//!     Rect::from_xywh(0.0, 0.0, 20.0, 20.0),
//!     Rect::from_xywh(10.0, 10.0, 20.0, 20.0),
//!     Rect::from_xywh(100.0, 100.0, 20.0, 20.0),
//! ];
//! let mut tree = QuadTree::<f64, usize>::new();
//! for (i, area) in boxes.iter().enumerate() {
//!     tree.insert(Entry::new(*area, i)).unwrap();
//! }
//!
//! // Who touches object 0?
//! let mut hits = Vec::new();
//! tree.visit_neighbors(&Entry::new(boxes[0], 0), |e| hits.push(e.payload));
//! assert_eq!(hits, [1]);
//!
//! // Object 1 moves away: remove with its old area, insert with the new one.
//! let moved = tree
//!     .update(&Entry::new(boxes[1], 1), Rect::from_xywh(50.0, 0.0, 20.0, 20.0))
//!     .unwrap();
//! assert_eq!(moved.payload, 1);
//! assert_eq!(tree.query(boxes[0]).count(), 1);
//! ```
//!
//! ## Removal contract
//!
//! The tree does not keep a payload-to-node map. [`QuadTree::remove`] recomputes where
//! the given area would have been placed and searches that one node, so callers must
//! pass the area the entry was inserted with. Removing something that is not there
//! reports [`QuadTreeError::EntryNotFound`]; if several entries at that node share the
//! payload, the most recently inserted one goes.
//!
//! ## Features
//!
//! - `kurbo`: conversions between `kurbo::Rect` and [`Rect<f64>`](Rect).
//! - `std` / `libm`: forwarded to optional dependencies.
//!
//! ### Float semantics
//!
//! Coordinates are `f32` or `f64`. Rectangles with NaN or infinite edges are rejected
//! with [`QuadTreeError::InvalidArgument`], as are rectangles so far out that the
//! covered square would have to grow to infinity.

#![no_std]

extern crate alloc;

mod config;
mod error;
mod node;
mod tree;
mod types;
pub(crate) mod util;

pub use config::Config;
pub use error::{QuadTreeError, QuadTreeResult};
pub use tree::QuadTree;
pub use types::{Entry, Rect, Scalar};
