// Copyright 2025 the Squadron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The growable loose quadtree.

use alloc::vec::Vec;
use core::fmt::Debug;

use smallvec::SmallVec;

use crate::config::Config;
use crate::error::{QuadTreeError, QuadTreeResult};
use crate::node::Node;
use crate::types::{Entry, Rect, Scalar};
use crate::util::{opposite_quadrant, quadrant_index, quadrant_offset};

/// Child slots from the root down to the node an area is stored at.
type Path = SmallVec<[usize; 16]>;

/// A loose quadtree over an origin-centered square that doubles on demand.
///
/// The tree covers `[-half_extent, half_extent)` on both axes. Inserting an
/// entry outside that square grows the tree until it fits; the tree never
/// shrinks.
///
/// Each entry is stored at the deepest node whose children are still at least
/// as wide as the entry's larger dimension, in the child picked by the
/// entry's top-left corner. Large entries therefore stay near the root while
/// small ones sink, and queries widen each node's square to twice its span to
/// account for entries that hang over its right and bottom edges.
///
/// There is no in-place move. When an object's bounds change, remove its
/// entry with the old area and insert it again with the new one, or use
/// [`QuadTree::update`] which does both.
///
/// # Examples
///
/// ```
/// use squadron_quadtree::{Entry, QuadTree, Rect};
///
/// let mut tree = QuadTree::<f64, u32>::new();
/// let a = Entry::new(Rect::new(0.0, 0.0, 20.0, 20.0), 1);
/// let b = Entry::new(Rect::new(15.0, 15.0, 35.0, 35.0), 2);
/// tree.insert(a).unwrap();
/// tree.insert(b).unwrap();
///
/// let mut hits = Vec::new();
/// tree.visit(Rect::new(18.0, 18.0, 19.0, 19.0), |e| hits.push(e.payload));
/// assert_eq!(hits.len(), 2);
///
/// tree.remove(&a).unwrap();
/// assert_eq!(tree.len(), 1);
/// ```
#[derive(Clone)]
pub struct QuadTree<T, P> {
    root: Node<T, P>,
    half_extent: T,
    len: usize,
    config: Config<T>,
}

impl<T: Scalar, P: Copy + Eq> Default for QuadTree<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, P: Copy + Eq> QuadTree<T, P> {
    /// Create an empty tree with the default [`Config`].
    pub fn new() -> Self {
        let config = Config::default();
        Self {
            root: Node::new(),
            half_extent: config.initial_half_extent,
            len: 0,
            config,
        }
    }

    /// Create an empty tree with explicit settings.
    ///
    /// Fails with [`QuadTreeError::InvalidArgument`] when the initial half
    /// extent or the minimum span is not finite and positive.
    pub fn with_config(config: Config<T>) -> QuadTreeResult<Self> {
        config.validate()?;
        Ok(Self {
            root: Node::new(),
            half_extent: config.initial_half_extent,
            len: 0,
            config,
        })
    }

    /// The settings this tree was created with.
    pub fn config(&self) -> &Config<T> {
        &self.config
    }

    /// Half the side of the square currently covered.
    pub fn half_extent(&self) -> T {
        self.half_extent
    }

    /// The square currently covered, `[-half_extent, half_extent)` on both axes.
    pub fn bounds(&self) -> Rect<T> {
        let lo = T::neg(self.half_extent);
        Rect::new(lo, lo, self.half_extent, self.half_extent)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Remove every entry and return to the configured initial extent.
    pub fn clear(&mut self) {
        self.root = Node::new();
        self.half_extent = self.config.initial_half_extent;
        self.len = 0;
    }

    /// Insert an entry, growing the tree until it covers the entry's area.
    ///
    /// Fails with [`QuadTreeError::InvalidArgument`], leaving the tree
    /// untouched, when the area has a non-finite edge or lies too far out for
    /// the doubled extent to stay finite.
    pub fn insert(&mut self, entry: Entry<T, P>) -> QuadTreeResult<()> {
        ensure_finite(&entry.area)?;
        let growths = self.growths_to_cover(&entry.area)?;
        for _ in 0..growths {
            self.grow();
        }
        let depth = self.place(entry);
        self.len += 1;
        tracing::trace!(depth, len = self.len, "inserted entry");
        Ok(())
    }

    /// Remove the entry with `entry`'s payload from the node `entry.area` maps to.
    ///
    /// `entry.area` must be the area the entry was inserted with. When several
    /// entries at that node share the payload, the most recently inserted one
    /// is removed. Returns the removed entry.
    ///
    /// Fails with [`QuadTreeError::EntryNotFound`] when nothing matches, and
    /// with [`QuadTreeError::InvalidArgument`] for a non-finite area. Removal
    /// never grows the tree or allocates nodes.
    pub fn remove(&mut self, entry: &Entry<T, P>) -> QuadTreeResult<Entry<T, P>> {
        ensure_finite(&entry.area)?;
        let Some((node, depth)) = self.stored_node_mut(&entry.area) else {
            tracing::debug!(area = ?entry.area, "remove missed: no node for area");
            return Err(QuadTreeError::EntryNotFound);
        };
        let Some(pos) = node
            .entries
            .iter()
            .rposition(|stored| stored.payload == entry.payload)
        else {
            tracing::debug!(area = ?entry.area, depth, "remove missed: payload not at node");
            return Err(QuadTreeError::EntryNotFound);
        };
        let removed = node.entries.remove(pos);
        self.len -= 1;
        tracing::trace!(depth, len = self.len, "removed entry");
        Ok(removed)
    }

    /// Move an entry to a new area, keeping its payload.
    ///
    /// Equivalent to [`remove`](Self::remove) followed by
    /// [`insert`](Self::insert), except that `area` is validated first so a
    /// failed update leaves the entry where it was. Returns the entry as now
    /// stored.
    pub fn update(&mut self, entry: &Entry<T, P>, area: Rect<T>) -> QuadTreeResult<Entry<T, P>> {
        ensure_finite(&area)?;
        self.growths_to_cover(&area)?;
        let removed = self.remove(entry)?;
        let moved = Entry::new(area, removed.payload);
        self.insert(moved)?;
        Ok(moved)
    }

    /// Visit every entry whose area strictly overlaps `query`.
    ///
    /// Edges are open, so entries that only touch `query` are not reported.
    /// Each matching entry is reported exactly once, parents before children
    /// and children in top-left, top-right, bottom-left, bottom-right order.
    pub fn visit<'a, F: FnMut(&'a Entry<T, P>)>(&'a self, query: Rect<T>, mut f: F) {
        self.walk(query, |node| {
            for entry in &node.entries {
                if entry.area.overlaps(&query) {
                    f(entry);
                }
            }
        });
    }

    /// Collect the entries [`visit`](Self::visit) would report, in the same order.
    pub fn query(&self, query: Rect<T>) -> impl Iterator<Item = &Entry<T, P>> + '_ {
        let mut out = Vec::new();
        self.visit(query, |e| out.push(e));
        out.into_iter()
    }

    /// Visit entries overlapping `entry.area` other than those carrying `entry.payload`.
    ///
    /// This is the per-object broadphase question "what else touches me".
    pub fn visit_neighbors<'a, F: FnMut(&'a Entry<T, P>)>(&'a self, entry: &Entry<T, P>, mut f: F) {
        let payload = entry.payload;
        self.visit(entry.area, |other| {
            if other.payload != payload {
                f(other);
            }
        });
    }

    /// Call `f` on every node whose loose square may hold entries overlapping `query`.
    fn walk<'a, F: FnMut(&'a Node<T, P>)>(&'a self, query: Rect<T>, mut f: F) {
        // Nothing is stored outside the covered square.
        if !self.bounds().overlaps(&query) {
            return;
        }
        let lo = T::neg(self.half_extent);
        walk_node(&self.root, T::double(self.half_extent), lo, lo, &query, &mut f);
    }

    /// How many doublings the covered square needs before it contains `area`.
    fn growths_to_cover(&self, area: &Rect<T>) -> QuadTreeResult<u32> {
        let mut half_extent = self.half_extent;
        let mut growths = 0;
        while !covers(half_extent, area) {
            half_extent = T::double(half_extent);
            if !T::is_finite(half_extent) {
                return Err(QuadTreeError::InvalidArgument {
                    reason: "rectangle lies beyond the largest representable extent",
                });
            }
            growths += 1;
        }
        Ok(growths)
    }

    /// Double the covered square while keeping every node at its absolute position.
    fn grow(&mut self) {
        let old = core::mem::replace(&mut self.root, Node::new());
        for (idx, subtree) in old.children.into_iter().enumerate() {
            // The old child sat at the old root's corner; from the new root it
            // is reached through the matching new child and then inward.
            let wrapper = self.root.child_or_insert(idx);
            wrapper.children[opposite_quadrant(idx)] = subtree;
        }
        self.half_extent = T::double(self.half_extent);
        tracing::debug!(half_extent = ?self.half_extent, "grew quadtree");

        // Entries on the old root are at most as wide as the old square, so
        // they now belong one level down.
        for entry in old.entries {
            self.place(entry);
        }
    }

    /// Store `entry` at its target node, creating nodes along the way. Returns the depth.
    fn place(&mut self, entry: Entry<T, P>) -> usize {
        let path = self.path(&entry.area);
        let mut node = &mut self.root;
        for &idx in &path {
            node = node.child_or_insert(idx);
        }
        node.entries.push(entry);
        path.len()
    }

    /// The existing node `area` maps to, without creating anything.
    fn stored_node_mut(&mut self, area: &Rect<T>) -> Option<(&mut Node<T, P>, usize)> {
        if !covers(self.half_extent, area) {
            return None;
        }
        let path = self.path(area);
        let mut node = &mut self.root;
        for &idx in &path {
            node = node.child_mut(idx)?;
        }
        Some((node, path.len()))
    }

    /// Child slots leading from the root to the node `area` is stored at.
    ///
    /// Only the top-left corner of `area` picks the quadrant, so an entry
    /// straddling a midline goes to the quadrant holding its corner even
    /// though it does not fit inside it. Queries tolerate this through the
    /// widened node squares in [`walk_node`].
    fn path(&self, area: &Rect<T>) -> Path {
        let extent = area.extent();
        let mut path = Path::new();
        let mut span = T::double(self.half_extent);
        let mut x = T::neg(self.half_extent);
        let mut y = x;
        loop {
            let half = T::half(span);
            if extent > half || half < self.config.min_span {
                return path;
            }
            let right = area.left >= T::add(x, half);
            let below = area.top >= T::add(y, half);
            if right {
                x = T::add(x, half);
            }
            if below {
                y = T::add(y, half);
            }
            path.push(quadrant_index(right, below));
            span = half;
        }
    }
}

fn walk_node<'a, T, P, F>(node: &'a Node<T, P>, span: T, x: T, y: T, query: &Rect<T>, f: &mut F)
where
    T: Scalar,
    F: FnMut(&'a Node<T, P>),
{
    // Entries here start inside the node's square but may be as wide as the
    // square itself, so they can reach up to two spans from the origin.
    let reach = T::double(span);
    if x > query.right
        || T::add(x, reach) < query.left
        || y > query.bottom
        || T::add(y, reach) < query.top
    {
        return;
    }

    f(node);

    let half = T::half(span);
    for (idx, child) in node.children.iter().enumerate() {
        if let Some(child) = child {
            let (right, below) = quadrant_offset(idx);
            let cx = if right { T::add(x, half) } else { x };
            let cy = if below { T::add(y, half) } else { y };
            walk_node(child, half, cx, cy, query, f);
        }
    }
}

/// Whether the square `[-half_extent, half_extent)` contains `area`.
fn covers<T: Scalar>(half_extent: T, area: &Rect<T>) -> bool {
    let lo = T::neg(half_extent);
    area.left >= lo && area.top >= lo && area.right < half_extent && area.bottom < half_extent
}

fn ensure_finite<T: Scalar>(area: &Rect<T>) -> QuadTreeResult<()> {
    if area.is_finite() {
        Ok(())
    } else {
        Err(QuadTreeError::InvalidArgument {
            reason: "rectangle edges must be finite",
        })
    }
}

impl<T: Scalar, P> Debug for QuadTree<T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadTree")
            .field("half_extent", &self.half_extent)
            .field("len", &self.len)
            .field("nodes", &self.root.node_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec;
    use alloc::vec::Vec;

    fn entry(l: f64, t: f64, r: f64, b: f64, payload: u32) -> Entry<f64, u32> {
        Entry::new(Rect::new(l, t, r, b), payload)
    }

    fn payloads(tree: &QuadTree<f64, u32>, query: Rect<f64>) -> Vec<u32> {
        let mut out = Vec::new();
        tree.visit(query, |e| out.push(e.payload));
        out
    }

    #[test]
    fn growth_doubles_until_covered() {
        let mut tree = QuadTree::<f64, &str>::new();
        assert_eq!(tree.half_extent(), 1.0);

        // r = 2 is not < 1, nor < 2, but is < 4.
        tree.insert(Entry::new(Rect::new(0., 0., 2., 2.), "A")).unwrap();
        assert_eq!(tree.half_extent(), 4.0);
        assert_eq!(tree.bounds(), Rect::new(-4., -4., 4., 4.));

        // Extent 2 fits under half a span of 2 but not of 1: depth 2.
        let (_, depth) = tree.stored_node_mut(&Rect::new(0., 0., 2., 2.)).unwrap();
        assert_eq!(depth, 2);
    }

    #[test]
    fn upper_bound_is_exclusive() {
        let mut tree = QuadTree::<f64, u32>::new();
        tree.insert(entry(-1., -1., 0.5, 0.5, 1)).unwrap();
        assert_eq!(tree.half_extent(), 1.0, "lower bound is inclusive");

        tree.insert(entry(0., 0., 0.5, 1., 2)).unwrap();
        assert_eq!(tree.half_extent(), 2.0, "bottom == size must grow");
    }

    #[test]
    fn growth_keeps_absolute_positions() {
        let mut tree = QuadTree::<f64, u32>::new();
        let small = [
            entry(-0.9, -0.9, -0.8, -0.8, 1),
            entry(0.1, -0.7, 0.3, -0.5, 2),
            entry(-0.6, 0.2, -0.55, 0.25, 3),
            entry(0.5, 0.5, 0.75, 0.75, 4),
        ];
        for e in small {
            tree.insert(e).unwrap();
        }
        // Wider than half the root span: stays on the root before growth.
        let wide = entry(-0.95, -0.95, 0.9, 0.9, 5);
        tree.insert(wide).unwrap();
        assert_eq!(tree.stored_node_mut(&wide.area).unwrap().1, 0);

        tree.insert(entry(100., 100., 101., 101., 6)).unwrap();
        assert_eq!(tree.half_extent(), 128.0);

        for e in small.iter().chain([&wide]) {
            let hits = payloads(&tree, e.area);
            assert!(hits.contains(&e.payload), "{e:?} lost after growth");
        }
        // The former root entry now lives one level below the new root chain.
        assert!(tree.stored_node_mut(&wide.area).unwrap().1 > 0);
        for e in small.iter().chain([&wide]) {
            assert_eq!(tree.remove(e).unwrap(), *e);
        }
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn remove_takes_last_duplicate_payload() {
        let mut tree = QuadTree::<f64, u32>::new();
        let first = entry(0.1, 0.1, 0.2, 0.2, 7);
        let second = entry(0.11, 0.1, 0.21, 0.18, 7);
        tree.insert(first).unwrap();
        tree.insert(second).unwrap();
        assert_eq!(
            tree.path(&first.area),
            tree.path(&second.area),
            "both entries should share a node"
        );

        // Removing by either area finds the node; the later entry goes first.
        assert_eq!(tree.remove(&first).unwrap(), second);
        assert_eq!(tree.remove(&first).unwrap(), first);
        assert_eq!(tree.remove(&first), Err(QuadTreeError::EntryNotFound));
    }

    #[test]
    fn remove_misses_are_reported() {
        let mut tree = QuadTree::<f64, u32>::new();
        let e = entry(0.1, 0.1, 0.2, 0.2, 1);
        assert_eq!(tree.remove(&e), Err(QuadTreeError::EntryNotFound));

        tree.insert(e).unwrap();
        let nodes = tree.node_count();

        // Wrong payload at the right node.
        assert_eq!(
            tree.remove(&entry(0.1, 0.1, 0.2, 0.2, 2)),
            Err(QuadTreeError::EntryNotFound)
        );
        // Right payload, area that maps elsewhere.
        assert_eq!(
            tree.remove(&entry(-0.5, -0.5, -0.4, -0.4, 1)),
            Err(QuadTreeError::EntryNotFound)
        );
        // Outside the covered square: no growth.
        assert_eq!(
            tree.remove(&entry(10., 10., 11., 11., 1)),
            Err(QuadTreeError::EntryNotFound)
        );
        assert_eq!(tree.half_extent(), 1.0);
        assert_eq!(tree.node_count(), nodes, "misses must not allocate");
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn non_finite_input_is_rejected_untouched() {
        let mut tree = QuadTree::<f64, u32>::new();
        for bad in [
            entry(f64::NAN, 0., 1., 1., 1),
            entry(0., 0., f64::INFINITY, 1., 1),
            entry(f64::NEG_INFINITY, 0., 0., 0., 1),
        ] {
            assert!(matches!(
                tree.insert(bad),
                Err(QuadTreeError::InvalidArgument { .. })
            ));
            assert!(matches!(
                tree.remove(&bad),
                Err(QuadTreeError::InvalidArgument { .. })
            ));
        }

        let mut tree32 = QuadTree::<f32, u32>::new();
        let err = tree32
            .insert(Entry::new(Rect::new(0., 0., 3.0e38, 1.), 1))
            .unwrap_err();
        assert!(matches!(err, QuadTreeError::InvalidArgument { .. }));
        assert_eq!(tree32.half_extent(), 1.0);
        assert!(tree32.is_empty());
        assert_eq!(tree32.node_count(), 1);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.half_extent(), 1.0);
    }

    #[test]
    fn point_entries_stop_at_min_span() {
        let config = Config {
            initial_half_extent: 8.0,
            min_span: 1.0,
        };
        let mut tree = QuadTree::<f64, u32>::with_config(config).unwrap();
        tree.insert(entry(3., 3., 3., 3., 1)).unwrap();
        // Spans 16, 8, 4, 2, 1: children of the span-1 node would be too small.
        assert_eq!(tree.stored_node_mut(&Rect::new(3., 3., 3., 3.)).unwrap().1, 4);
        assert_eq!(payloads(&tree, Rect::new(2., 2., 4., 4.)), vec![1]);
    }

    #[test]
    fn leading_corner_picks_quadrant() {
        let mut tree = QuadTree::<f64, u32>::with_config(Config {
            initial_half_extent: 8.0,
            ..Config::default()
        })
        .unwrap();
        // Extent 3 <= 4 but straddles the x = 0 midline from the left.
        let straddler = entry(-1., 1., 2., 2., 1);
        tree.insert(straddler).unwrap();
        assert_eq!(tree.path(&straddler.area).as_slice(), &[2, 1]);

        // Still found from the right-hand side of the midline.
        assert_eq!(payloads(&tree, Rect::new(1., 1., 1.5, 1.5)), vec![1]);
    }

    #[test]
    fn visit_reports_parents_then_children_in_quadrant_order() {
        let mut tree = QuadTree::<f64, u32>::with_config(Config {
            initial_half_extent: 8.0,
            ..Config::default()
        })
        .unwrap();
        tree.insert(entry(4., 4., 5., 5., 4)).unwrap();
        tree.insert(entry(-5., 4., -4., 5., 3)).unwrap();
        tree.insert(entry(4., -5., 5., -4., 2)).unwrap();
        tree.insert(entry(-5., -5., -4., -4., 1)).unwrap();
        tree.insert(entry(-7., -7., 7., 7., 0)).unwrap();

        assert_eq!(payloads(&tree, tree.bounds()), vec![0, 1, 2, 3, 4]);
        let collected: Vec<u32> = tree.query(tree.bounds()).map(|e| e.payload).collect();
        assert_eq!(collected, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn query_outside_bounds_touches_no_nodes() {
        let mut tree = QuadTree::<f64, u32>::new();
        tree.insert(entry(-3., -3., 3., 3., 1)).unwrap();
        tree.insert(entry(0.5, 0.5, 0.6, 0.6, 2)).unwrap();

        let size = tree.half_extent();
        for query in [
            Rect::new(size, 0., size + 1., 1.),
            Rect::new(size * 1.5, size * 1.5, size * 2.5, size * 2.5),
            Rect::new(-size - 2., -1., -size, 1.),
        ] {
            let mut walked = 0;
            tree.walk(query, |_| walked += 1);
            assert_eq!(walked, 0, "{query:?} should be pruned at the root");
            assert!(payloads(&tree, query).is_empty());
        }
    }

    #[test]
    fn large_entries_near_small_nodes_are_found() {
        let mut tree = QuadTree::<f64, u32>::with_config(Config {
            initial_half_extent: 16.0,
            ..Config::default()
        })
        .unwrap();
        // Corner just left of the midline; extent 8 sinks one level but hangs
        // far into the right half.
        tree.insert(entry(-0.5, -0.5, 7.5, 7.5, 1)).unwrap();
        assert_eq!(payloads(&tree, Rect::new(7., 7., 8., 8.)), vec![1]);
        assert!(payloads(&tree, Rect::new(7.5, 7.5, 8., 8.)).is_empty());
    }

    #[test]
    fn update_moves_and_validates_first() {
        let mut tree = QuadTree::<f64, u32>::new();
        let e = entry(0.1, 0.1, 0.2, 0.2, 9);
        tree.insert(e).unwrap();

        let moved = tree.update(&e, Rect::new(30., 30., 31., 31.)).unwrap();
        assert_eq!(moved.payload, 9);
        assert!(payloads(&tree, e.area).is_empty());
        assert_eq!(payloads(&tree, moved.area), vec![9]);

        let err = tree.update(&moved, Rect::new(f64::NAN, 0., 1., 1.));
        assert!(matches!(err, Err(QuadTreeError::InvalidArgument { .. })));
        assert_eq!(payloads(&tree, moved.area), vec![9], "failed update keeps entry");
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn neighbors_skip_own_payload() {
        let mut tree = QuadTree::<f64, u32>::new();
        let a = entry(0., 0., 20., 20., 1);
        let b = entry(10., 10., 30., 30., 2);
        let c = entry(40., 40., 60., 60., 3);
        for e in [a, b, c] {
            tree.insert(e).unwrap();
        }
        let mut seen = Vec::new();
        tree.visit_neighbors(&a, |e| seen.push(e.payload));
        assert_eq!(seen, vec![2]);

        seen.clear();
        tree.visit_neighbors(&c, |e| seen.push(e.payload));
        assert!(seen.is_empty());
    }

    #[test]
    fn clear_restores_initial_state() {
        let mut tree = QuadTree::<f32, u32>::new();
        tree.insert(Entry::new(Rect::new(0., 0., 50., 50.), 1)).unwrap();
        assert!(tree.half_extent() > 1.0);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.half_extent(), 1.0);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn debug_is_concise() {
        let mut tree = QuadTree::<f64, u32>::new();
        tree.insert(entry(0.1, 0.1, 0.2, 0.2, 1)).unwrap();
        let s = format!("{tree:?}");
        assert!(s.starts_with("QuadTree { half_extent: 1.0, len: 1"), "{s}");
    }
}
