// Copyright 2025 the Squadron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree nodes.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::types::Entry;

/// One square of the tree.
///
/// `entries` holds the entries placed exactly here, in insertion order.
/// Children are created on first use and never freed while the tree lives.
#[derive(Clone, Debug)]
pub(crate) struct Node<T, P> {
    pub(crate) entries: Vec<Entry<T, P>>,
    pub(crate) children: [Option<Box<Self>>; 4],
}

impl<T, P> Node<T, P> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
            children: [None, None, None, None],
        }
    }

    pub(crate) fn child_or_insert(&mut self, idx: usize) -> &mut Self {
        self.children[idx].get_or_insert_with(|| Box::new(Self::new()))
    }

    pub(crate) fn child_mut(&mut self, idx: usize) -> Option<&mut Self> {
        self.children[idx].as_deref_mut()
    }

    /// Number of nodes in this subtree, including `self`.
    pub(crate) fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(|child| child.node_count())
            .sum::<usize>()
    }
}
