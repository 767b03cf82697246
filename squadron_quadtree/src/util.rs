// Copyright 2025 the Squadron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Child slots are laid out row-major: top-left, top-right, bottom-left, bottom-right.

/// Child slot for the quadrant on the right (`x`) and/or bottom (`y`) half.
#[inline]
pub(crate) const fn quadrant_index(x: bool, y: bool) -> usize {
    (y as usize) * 2 + (x as usize)
}

/// Whether the child slot lies on the right half and on the bottom half.
#[inline]
pub(crate) const fn quadrant_offset(idx: usize) -> (bool, bool) {
    (idx & 1 == 1, idx & 2 == 2)
}

/// The slot diagonally opposite `idx`.
#[inline]
pub(crate) const fn opposite_quadrant(idx: usize) -> usize {
    3 - idx
}
