// Copyright 2025 the Squadron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-time settings for [`QuadTree`](crate::QuadTree).

use crate::error::{QuadTreeError, QuadTreeResult};
use crate::types::Scalar;

/// Quadtree configuration.
///
/// # Examples
///
/// ```
/// use squadron_quadtree::{Config, QuadTree};
///
/// let config = Config {
///     initial_half_extent: 512.0,
///     ..Config::default()
/// };
/// let tree = QuadTree::<f64, u32>::with_config(config).unwrap();
/// assert_eq!(tree.half_extent(), 512.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config<T> {
    /// Half the side of the square indexed before any growth.
    ///
    /// The tree starts out covering `[-initial_half_extent, initial_half_extent)`
    /// on both axes and doubles as entries land outside it. Starting near the
    /// expected world size avoids a burst of growth on the first inserts.
    pub initial_half_extent: T,
    /// Smallest node span placement will descend into.
    ///
    /// Entries larger than this are placed purely by size. Smaller ones,
    /// including zero-sized points, stop at the first node whose children
    /// would be narrower than `min_span`.
    pub min_span: T,
}

impl<T: Scalar> Default for Config<T> {
    fn default() -> Self {
        Self {
            initial_half_extent: T::one(),
            min_span: T::DEFAULT_MIN_SPAN,
        }
    }
}

impl<T: Scalar> Config<T> {
    pub(crate) fn validate(&self) -> QuadTreeResult<()> {
        let extent_ok =
            T::is_finite(self.initial_half_extent) && self.initial_half_extent > T::zero();
        if !extent_ok {
            return Err(QuadTreeError::InvalidArgument {
                reason: "initial_half_extent must be finite and positive",
            });
        }
        // A zero span would let point entries descend forever.
        let span_ok = T::is_finite(self.min_span) && self.min_span > T::zero();
        if !span_ok {
            return Err(QuadTreeError::InvalidArgument {
                reason: "min_span must be finite and positive",
            });
        }
        Ok(())
    }
}
