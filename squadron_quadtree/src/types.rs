// Copyright 2025 the Squadron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::fmt::Debug;

/// Axis-aligned rectangle in 2D.
///
/// Callers are expected to keep `left <= right` and `top <= bottom`; this is
/// not validated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect<T> {
    /// Minimum x
    pub left: T,
    /// Minimum y
    pub top: T,
    /// Maximum x
    pub right: T,
    /// Maximum y
    pub bottom: T,
}

impl<T> Rect<T> {
    /// Create a new rectangle from its four edges.
    #[inline(always)]
    pub const fn new(left: T, top: T, right: T, bottom: T) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl<T: Scalar> Rect<T> {
    /// Create a rectangle from its top-left corner and size.
    #[inline]
    pub fn from_xywh(x: T, y: T, w: T, h: T) -> Self {
        Self {
            left: x,
            top: y,
            right: T::add(x, w),
            bottom: T::add(y, h),
        }
    }

    /// Horizontal size.
    #[inline]
    pub fn width(&self) -> T {
        T::sub(self.right, self.left)
    }

    /// Vertical size.
    #[inline]
    pub fn height(&self) -> T {
        T::sub(self.bottom, self.top)
    }

    /// The larger of width and height.
    ///
    /// This is the dimension the quadtree uses to decide how deep an entry may
    /// be placed.
    #[inline]
    pub fn extent(&self) -> T {
        T::max(self.width(), self.height())
    }

    /// Whether all four edges are finite (no NaN or infinity).
    #[inline]
    pub fn is_finite(&self) -> bool {
        T::is_finite(self.left)
            && T::is_finite(self.top)
            && T::is_finite(self.right)
            && T::is_finite(self.bottom)
    }

    /// Determines whether this rectangle strictly overlaps another.
    ///
    /// Edges are open: two rectangles that only share an edge or a corner do
    /// not overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use squadron_quadtree::Rect;
    ///
    /// let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    /// assert!(a.overlaps(&Rect::new(5.0, 5.0, 15.0, 15.0)));
    ///
    /// // Touching edges do not count.
    /// assert!(!a.overlaps(&Rect::new(10.0, 0.0, 20.0, 10.0)));
    /// ```
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

/// Numeric scalar abstraction for quadtree coordinates.
///
/// Node spans are repeatedly halved and the covered extent repeatedly doubled,
/// so implementations must represent both exactly for powers of two. This is
/// why only binary floating-point types implement it.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Smallest node span the default configuration descends to.
    const DEFAULT_MIN_SPAN: Self;

    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// One value for the scalar type.
    fn one() -> Self;

    /// Max of the two scalar values.
    fn max(a: Self, b: Self) -> Self;

    /// Half of the value.
    fn half(v: Self) -> Self;

    /// Twice the value.
    fn double(v: Self) -> Self;

    /// Negation.
    fn neg(v: Self) -> Self;

    /// Whether the value is neither NaN nor infinite.
    fn is_finite(v: Self) -> bool;
}

impl Scalar for f32 {
    // 2^-16
    const DEFAULT_MIN_SPAN: Self = 1.0 / 65536.0;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline(always)]
    fn zero() -> Self {
        0.0
    }

    #[inline(always)]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn max(a: Self, b: Self) -> Self {
        Self::max(a, b)
    }

    #[inline]
    fn half(v: Self) -> Self {
        0.5 * v
    }

    #[inline]
    fn double(v: Self) -> Self {
        2.0 * v
    }

    #[inline]
    fn neg(v: Self) -> Self {
        -v
    }

    #[inline]
    fn is_finite(v: Self) -> bool {
        Self::is_finite(v)
    }
}

impl Scalar for f64 {
    // 2^-16
    const DEFAULT_MIN_SPAN: Self = 1.0 / 65536.0;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline(always)]
    fn zero() -> Self {
        0.0
    }

    #[inline(always)]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn max(a: Self, b: Self) -> Self {
        Self::max(a, b)
    }

    #[inline]
    fn half(v: Self) -> Self {
        0.5 * v
    }

    #[inline]
    fn double(v: Self) -> Self {
        2.0 * v
    }

    #[inline]
    fn neg(v: Self) -> Self {
        -v
    }

    #[inline]
    fn is_finite(v: Self) -> bool {
        Self::is_finite(v)
    }
}

/// A rectangle paired with a caller-defined payload handle.
///
/// The quadtree never inspects the payload beyond equality: removal finds an
/// entry by comparing payloads, so callers typically use a stable id or slot
/// index that is unique per live object.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Entry<T, P> {
    /// Bounds of the object.
    pub area: Rect<T>,
    /// Identity handle of the object.
    pub payload: P,
}

impl<T, P> Entry<T, P> {
    /// Pair an area with a payload.
    #[inline]
    pub const fn new(area: Rect<T>, payload: P) -> Self {
        Self { area, payload }
    }
}

#[cfg(feature = "kurbo")]
impl From<kurbo::Rect> for Rect<f64> {
    #[inline]
    fn from(r: kurbo::Rect) -> Self {
        Self::new(r.x0, r.y0, r.x1, r.y1)
    }
}

#[cfg(feature = "kurbo")]
impl From<Rect<f64>> for kurbo::Rect {
    #[inline]
    fn from(r: Rect<f64>) -> Self {
        Self::new(r.left, r.top, r.right, r.bottom)
    }
}
