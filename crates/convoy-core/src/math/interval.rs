// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Cost Intervals
//!
//! A closed interval `[lo, hi]` over a floating-point cost type. Every edge
//! of a robust routing instance carries one such interval: the true travel
//! cost is unknown but guaranteed to lie within the bounds. A degenerate
//! interval (`lo == hi` up to tolerance) represents a deterministic edge.

use crate::num::approx::approx_eq;
use num_traits::Float;

/// A closed interval `[lo, hi]` of possible costs for a single edge.
///
/// Invariant: `lo <= hi`. Construction through [`CostInterval::new`] panics
/// on violation; [`CostInterval::try_new`] returns `None` instead.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CostInterval<T> {
    lo: T,
    hi: T,
}

impl<T> CostInterval<T>
where
    T: Float,
{
    /// Creates a new interval from its bounds.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi` or either bound is NaN.
    #[inline]
    pub fn new(lo: T, hi: T) -> Self {
        Self::try_new(lo, hi).expect("called `CostInterval::new` with lo > hi or NaN bounds")
    }

    /// Creates a new interval, returning `None` if `lo > hi` or a bound is NaN.
    #[inline]
    pub fn try_new(lo: T, hi: T) -> Option<Self> {
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return None;
        }
        Some(Self { lo, hi })
    }

    /// Creates a degenerate interval `[v, v]`.
    #[inline]
    pub fn exact(v: T) -> Self {
        Self::new(v, v)
    }

    /// The lower bound of the interval.
    #[inline]
    pub fn lo(&self) -> T {
        self.lo
    }

    /// The upper bound of the interval.
    #[inline]
    pub fn hi(&self) -> T {
        self.hi
    }

    /// The width `hi - lo` of the interval.
    #[inline]
    pub fn width(&self) -> T {
        self.hi - self.lo
    }

    /// Whether the interval is degenerate up to `eps`, i.e. the edge cost
    /// is effectively deterministic.
    #[inline]
    pub fn is_exact(&self, eps: T) -> bool {
        approx_eq(self.lo, self.hi, eps)
    }

    /// Whether `v` lies within the interval (inclusive on both sides).
    #[inline]
    pub fn contains(&self, v: T) -> bool {
        self.lo <= v && v <= self.hi
    }

    /// The midpoint of the interval.
    #[inline]
    pub fn midpoint(&self) -> T {
        let two = T::one() + T::one();
        self.lo + self.width() / two
    }
}

impl<T> std::fmt::Display for CostInterval<T>
where
    T: Float + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}
