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

//! # Epsilon-Based Comparisons
//!
//! Costs throughout the pipeline are real-valued and must never be compared
//! with exact floating-point equality. All tolerance checks share a single
//! default epsilon of `1e-4`, used both for cut-violation tests and for
//! bound adjustments.

use num_traits::{Float, FromPrimitive};

/// The default comparison tolerance used across the solver pipeline.
pub const DEFAULT_EPS: f64 = 1e-4;

/// The default tolerance converted into the working float type.
#[inline]
pub fn default_eps<T>() -> T
where
    T: Float + FromPrimitive,
{
    T::from_f64(DEFAULT_EPS).expect("DEFAULT_EPS must be representable in the float type")
}

/// Whether `a` and `b` are equal up to `eps`.
#[inline]
pub fn approx_eq<T>(a: T, b: T, eps: T) -> bool
where
    T: Float,
{
    (a - b).abs() <= eps
}

/// Whether `a` is strictly less than `b` by more than `eps`.
///
/// This is the cut-violation test: a candidate surrogate value `b` is only
/// considered unachievable when the true value `a` undercuts it beyond the
/// tolerance.
#[inline]
pub fn definitely_lt<T>(a: T, b: T, eps: T) -> bool
where
    T: Float,
{
    a + eps < b
}

/// Whether `a` is less than or equal to `b` up to `eps`.
#[inline]
pub fn approx_le<T>(a: T, b: T, eps: T) -> bool
where
    T: Float,
{
    a <= b + eps
}
