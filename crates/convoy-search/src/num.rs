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

//! # Solver Numeric Trait
//!
//! Unified numeric bounds for search and solver components. Edge costs are
//! real-valued with interval uncertainty, so the solvers are generic over
//! floating-point types rather than integers. `SolverFloat` collects the
//! required capabilities into a single alias: `num_traits::Float` for the
//! arithmetic, `FromPrimitive` for conversions from literals and counters,
//! and formatting plus thread-safety bounds for reporting and monitors.

use num_traits::{Float, FromPrimitive};

/// A trait alias for floating-point types usable throughout the solvers.
/// In practice these are `f32` and `f64`.
pub trait SolverFloat:
    Float + FromPrimitive + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static
{
}

impl<T> SolverFloat for T where
    T: Float + FromPrimitive + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static
{
}
