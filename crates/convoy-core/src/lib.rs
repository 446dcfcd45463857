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

//! # Convoy Core
//!
//! Foundational utilities and math primitives for the Convoy routing
//! ecosystem. This crate consolidates reusable building blocks that underpin
//! the higher-level model and solver crates.
//!
//! ## Modules
//!
//! - `math`: Closed cost intervals `[lo, hi]` with validation, width and
//!   containment queries, used to represent uncertain edge costs.
//! - `num`: Epsilon-based floating-point comparison helpers. Edge costs are
//!   real-valued, so exact equality is never meaningful; every comparison in
//!   the solver pipeline goes through these helpers.
//! - `utils`: Phantom-tagged, strongly typed indices (`TypedIndex<T>`)
//!   preventing accidental mixing of index spaces.

pub mod math;
pub mod num;
pub mod utils;
