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

//! # Convoy Robust
//!
//! Min-max-regret capacitated routing under interval-bounded edge costs,
//! solved by a Benders-style decomposition: a master branch-and-bound over
//! routings with a regret surrogate, lazily tightened by optimality cuts
//! derived from adversarial subproblem solves. The worst cost scenario of a
//! routing raises exactly the edges it uses to their upper bounds and drops
//! every other edge to its lower bound, so the adversary is evaluated with
//! one exact solve per candidate.
//!
//! Entry point: [`solver::RobustSolver`]. Post-hoc analysis of a committed
//! routing lives in [`regret`] and [`report`].

pub mod benders;
pub mod cuts;
pub mod oracle;
pub mod regret;
pub mod report;
pub mod solver;
