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

//! # Convoy Branch-and-Bound
//!
//! An exact depot-rooted branch-and-bound engine for capacitated vehicle
//! routing. Routes are built arc by arc from the depot under capacity
//! propagation and symmetry-reduced branching; completed routings are handed
//! to a pluggable [`handler::CandidateHandler`], which either accepts them
//! (possibly adjusting the objective) or tightens the relaxation for the
//! rest of the search. With the pass-through handler the engine is a plain
//! exact CVRP solver, exposed through [`cvrp::CvrpSolver`].

pub mod bnb;
pub mod bound;
pub mod cvrp;
pub mod handler;
pub mod savings;
pub mod stack;
pub mod state;
pub mod trail;
