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

//! # Optimality Cuts
//!
//! Each cut is generated from one rival routing `Y` found by the adversarial
//! subproblem. It bounds the regret surrogate of any candidate routing `x`
//! from above by `Y`'s cost under the worst scenario against `x`:
//!
//! ```text
//! r(x) <= sum over arcs a of Y of ( lo(a) + width(a) * [edge(a) used by x] )
//! ```
//!
//! Edge membership is undirected, matching the scenario oracle, so the cut
//! is tight at the candidate that generated it. Arcs of `Y` contribute
//! individually: an out-and-back route pays its edge twice.
//!
//! The pool deduplicates cuts by the multiset of their undirected edges and
//! tracks the smallest fully-raised right-hand side, which yields a valid
//! surrogate bound for pruning in the master search.

use convoy_model::{index::NodeIndex, instance::Instance, plan::{EdgeSelection, RoutePlan}};
use num_traits::Float;
use rustc_hash::FxHashSet;

/// One optimality cut, derived from a rival routing.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimalityCut<T> {
    /// The rival routing's directed arcs.
    arcs: Vec<(NodeIndex, NodeIndex)>,
    /// The right-hand side when every edge of the rival is raised, i.e. the
    /// rival's cost with all its edges at their upper bounds.
    upper_sum: T,
}

impl<T> OptimalityCut<T>
where
    T: Float,
{
    /// Builds the cut generated by a rival routing.
    pub fn from_plan(rival: &RoutePlan<T>, instance: &Instance<T>) -> Self {
        let arcs = rival.arcs().to_vec();
        let upper_sum = arcs
            .iter()
            .fold(T::zero(), |acc, &(i, j)| acc + instance.upper(i, j));
        Self { arcs, upper_sum }
    }

    /// The right-hand side when every edge of the rival is raised.
    #[inline]
    pub fn upper_sum(&self) -> T {
        self.upper_sum
    }

    /// Evaluates the cut's right-hand side against a candidate's edge
    /// selection: the rival's cost under the worst scenario for that
    /// candidate.
    pub fn rhs_at(&self, selection: &EdgeSelection, instance: &Instance<T>) -> T {
        self.arcs.iter().fold(T::zero(), |acc, &(i, j)| {
            if selection.contains(i, j) {
                acc + instance.upper(i, j)
            } else {
                acc + instance.lower(i, j)
            }
        })
    }

    /// The canonical dedup key: the sorted multiset of undirected edges.
    fn key(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .arcs
            .iter()
            .map(|&(i, j)| {
                let (a, b) = (i.get(), j.get());
                if a <= b {
                    (a, b)
                } else {
                    (b, a)
                }
            })
            .collect();
        edges.sort_unstable();
        edges
    }
}

/// The pool of optimality cuts accumulated during a master solve.
#[derive(Clone, Debug)]
pub struct CutPool<T> {
    cuts: Vec<OptimalityCut<T>>,
    seen: FxHashSet<Vec<(usize, usize)>>,
    min_upper_sum: T,
}

impl<T> Default for CutPool<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CutPool<T>
where
    T: Float,
{
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self {
            cuts: Vec::new(),
            seen: FxHashSet::default(),
            min_upper_sum: T::infinity(),
        }
    }

    /// The number of cuts in the pool.
    #[inline]
    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    /// Whether the pool holds no cut.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// Adds a cut unless an identical one (same undirected edge multiset) is
    /// already present. Returns whether the cut was added.
    pub fn add(&mut self, cut: OptimalityCut<T>) -> bool {
        if !self.seen.insert(cut.key()) {
            return false;
        }
        if cut.upper_sum() < self.min_upper_sum {
            self.min_upper_sum = cut.upper_sum();
        }
        self.cuts.push(cut);
        true
    }

    /// The tightest surrogate value for a candidate: the smallest cut
    /// right-hand side, capped by `r_cap`.
    pub fn tightest_rhs(&self, selection: &EdgeSelection, instance: &Instance<T>, r_cap: T) -> T {
        self.cuts.iter().fold(r_cap, |acc, cut| {
            let rhs = cut.rhs_at(selection, instance);
            if rhs < acc {
                rhs
            } else {
                acc
            }
        })
    }

    /// An upper bound on the surrogate over all candidates: no candidate's
    /// surrogate can exceed any cut's fully-raised right-hand side.
    #[inline]
    pub fn surrogate_bound(&self, r_cap: T) -> T {
        if self.min_upper_sum < r_cap {
            self.min_upper_sum
        } else {
            r_cap
        }
    }
}
