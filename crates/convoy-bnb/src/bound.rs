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

//! # Completion Bound
//!
//! An admissible lower bound on the cost of completing a partial routing.
//! Every unvisited customer still needs one entering arc, so its cheapest
//! incoming arc is a valid per-customer bound; on top of that at least one
//! more arc must enter the depot whenever a route is still open or
//! customers remain. Assumes non-negative arc costs.

use crate::state::SearchState;
use convoy_model::{
    index::{NodeIndex, DEPOT},
    matrix::CostMatrix,
};
use num_traits::Float;

/// Precomputed per-matrix data for the completion bound.
#[derive(Clone, Debug)]
pub struct CompletionBound<T> {
    /// `min_incoming[c]` is the cheapest arc entering customer `c` from any
    /// other node. Index 0 (the depot) is unused and kept at zero.
    min_incoming: Vec<T>,
    /// The cheapest arc entering the depot from any customer.
    min_return: T,
}

impl<T> CompletionBound<T>
where
    T: Float,
{
    /// Precomputes the bound data for a cost matrix.
    pub fn new(costs: &CostMatrix<T>) -> Self {
        let dim = costs.dim();
        let mut min_incoming = vec![T::zero(); dim];
        let mut min_return = T::infinity();

        for c in 1..dim {
            let target = NodeIndex::new(c);
            let mut cheapest = T::infinity();
            for j in 0..dim {
                if j == c {
                    continue;
                }
                let cost = costs.get(NodeIndex::new(j), target);
                if cost < cheapest {
                    cheapest = cost;
                }
            }
            min_incoming[c] = cheapest;

            let return_cost = costs.get(target, DEPOT);
            if return_cost < min_return {
                min_return = return_cost;
            }
        }

        Self {
            min_incoming,
            min_return,
        }
    }

    /// A lower bound on the cost still needed to complete the routing from
    /// the given state.
    pub fn remaining_cost(&self, state: &SearchState<T>, costs: &CostMatrix<T>) -> T {
        let num_customers = self.min_incoming.len() - 1;
        let mut remaining = T::zero();
        let mut any_unvisited = false;

        for c in 1..=num_customers {
            let node = NodeIndex::new(c);
            if !state.is_visited(node) {
                remaining = remaining + self.min_incoming[c];
                any_unvisited = true;
            }
        }

        if state.has_open_route() {
            if any_unvisited {
                // The open route closes through some customer eventually.
                remaining = remaining + self.min_return;
            } else {
                // Only the direct return remains, so use its exact cost.
                remaining = remaining + costs.get(state.tail(), DEPOT);
            }
        } else if any_unvisited {
            remaining = remaining + self.min_return;
        }

        remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn costs() -> CostMatrix<f64> {
        let mut m = CostMatrix::zeros(3);
        m.set_symmetric(node(0), node(1), 2.0);
        m.set_symmetric(node(0), node(2), 5.0);
        m.set_symmetric(node(1), node(2), 1.0);
        m
    }

    #[test]
    fn test_precomputed_minima() {
        let bound = CompletionBound::new(&costs());
        assert_eq!(bound.min_incoming[1], 1.0); // from 2
        assert_eq!(bound.min_incoming[2], 1.0); // from 1
        assert_eq!(bound.min_return, 2.0); // edge (0, 1)
    }

    #[test]
    fn test_root_bound_counts_all_customers_and_one_return() {
        let costs = costs();
        let bound = CompletionBound::new(&costs);
        let state = SearchState::<f64>::new(3);
        // 1 + 1 entering arcs plus one depot return.
        assert_eq!(bound.remaining_cost(&state, &costs), 4.0);
    }

    #[test]
    fn test_exact_return_when_only_close_remains() {
        let costs = costs();
        let bound = CompletionBound::new(&costs);
        let mut state = SearchState::<f64>::new(3);
        state.apply(node(1), 2.0, 0.1);
        state.apply(node(2), 1.0, 0.1);
        // Tail is customer 2; the only remaining cost is its depot return.
        assert_eq!(bound.remaining_cost(&state, &costs), 5.0);
    }

    #[test]
    fn test_zero_when_complete() {
        let costs = costs();
        let bound = CompletionBound::new(&costs);
        let mut state = SearchState::<f64>::new(3);
        state.apply(node(1), 2.0, 0.1);
        state.apply(node(2), 1.0, 0.1);
        state.apply(DEPOT, 5.0, 0.0);
        assert_eq!(bound.remaining_cost(&state, &costs), 0.0);
    }

    #[test]
    fn test_bound_never_exceeds_true_completion_cost() {
        let costs = costs();
        let bound = CompletionBound::new(&costs);
        let mut state = SearchState::<f64>::new(3);
        state.apply(node(1), 2.0, 0.1);
        // True cheapest completion: 1 -> 2 -> 0 costs 1 + 5 = 6.
        assert!(bound.remaining_cost(&state, &costs) <= 6.0);
    }
}
