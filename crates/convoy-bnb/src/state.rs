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

//! # Search State
//!
//! The mutable routing state of one branch-and-bound node: which customers
//! are visited, the tail of the currently open route, its accumulated load,
//! the partial linear cost, and the arcs committed so far.
//!
//! ## Invariants
//!
//! - When `tail` is the depot there is no open route: `route_first` is the
//!   depot and `route_load` is zero.
//! - `boundary` is the first customer of the most recently started route;
//!   routes are started in strictly increasing order of their first
//!   customer, which removes the permutation symmetry between routes.
//! - A route is only closed from a tail not smaller than its first
//!   customer, which removes the orientation symmetry within a route.

use convoy_model::index::{NodeIndex, DEPOT};
use fixedbitset::FixedBitSet;
use num_traits::Float;

/// The mutable state of one search node.
#[derive(Clone, Debug)]
pub struct SearchState<T> {
    visited: FixedBitSet,
    num_visited: usize,
    tail: NodeIndex,
    route_first: NodeIndex,
    boundary: NodeIndex,
    route_load: T,
    partial_cost: T,
    arcs: Vec<(NodeIndex, NodeIndex)>,
}

/// Everything needed to undo one applied branching move.
#[derive(Clone, Copy, Debug)]
pub struct UndoToken<T> {
    prev_tail: NodeIndex,
    prev_route_first: NodeIndex,
    prev_boundary: NodeIndex,
    prev_route_load: T,
    prev_partial_cost: T,
    visited_node: Option<NodeIndex>,
}

impl<T> SearchState<T>
where
    T: Float,
{
    /// Creates the root state for a graph of `num_nodes` nodes.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            visited: FixedBitSet::with_capacity(num_nodes),
            num_visited: 0,
            tail: DEPOT,
            route_first: DEPOT,
            boundary: DEPOT,
            route_load: T::zero(),
            partial_cost: T::zero(),
            arcs: Vec::with_capacity(num_nodes + num_nodes / 2),
        }
    }

    /// The number of customers visited so far.
    #[inline]
    pub fn num_visited(&self) -> usize {
        self.num_visited
    }

    /// The tail node of the open route, or the depot if no route is open.
    #[inline]
    pub fn tail(&self) -> NodeIndex {
        self.tail
    }

    /// The first customer of the open route, or the depot if no route is open.
    #[inline]
    pub fn route_first(&self) -> NodeIndex {
        self.route_first
    }

    /// The first customer of the most recently started route.
    #[inline]
    pub fn boundary(&self) -> NodeIndex {
        self.boundary
    }

    /// The accumulated demand of the open route.
    #[inline]
    pub fn route_load(&self) -> T {
        self.route_load
    }

    /// The linear cost of all committed arcs.
    #[inline]
    pub fn partial_cost(&self) -> T {
        self.partial_cost
    }

    /// The arcs committed so far, in traversal order.
    #[inline]
    pub fn arcs(&self) -> &[(NodeIndex, NodeIndex)] {
        &self.arcs
    }

    /// Whether there is an open route.
    #[inline]
    pub fn has_open_route(&self) -> bool {
        self.tail != DEPOT
    }

    /// Whether a customer has been visited.
    ///
    /// # Panics
    ///
    /// Panics if the node is out of bounds.
    #[inline]
    pub fn is_visited(&self, node: NodeIndex) -> bool {
        self.visited.contains(node.get())
    }

    /// Whether every customer is visited and the last route is closed.
    #[inline]
    pub fn is_complete(&self, num_customers: usize) -> bool {
        self.num_visited == num_customers && self.tail == DEPOT
    }

    /// Commits one branching move: extend the open route to `target`, start
    /// a new route at `target`, or close the open route when `target` is the
    /// depot. Returns the token that undoes the move.
    ///
    /// # Panics
    ///
    /// In debug builds, panics when the move violates a state invariant
    /// (revisiting a customer, closing without an open route).
    pub fn apply(&mut self, target: NodeIndex, arc_cost: T, target_demand: T) -> UndoToken<T> {
        let token = UndoToken {
            prev_tail: self.tail,
            prev_route_first: self.route_first,
            prev_boundary: self.boundary,
            prev_route_load: self.route_load,
            prev_partial_cost: self.partial_cost,
            visited_node: (target != DEPOT).then_some(target),
        };

        self.arcs.push((self.tail, target));
        self.partial_cost = self.partial_cost + arc_cost;

        if target == DEPOT {
            debug_assert!(
                self.tail != DEPOT,
                "called `SearchState::apply` closing a route that is not open"
            );
            self.tail = DEPOT;
            self.route_first = DEPOT;
            self.route_load = T::zero();
        } else {
            debug_assert!(
                !self.visited.contains(target.get()),
                "called `SearchState::apply` revisiting customer {}",
                target
            );
            self.visited.insert(target.get());
            self.num_visited += 1;
            if self.tail == DEPOT {
                // Starting a new route at `target`.
                self.route_first = target;
                self.boundary = target;
                self.route_load = target_demand;
            } else {
                self.route_load = self.route_load + target_demand;
            }
            self.tail = target;
        }

        token
    }

    /// Undoes the most recent move.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if no move has been applied.
    pub fn restore(&mut self, token: UndoToken<T>) {
        debug_assert!(
            !self.arcs.is_empty(),
            "called `SearchState::restore` on a root state"
        );
        self.arcs.pop();
        if let Some(node) = token.visited_node {
            self.visited.remove(node.get());
            self.num_visited -= 1;
        }
        self.tail = token.prev_tail;
        self.route_first = token.prev_route_first;
        self.boundary = token.prev_boundary;
        self.route_load = token.prev_route_load;
        self.partial_cost = token.prev_partial_cost;
    }

    /// Resets to the root state without deallocating.
    pub fn reset(&mut self) {
        self.visited.clear();
        self.num_visited = 0;
        self.tail = DEPOT;
        self.route_first = DEPOT;
        self.boundary = DEPOT;
        self.route_load = T::zero();
        self.partial_cost = T::zero();
        self.arcs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn test_root_state() {
        let state = SearchState::<f64>::new(4);
        assert_eq!(state.num_visited(), 0);
        assert_eq!(state.tail(), DEPOT);
        assert!(!state.has_open_route());
        assert!(state.arcs().is_empty());
        assert!(!state.is_complete(3));
    }

    #[test]
    fn test_apply_and_restore_roundtrip() {
        let mut state = SearchState::<f64>::new(3);

        let t1 = state.apply(node(1), 2.0, 0.4);
        assert_eq!(state.tail(), node(1));
        assert_eq!(state.route_first(), node(1));
        assert_eq!(state.boundary(), node(1));
        assert_eq!(state.route_load(), 0.4);
        assert_eq!(state.partial_cost(), 2.0);
        assert!(state.is_visited(node(1)));

        let t2 = state.apply(node(2), 1.5, 0.3);
        assert_eq!(state.tail(), node(2));
        assert_eq!(state.route_first(), node(1));
        assert_eq!(state.route_load(), 0.7);

        let t3 = state.apply(DEPOT, 3.0, 0.0);
        assert_eq!(state.tail(), DEPOT);
        assert_eq!(state.route_load(), 0.0);
        assert!(state.is_complete(2));
        assert_eq!(state.partial_cost(), 6.5);

        state.restore(t3);
        assert_eq!(state.tail(), node(2));
        assert_eq!(state.route_load(), 0.7);
        state.restore(t2);
        assert!(!state.is_visited(node(2)));
        state.restore(t1);
        assert_eq!(state.num_visited(), 0);
        assert_eq!(state.partial_cost(), 0.0);
        assert!(state.arcs().is_empty());
    }

    #[test]
    fn test_boundary_survives_route_close() {
        let mut state = SearchState::<f64>::new(4);
        state.apply(node(1), 1.0, 0.5);
        state.apply(DEPOT, 1.0, 0.0);
        // The boundary keeps the first customer of the closed route, so the
        // next route must start beyond it.
        assert_eq!(state.boundary(), node(1));
        state.apply(node(3), 2.0, 0.5);
        assert_eq!(state.boundary(), node(3));
    }

    #[test]
    fn test_reset_returns_to_root() {
        let mut state = SearchState::<f64>::new(3);
        state.apply(node(1), 2.0, 0.4);
        state.reset();
        assert_eq!(state.num_visited(), 0);
        assert_eq!(state.partial_cost(), 0.0);
        assert!(!state.is_visited(node(1)));
    }
}
