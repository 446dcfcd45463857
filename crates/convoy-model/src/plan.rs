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

//! # Routing Solutions
//!
//! A [`RoutePlan`] is the arc-level description of a routing: the ordered
//! list of directed arcs traversed by the fleet, together with the objective
//! value the producing solver attached to it. Routes always start and end at
//! the depot; [`RoutePlan::routes`] recovers the node sequences from the arc
//! list.
//!
//! [`EdgeSelection`] is the undirected projection of a plan, used when only
//! edge membership matters (scenario construction, cut evaluation).

use crate::{
    index::{NodeIndex, DEPOT},
    matrix::CostMatrix,
};
use fixedbitset::FixedBitSet;
use num_traits::Float;

/// A complete routing: the set of directed depot-rooted arcs traversed by
/// the fleet and the objective value under the cost model it was solved for.
#[derive(Clone, PartialEq, Debug)]
pub struct RoutePlan<T> {
    /// The objective value under the cost matrix this plan was solved for.
    objective_value: T,

    /// Directed arcs in traversal order. Each route contributes a contiguous
    /// run starting and ending at the depot.
    arcs: Vec<(NodeIndex, NodeIndex)>,
}

impl<T> RoutePlan<T>
where
    T: Float,
{
    /// Constructs a new `RoutePlan`.
    #[inline]
    pub fn new(objective_value: T, arcs: Vec<(NodeIndex, NodeIndex)>) -> Self {
        Self {
            objective_value,
            arcs,
        }
    }

    /// The objective value the producing solver attached to this plan.
    #[inline]
    pub fn objective_value(&self) -> T {
        self.objective_value
    }

    /// The directed arcs of this plan in traversal order.
    #[inline]
    pub fn arcs(&self) -> &[(NodeIndex, NodeIndex)] {
        &self.arcs
    }

    /// The number of directed arcs.
    #[inline]
    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    /// Consumes this plan and returns its arc list.
    #[inline]
    pub fn into_arcs(self) -> Vec<(NodeIndex, NodeIndex)> {
        self.arcs
    }

    /// Recomputes the cost of this plan under an arbitrary cost matrix.
    pub fn cost_under(&self, costs: &CostMatrix<T>) -> T {
        self.arcs
            .iter()
            .fold(T::zero(), |acc, &(i, j)| acc + costs.get(i, j))
    }

    /// Returns a copy of this plan with its objective value replaced by the
    /// cost under the given matrix.
    pub fn reevaluated_under(&self, costs: &CostMatrix<T>) -> Self {
        Self {
            objective_value: self.cost_under(costs),
            arcs: self.arcs.clone(),
        }
    }

    /// Decomposes the arc list into routes, each a node sequence starting
    /// and ending at the depot.
    ///
    /// Arcs are expected in traversal order as produced by the solvers. A
    /// malformed arc list (a route that never returns to the depot) yields
    /// the partial route as-is.
    pub fn routes(&self) -> Vec<Vec<NodeIndex>> {
        let mut routes = Vec::new();
        let mut current: Vec<NodeIndex> = Vec::new();
        for &(from, to) in &self.arcs {
            if current.is_empty() {
                current.push(from);
            }
            current.push(to);
            if to == DEPOT {
                routes.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            routes.push(current);
        }
        routes
    }

    /// The undirected edge set of this plan over a graph of `num_nodes`
    /// nodes.
    pub fn selection(&self, num_nodes: usize) -> EdgeSelection {
        let mut selection = EdgeSelection::empty(num_nodes);
        for &(i, j) in &self.arcs {
            selection.insert(i, j);
        }
        selection
    }
}

impl<T> std::fmt::Display for RoutePlan<T>
where
    T: Float + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Route Plan")?;
        writeln!(f, "   Objective Value: {}", self.objective_value)?;
        for (k, route) in self.routes().iter().enumerate() {
            let stops: Vec<String> = route.iter().map(|n| n.get().to_string()).collect();
            writeln!(f, "   Route {}: {}", k, stops.join(" -> "))?;
        }
        Ok(())
    }
}

/// An undirected set of edges over a fixed node count.
///
/// Membership is direction-agnostic: inserting `(i, j)` makes both
/// `contains(i, j)` and `contains(j, i)` true. Backed by a bitset over the
/// upper triangle of the adjacency matrix.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EdgeSelection {
    num_nodes: usize,
    bits: FixedBitSet,
}

impl EdgeSelection {
    /// Creates an empty selection over `num_nodes` nodes.
    pub fn empty(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            bits: FixedBitSet::with_capacity(num_nodes * num_nodes),
        }
    }

    /// The node count this selection is defined over.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline]
    fn slot(&self, i: NodeIndex, j: NodeIndex) -> usize {
        let (lo, hi) = if i.get() <= j.get() { (i, j) } else { (j, i) };
        lo.get() * self.num_nodes + hi.get()
    }

    /// Inserts the undirected edge between `i` and `j`. Self-loops are
    /// ignored.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn insert(&mut self, i: NodeIndex, j: NodeIndex) {
        assert!(
            i.get() < self.num_nodes && j.get() < self.num_nodes,
            "called `EdgeSelection::insert` with index out of bounds: num_nodes is {} but indices are ({}, {})",
            self.num_nodes,
            i.get(),
            j.get()
        );
        if i == j {
            return;
        }
        let slot = self.slot(i, j);
        self.bits.insert(slot);
    }

    /// Whether the undirected edge between `i` and `j` is selected, in
    /// either direction.
    #[inline]
    pub fn contains(&self, i: NodeIndex, j: NodeIndex) -> bool {
        if i == j || i.get() >= self.num_nodes || j.get() >= self.num_nodes {
            return false;
        }
        self.bits.contains(self.slot(i, j))
    }

    /// The number of selected edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Whether no edge is selected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the selected edges as `(i, j)` with `i < j`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        let n = self.num_nodes;
        self.bits
            .ones()
            .map(move |slot| (NodeIndex::new(slot / n), NodeIndex::new(slot % n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn arc(i: usize, j: usize) -> (NodeIndex, NodeIndex) {
        (node(i), node(j))
    }

    fn two_route_plan() -> RoutePlan<f64> {
        // Route 0: 0 -> 1 -> 2 -> 0, Route 1: 0 -> 3 -> 0.
        RoutePlan::new(
            42.0,
            vec![arc(0, 1), arc(1, 2), arc(2, 0), arc(0, 3), arc(3, 0)],
        )
    }

    #[test]
    fn test_basic_accessors() {
        let plan = two_route_plan();
        assert_eq!(plan.objective_value(), 42.0);
        assert_eq!(plan.num_arcs(), 5);
        assert_eq!(plan.arcs()[0], arc(0, 1));
    }

    #[test]
    fn test_routes_decomposition() {
        let plan = two_route_plan();
        let routes = plan.routes();
        assert_eq!(routes.len(), 2);
        assert_eq!(
            routes[0],
            vec![node(0), node(1), node(2), node(0)]
        );
        assert_eq!(routes[1], vec![node(0), node(3), node(0)]);
    }

    #[test]
    fn test_cost_under_sums_directed_arcs() {
        let mut costs = CostMatrix::<f64>::zeros(4);
        costs.set_symmetric(node(0), node(1), 1.0);
        costs.set_symmetric(node(1), node(2), 2.0);
        costs.set_symmetric(node(0), node(2), 3.0);
        costs.set_symmetric(node(0), node(3), 4.0);

        let plan = two_route_plan();
        // 1 + 2 + 3 + 4 + 4: the out-and-back route pays edge (0, 3) twice.
        assert_eq!(plan.cost_under(&costs), 14.0);
        assert_eq!(plan.reevaluated_under(&costs).objective_value(), 14.0);
    }

    #[test]
    fn test_selection_is_undirected() {
        let plan = two_route_plan();
        let sel = plan.selection(4);
        assert!(sel.contains(node(0), node(1)));
        assert!(sel.contains(node(1), node(0)));
        assert!(sel.contains(node(3), node(0)));
        assert!(!sel.contains(node(1), node(3)));
        // Both directions of (0, 3) collapse into one edge.
        assert_eq!(sel.len(), 4);
    }

    #[test]
    fn test_selection_edges_are_canonical() {
        let mut sel = EdgeSelection::empty(3);
        sel.insert(node(2), node(0));
        sel.insert(node(1), node(2));
        let edges: Vec<_> = sel.edges().map(|(i, j)| (i.get(), j.get())).collect();
        assert_eq!(edges, vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn test_selection_ignores_self_loops() {
        let mut sel = EdgeSelection::empty(3);
        sel.insert(node(1), node(1));
        assert!(sel.is_empty());
        assert!(!sel.contains(node(1), node(1)));
    }
}
