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

//! # Robust Routing Instances
//!
//! The immutable problem definition shared by every solver component: a
//! depot, `n` customers with non-negative demands, a uniform vehicle
//! capacity, and symmetric interval-bounded edge costs. The fleet size is
//! deliberately unconstrained: any number of vehicles may depart the depot.
//!
//! Instances are constructed through [`InstanceBuilder`] and never mutated
//! afterwards. All solver state is recreated per instance.

use crate::{
    index::{NodeIndex, DEPOT},
    matrix::CostMatrix,
};
use convoy_core::math::interval::CostInterval;
use num_traits::Float;

/// An immutable robust CVRP instance.
#[derive(Clone, PartialEq, Debug)]
pub struct Instance<T> {
    capacity: T,
    demands: Vec<T>,
    lower: CostMatrix<T>,
    upper: CostMatrix<T>,
}

impl<T> Instance<T>
where
    T: Float,
{
    /// The number of customers `n` (excluding the depot).
    #[inline]
    pub fn num_customers(&self) -> usize {
        self.demands.len() - 1
    }

    /// The number of nodes including the depot, i.e. `n + 1`.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.demands.len()
    }

    /// The uniform vehicle capacity.
    #[inline]
    pub fn capacity(&self) -> T {
        self.capacity
    }

    /// The demand of a node. The depot always has demand zero.
    ///
    /// # Panics
    ///
    /// Panics if the node is out of bounds.
    #[inline]
    pub fn demand(&self, node: NodeIndex) -> T {
        self.demands[node.get()]
    }

    /// The lower cost bound of the edge between `i` and `j`.
    #[inline]
    pub fn lower(&self, i: NodeIndex, j: NodeIndex) -> T {
        self.lower.get(i, j)
    }

    /// The upper cost bound of the edge between `i` and `j`.
    #[inline]
    pub fn upper(&self, i: NodeIndex, j: NodeIndex) -> T {
        self.upper.get(i, j)
    }

    /// The cost interval of the edge between `i` and `j`.
    #[inline]
    pub fn interval(&self, i: NodeIndex, j: NodeIndex) -> CostInterval<T> {
        CostInterval::new(self.lower.get(i, j), self.upper.get(i, j))
    }

    /// The full matrix of lower cost bounds.
    #[inline]
    pub fn lower_matrix(&self) -> &CostMatrix<T> {
        &self.lower
    }

    /// The full matrix of upper cost bounds.
    #[inline]
    pub fn upper_matrix(&self) -> &CostMatrix<T> {
        &self.upper
    }

    /// Iterates over all customer nodes `1..=n`.
    pub fn customers(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        (1..self.num_nodes()).map(NodeIndex::new)
    }

    /// Whether every edge interval is degenerate up to `eps`, i.e. the
    /// instance carries no cost uncertainty at all.
    pub fn is_deterministic(&self, eps: T) -> bool {
        self.upper
            .edges()
            .all(|(i, j)| self.interval(i, j).is_exact(eps))
    }

    /// Whether every cost bound is integer-valued up to `eps`. The
    /// integer-rounding bound adjustment is only sound in that case.
    pub fn has_integral_costs(&self, eps: T) -> bool {
        self.upper.edges().all(|(i, j)| {
            let lo = self.lower.get(i, j);
            let hi = self.upper.get(i, j);
            (lo - lo.round()).abs() <= eps && (hi - hi.round()).abs() <= eps
        })
    }

    /// Upper bound on the cost of any routing under any scenario: the sum of
    /// all upper bounds counted once per arc direction. Used as the cap on
    /// the master problem's regret surrogate.
    #[inline]
    pub fn surrogate_cap(&self) -> T {
        self.upper.directed_sum()
    }
}

/// Builder for [`Instance`].
///
/// Demands default to zero and every edge interval defaults to `[0, 0]`;
/// the builder validates on `build` that no demand is negative and that the
/// depot demand was not set.
#[derive(Clone, Debug)]
pub struct InstanceBuilder<T> {
    capacity: T,
    demands: Vec<T>,
    lower: CostMatrix<T>,
    upper: CostMatrix<T>,
}

impl<T> InstanceBuilder<T>
where
    T: Float,
{
    /// Creates a builder for an instance with `num_customers` customers and
    /// the given uniform capacity.
    ///
    /// # Panics
    ///
    /// Panics if `num_customers` is zero or the capacity is not positive.
    pub fn new(num_customers: usize, capacity: T) -> Self {
        assert!(
            num_customers > 0,
            "called `InstanceBuilder::new` with zero customers"
        );
        assert!(
            capacity > T::zero(),
            "called `InstanceBuilder::new` with non-positive capacity"
        );
        let dim = num_customers + 1;
        Self {
            capacity,
            demands: vec![T::zero(); dim],
            lower: CostMatrix::zeros(dim),
            upper: CostMatrix::zeros(dim),
        }
    }

    /// Sets the demand of a customer.
    ///
    /// # Panics
    ///
    /// Panics if the node is the depot, out of bounds, or the demand is
    /// negative.
    pub fn set_demand(&mut self, customer: NodeIndex, demand: T) -> &mut Self {
        assert!(
            customer != DEPOT,
            "called `InstanceBuilder::set_demand` for the depot"
        );
        assert!(
            customer.get() < self.demands.len(),
            "called `InstanceBuilder::set_demand` with node index out of bounds: the len is {} but the index is {}",
            self.demands.len(),
            customer.get()
        );
        assert!(
            demand >= T::zero(),
            "called `InstanceBuilder::set_demand` with negative demand"
        );
        self.demands[customer.get()] = demand;
        self
    }

    /// Sets the cost interval of the edge between `i` and `j`, symmetric in
    /// both directions.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi` or either index is out of bounds.
    pub fn set_edge_bounds(&mut self, i: NodeIndex, j: NodeIndex, lo: T, hi: T) -> &mut Self {
        assert!(
            lo <= hi,
            "called `InstanceBuilder::set_edge_bounds` with lo > hi"
        );
        self.lower.set_symmetric(i, j, lo);
        self.upper.set_symmetric(i, j, hi);
        self
    }

    /// Sets a deterministic edge cost, i.e. the degenerate interval `[c, c]`.
    pub fn set_edge_cost(&mut self, i: NodeIndex, j: NodeIndex, cost: T) -> &mut Self {
        self.set_edge_bounds(i, j, cost, cost)
    }

    /// Finalizes the instance.
    pub fn build(self) -> Instance<T> {
        Instance {
            capacity: self.capacity,
            demands: self.demands,
            lower: self.lower,
            upper: self.upper,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn small_instance() -> Instance<f64> {
        let mut b = InstanceBuilder::new(2, 10.0);
        b.set_demand(node(1), 3.0)
            .set_demand(node(2), 4.0)
            .set_edge_bounds(node(0), node(1), 1.0, 2.0)
            .set_edge_bounds(node(0), node(2), 2.0, 3.0)
            .set_edge_bounds(node(1), node(2), 1.5, 1.5);
        b.build()
    }

    #[test]
    fn test_dimensions_and_accessors() {
        let ins = small_instance();
        assert_eq!(ins.num_customers(), 2);
        assert_eq!(ins.num_nodes(), 3);
        assert_eq!(ins.capacity(), 10.0);
        assert_eq!(ins.demand(DEPOT), 0.0);
        assert_eq!(ins.demand(node(1)), 3.0);
        assert_eq!(ins.lower(node(0), node(1)), 1.0);
        assert_eq!(ins.upper(node(1), node(0)), 2.0);
        assert_eq!(ins.interval(node(0), node(2)).width(), 1.0);
    }

    #[test]
    fn test_customers_excludes_depot() {
        let ins = small_instance();
        let customers: Vec<_> = ins.customers().map(|c| c.get()).collect();
        assert_eq!(customers, vec![1, 2]);
    }

    #[test]
    fn test_is_deterministic() {
        let ins = small_instance();
        assert!(!ins.is_deterministic(1e-4));

        let mut b = InstanceBuilder::new(1, 5.0);
        b.set_demand(node(1), 1.0).set_edge_cost(node(0), node(1), 5.0);
        assert!(b.build().is_deterministic(1e-4));
    }

    #[test]
    fn test_has_integral_costs() {
        let ins = small_instance();
        assert!(!ins.has_integral_costs(1e-4)); // 1.5 on edge (1, 2)

        let mut b = InstanceBuilder::new(1, 5.0);
        b.set_demand(node(1), 1.0).set_edge_bounds(node(0), node(1), 3.0, 7.0);
        assert!(b.build().has_integral_costs(1e-4));
    }

    #[test]
    fn test_surrogate_cap_is_directed_sum_of_upper_bounds() {
        let ins = small_instance();
        assert_eq!(ins.surrogate_cap(), 2.0 * (2.0 + 3.0 + 1.5));
    }

    #[test]
    #[should_panic(expected = "depot")]
    fn test_set_demand_rejects_depot() {
        let mut b = InstanceBuilder::<f64>::new(1, 5.0);
        b.set_demand(DEPOT, 1.0);
    }

    #[test]
    #[should_panic(expected = "lo > hi")]
    fn test_set_edge_bounds_rejects_inverted_interval() {
        let mut b = InstanceBuilder::<f64>::new(1, 5.0);
        b.set_edge_bounds(node(0), node(1), 2.0, 1.0);
    }
}
