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

//! # Clarke-Wright Savings Construction
//!
//! The classical parallel savings heuristic: start with one out-and-back
//! route per customer, then repeatedly merge the route pair with the
//! largest positive saving `d(0,i) + d(0,j) - d(i,j)` whose endpoints `i`
//! and `j` can be joined without exceeding the vehicle capacity. The result
//! is a feasible (rarely optimal) routing used to warm-start the exact
//! search.
//!
//! Ties between equal savings break on the customer pair, so construction
//! is deterministic.

use convoy_model::{
    index::{NodeIndex, DEPOT},
    instance::Instance,
    matrix::CostMatrix,
    plan::RoutePlan,
};
use num_traits::Float;

/// Builds a feasible routing with the savings heuristic under the given
/// cost matrix. Returns `None` if some customer's demand alone exceeds the
/// capacity, in which case no routing exists at all.
pub fn clarke_wright<T>(
    instance: &Instance<T>,
    costs: &CostMatrix<T>,
    eps: T,
) -> Option<RoutePlan<T>>
where
    T: Float,
{
    let capacity = instance.capacity();
    for customer in instance.customers() {
        if instance.demand(customer) > capacity + eps {
            return None;
        }
    }

    let n = instance.num_customers();

    // One singleton route per customer; routes hold interior sequences only.
    let mut routes: Vec<Vec<NodeIndex>> = instance.customers().map(|c| vec![c]).collect();
    let mut loads: Vec<T> = instance.customers().map(|c| instance.demand(c)).collect();
    // route_of[c - 1] is the index of the route containing customer c.
    let mut route_of: Vec<usize> = (0..n).collect();

    let mut savings: Vec<(T, NodeIndex, NodeIndex)> = Vec::with_capacity(n * (n - 1) / 2);
    for i in instance.customers() {
        for j in instance.customers().skip(i.get()) {
            let s = costs.get(DEPOT, i) + costs.get(DEPOT, j) - costs.get(i, j);
            if s > T::zero() {
                savings.push((s, i, j));
            }
        }
    }
    // Largest saving first; equal savings break on the customer pair.
    savings.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| (a.1, a.2).cmp(&(b.1, b.2)))
    });

    for (_, i, j) in savings {
        let ri = route_of[i.get() - 1];
        let rj = route_of[j.get() - 1];
        if ri == rj {
            continue;
        }
        if loads[ri] + loads[rj] > capacity + eps {
            continue;
        }

        let i_first = routes[ri][0] == i;
        let i_last = *routes[ri].last().expect("routes are never empty") == i;
        let j_first = routes[rj][0] == j;
        let j_last = *routes[rj].last().expect("routes are never empty") == j;

        // Only route endpoints can be joined; interior customers keep their
        // neighbors.
        let merged: Vec<NodeIndex> = if i_last && j_first {
            routes[ri].iter().chain(routes[rj].iter()).copied().collect()
        } else if j_last && i_first {
            routes[rj].iter().chain(routes[ri].iter()).copied().collect()
        } else if i_last && j_last {
            routes[ri]
                .iter()
                .chain(routes[rj].iter().rev())
                .copied()
                .collect()
        } else if i_first && j_first {
            routes[ri]
                .iter()
                .rev()
                .chain(routes[rj].iter())
                .copied()
                .collect()
        } else {
            continue;
        };

        for &c in &routes[rj] {
            route_of[c.get() - 1] = ri;
        }
        loads[ri] = loads[ri] + loads[rj];
        routes[ri] = merged;
        routes[rj].clear();
    }

    // Canonical form: each route oriented with its smaller endpoint first,
    // routes ordered by their first customer.
    let mut final_routes: Vec<Vec<NodeIndex>> =
        routes.into_iter().filter(|r| !r.is_empty()).collect();
    for route in &mut final_routes {
        if route.last() < route.first() {
            route.reverse();
        }
    }
    final_routes.sort_by_key(|r| r[0]);

    let mut arcs = Vec::new();
    for route in &final_routes {
        let mut prev = DEPOT;
        for &c in route {
            arcs.push((prev, c));
            prev = c;
        }
        arcs.push((prev, DEPOT));
    }

    let objective = arcs
        .iter()
        .fold(T::zero(), |acc, &(a, b)| acc + costs.get(a, b));
    Some(RoutePlan::new(objective, arcs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_model::instance::InstanceBuilder;

    fn node(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    /// Four customers on a line next to each other, far from the depot.
    /// Merging is always worthwhile; capacity limits routes to two
    /// customers each.
    fn line_instance() -> Instance<f64> {
        let mut b = InstanceBuilder::new(4, 2.0);
        for c in 1..=4 {
            b.set_demand(node(c), 1.0);
            b.set_edge_cost(node(0), node(c), 10.0);
        }
        b.set_edge_cost(node(1), node(2), 1.0)
            .set_edge_cost(node(2), node(3), 1.0)
            .set_edge_cost(node(3), node(4), 1.0)
            .set_edge_cost(node(1), node(3), 2.0)
            .set_edge_cost(node(2), node(4), 2.0)
            .set_edge_cost(node(1), node(4), 3.0);
        b.build()
    }

    fn route_sets(plan: &RoutePlan<f64>) -> Vec<Vec<usize>> {
        plan.routes()
            .iter()
            .map(|r| r.iter().map(|n| n.get()).collect())
            .collect()
    }

    #[test]
    fn test_merges_up_to_capacity() {
        let ins = line_instance();
        let plan = clarke_wright(&ins, ins.upper_matrix(), 1e-4).expect("feasible instance");
        let routes = route_sets(&plan);
        // Two routes of two customers each; all four visited exactly once.
        assert_eq!(routes.len(), 2);
        let mut visited: Vec<usize> = routes
            .iter()
            .flat_map(|r| r[1..r.len() - 1].iter().copied())
            .collect();
        visited.sort_unstable();
        assert_eq!(visited, vec![1, 2, 3, 4]);
        for route in &routes {
            assert_eq!(*route.first().unwrap(), 0);
            assert_eq!(*route.last().unwrap(), 0);
            assert!(route.len() <= 4);
        }
    }

    #[test]
    fn test_objective_matches_arc_costs() {
        let ins = line_instance();
        let plan = clarke_wright(&ins, ins.upper_matrix(), 1e-4).unwrap();
        assert_eq!(plan.objective_value(), plan.cost_under(ins.upper_matrix()));
    }

    #[test]
    fn test_singleton_instance() {
        let mut b = InstanceBuilder::new(1, 1.0);
        b.set_demand(node(1), 0.5).set_edge_cost(node(0), node(1), 7.0);
        let ins = b.build();
        let plan = clarke_wright(&ins, ins.upper_matrix(), 1e-4).unwrap();
        assert_eq!(plan.objective_value(), 14.0);
        assert_eq!(route_sets(&plan), vec![vec![0, 1, 0]]);
    }

    #[test]
    fn test_oversized_demand_is_unroutable() {
        let mut b = InstanceBuilder::new(1, 1.0);
        b.set_demand(node(1), 2.0).set_edge_cost(node(0), node(1), 1.0);
        let ins = b.build();
        assert!(clarke_wright(&ins, ins.upper_matrix(), 1e-4).is_none());
    }

    #[test]
    fn test_routes_are_canonical() {
        let ins = line_instance();
        let plan = clarke_wright(&ins, ins.upper_matrix(), 1e-4).unwrap();
        let routes = route_sets(&plan);
        // Each route starts with its smaller endpoint; routes are ordered
        // by first customer.
        let firsts: Vec<usize> = routes.iter().map(|r| r[1]).collect();
        let mut sorted = firsts.clone();
        sorted.sort_unstable();
        assert_eq!(firsts, sorted);
        for route in &routes {
            assert!(route[1] <= route[route.len() - 2]);
        }
    }
}
