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

//! # Adversarial Scenario Oracle
//!
//! For interval-bounded edge costs the regret-maximizing scenario against a
//! fixed routing is an extreme point of the cost box: every edge the routing
//! uses (in either direction) is raised to its upper bound, every other edge
//! drops to its lower bound. The committed routing pays as much as possible
//! while any rival routing avoiding its edges pays as little as possible.

use convoy_model::{
    index::NodeIndex,
    instance::Instance,
    matrix::CostMatrix,
    plan::EdgeSelection,
};
use num_traits::Float;

/// Builds the worst cost scenario against the routing described by
/// `selection`.
///
/// # Panics
///
/// Panics in debug builds if the selection's node count does not match the
/// instance.
pub fn worst_case_scenario<T>(instance: &Instance<T>, selection: &EdgeSelection) -> CostMatrix<T>
where
    T: Float,
{
    debug_assert!(
        selection.num_nodes() == instance.num_nodes(),
        "called `worst_case_scenario` with a selection over {} nodes for an instance of {} nodes",
        selection.num_nodes(),
        instance.num_nodes()
    );

    let dim = instance.num_nodes();
    let mut scenario = CostMatrix::zeros(dim);
    for i in 0..dim {
        for j in (i + 1)..dim {
            let (a, b) = (NodeIndex::new(i), NodeIndex::new(j));
            let cost = if selection.contains(a, b) {
                instance.upper(a, b)
            } else {
                instance.lower(a, b)
            };
            scenario.set_symmetric(a, b, cost);
        }
    }
    scenario
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_model::{instance::InstanceBuilder, plan::RoutePlan};
    use proptest::prelude::*;

    fn node(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn uncertain_instance() -> Instance<f64> {
        let mut b = InstanceBuilder::new(2, 2.0);
        b.set_demand(node(1), 1.0)
            .set_demand(node(2), 1.0)
            .set_edge_bounds(node(0), node(1), 1.0, 3.0)
            .set_edge_bounds(node(0), node(2), 2.0, 5.0)
            .set_edge_bounds(node(1), node(2), 0.5, 4.0);
        b.build()
    }

    #[test]
    fn test_selected_edges_at_upper_rest_at_lower() {
        let ins = uncertain_instance();
        let plan = RoutePlan::new(
            0.0,
            vec![(node(0), node(1)), (node(1), node(0))],
        );
        let scenario = worst_case_scenario(&ins, &plan.selection(3));

        assert_eq!(scenario.get(node(0), node(1)), 3.0);
        assert_eq!(scenario.get(node(1), node(0)), 3.0);
        assert_eq!(scenario.get(node(0), node(2)), 2.0);
        assert_eq!(scenario.get(node(1), node(2)), 0.5);
    }

    #[test]
    fn test_empty_selection_gives_lower_bounds() {
        let ins = uncertain_instance();
        let scenario = worst_case_scenario(&ins, &EdgeSelection::empty(3));
        assert_eq!(scenario, *ins.lower_matrix());
    }

    #[test]
    fn test_membership_is_direction_agnostic() {
        let ins = uncertain_instance();
        // The arc is traversed towards the depot only; the edge still
        // counts as used.
        let plan = RoutePlan::new(0.0, vec![(node(2), node(0))]);
        let scenario = worst_case_scenario(&ins, &plan.selection(3));
        assert_eq!(scenario.get(node(0), node(2)), 5.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Every scenario edge equals either its lower or its upper bound,
        /// and the scenario is symmetric.
        #[test]
        fn prop_scenario_is_an_extreme_point(mask in 0u8..8) {
            let ins = uncertain_instance();
            let mut selection = EdgeSelection::empty(3);
            let pairs = [(0usize, 1usize), (0, 2), (1, 2)];
            for (k, &(i, j)) in pairs.iter().enumerate() {
                if mask & (1 << k) != 0 {
                    selection.insert(node(i), node(j));
                }
            }

            let scenario = worst_case_scenario(&ins, &selection);
            prop_assert!(scenario.is_symmetric());
            for &(i, j) in &pairs {
                let (a, b) = (node(i), node(j));
                let c = scenario.get(a, b);
                if selection.contains(a, b) {
                    prop_assert_eq!(c, ins.upper(a, b));
                } else {
                    prop_assert_eq!(c, ins.lower(a, b));
                }
            }
        }
    }
}
