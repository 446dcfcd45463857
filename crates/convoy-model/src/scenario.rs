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

//! # Scenario Sampling
//!
//! A scenario is one concrete cost realization within the interval bounds
//! of an instance. [`sample_scenario`] draws every edge cost uniformly and
//! independently within its interval, symmetric by construction. Sampled
//! scenarios feed the reporting side of the crate; the worst-case scenario
//! used by the decomposition is derived analytically, not sampled.

use crate::{instance::Instance, matrix::CostMatrix};
use num_traits::Float;
use rand::Rng;

/// Draws a random cost scenario with every edge cost uniform in its
/// interval. Degenerate intervals yield their single value exactly.
pub fn sample_scenario<T, R>(instance: &Instance<T>, rng: &mut R) -> CostMatrix<T>
where
    T: Float,
    R: Rng + ?Sized,
{
    let mut scenario = CostMatrix::zeros(instance.num_nodes());
    for (i, j) in instance.upper_matrix().edges() {
        let lo = instance.lower(i, j);
        let hi = instance.upper(i, j);
        let cost = if lo == hi {
            lo
        } else {
            // Uniform in [lo, hi): lo + u * width with u in [0, 1).
            let u = T::from(rng.random::<f64>())
                .expect("a floating-point cost type must represent values in [0, 1)");
            lo + u * (hi - lo)
        };
        scenario.set_symmetric(i, j, cost);
    }
    scenario
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::NodeIndex;
    use crate::instance::InstanceBuilder;
    use rand::{rngs::StdRng, SeedableRng};

    fn node(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn uncertain_instance() -> Instance<f64> {
        let mut b = InstanceBuilder::new(3, 10.0);
        b.set_demand(node(1), 1.0)
            .set_demand(node(2), 1.0)
            .set_demand(node(3), 1.0)
            .set_edge_bounds(node(0), node(1), 1.0, 4.0)
            .set_edge_bounds(node(0), node(2), 2.0, 2.0)
            .set_edge_bounds(node(0), node(3), 0.5, 3.5)
            .set_edge_bounds(node(1), node(2), 1.0, 1.5)
            .set_edge_bounds(node(1), node(3), 2.0, 6.0)
            .set_edge_bounds(node(2), node(3), 3.0, 3.0);
        b.build()
    }

    #[test]
    fn test_samples_stay_within_bounds_and_symmetric() {
        let ins = uncertain_instance();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let scenario = sample_scenario(&ins, &mut rng);
            assert!(scenario.is_symmetric());
            for (i, j) in scenario.edges() {
                let c = scenario.get(i, j);
                assert!(c >= ins.lower(i, j));
                assert!(c <= ins.upper(i, j));
            }
        }
    }

    #[test]
    fn test_degenerate_intervals_are_exact() {
        let ins = uncertain_instance();
        let mut rng = StdRng::seed_from_u64(11);
        let scenario = sample_scenario(&ins, &mut rng);
        assert_eq!(scenario.get(node(0), node(2)), 2.0);
        assert_eq!(scenario.get(node(2), node(3)), 3.0);
    }

    #[test]
    fn test_same_seed_reproduces_scenario() {
        let ins = uncertain_instance();
        let a = sample_scenario(&ins, &mut StdRng::seed_from_u64(3));
        let b = sample_scenario(&ins, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
