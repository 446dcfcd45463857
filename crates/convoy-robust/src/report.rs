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

//! # Sampled Scenario Reports
//!
//! Scores a committed routing against a set of sampled cost scenarios.
//! Complements the worst-case certificate of [`crate::regret`] with an
//! average-case picture: a routing chosen for min-max regret can still be
//! compared against alternatives on typical realizations.

use convoy_model::{matrix::CostMatrix, plan::RoutePlan};
use convoy_search::num::SolverFloat;

/// Per-scenario costs of one routing over a sample set.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleReport<T> {
    /// The routing's cost under each sampled scenario, in input order.
    pub costs: Vec<T>,
    pub mean: T,
    pub worst: T,
    pub best: T,
}

impl<T> SampleReport<T>
where
    T: SolverFloat,
{
    /// Evaluates `plan` under every sampled scenario.
    ///
    /// # Panics
    ///
    /// Panics if `samples` is empty.
    pub fn evaluate(plan: &RoutePlan<T>, samples: &[CostMatrix<T>]) -> Self {
        assert!(
            !samples.is_empty(),
            "called `SampleReport::evaluate` with no scenarios"
        );

        let costs: Vec<T> = samples.iter().map(|s| plan.cost_under(s)).collect();
        let mut worst = T::neg_infinity();
        let mut best = T::infinity();
        let mut total = T::zero();
        for &c in &costs {
            if c > worst {
                worst = c;
            }
            if c < best {
                best = c;
            }
            total = total + c;
        }
        let count = T::from_usize(costs.len()).expect("sample count fits the float type");

        Self {
            mean: total / count,
            worst,
            best,
            costs,
        }
    }

    /// The number of scenarios evaluated.
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.costs.len()
    }
}

impl<T> std::fmt::Display for SampleReport<T>
where
    T: SolverFloat,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} samples: mean {} / best {} / worst {}",
            self.num_samples(),
            self.mean,
            self.best,
            self.worst
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_model::{
        index::NodeIndex,
        instance::InstanceBuilder,
        scenario::sample_scenario,
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn node(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn arc(i: usize, j: usize) -> (NodeIndex, NodeIndex) {
        (node(i), node(j))
    }

    #[test]
    fn test_statistics_over_fixed_scenarios() {
        let mut cheap = CostMatrix::<f64>::zeros(2);
        cheap.set_symmetric(node(0), node(1), 1.0);
        let mut dear = CostMatrix::<f64>::zeros(2);
        dear.set_symmetric(node(0), node(1), 3.0);

        let plan = RoutePlan::new(0.0, vec![arc(0, 1), arc(1, 0)]);
        let report = SampleReport::evaluate(&plan, &[cheap, dear]);

        assert_eq!(report.costs, vec![2.0, 6.0]);
        assert_eq!(report.mean, 4.0);
        assert_eq!(report.best, 2.0);
        assert_eq!(report.worst, 6.0);
    }

    #[test]
    fn test_sampled_costs_stay_within_interval_bounds() {
        let mut b = InstanceBuilder::new(2, 2.0);
        b.set_demand(node(1), 1.0)
            .set_demand(node(2), 1.0)
            .set_edge_bounds(node(0), node(1), 1.0, 2.0)
            .set_edge_bounds(node(0), node(2), 1.0, 2.0)
            .set_edge_bounds(node(1), node(2), 0.5, 1.5);
        let ins = b.build();

        let mut rng = StdRng::seed_from_u64(7);
        let samples: Vec<_> = (0..8).map(|_| sample_scenario(&ins, &mut rng)).collect();
        let plan = RoutePlan::new(0.0, vec![arc(0, 1), arc(1, 2), arc(2, 0)]);
        let report = SampleReport::evaluate(&plan, &samples);

        // Cost is bounded by the plan under all-lower and all-upper costs.
        assert!(report.best >= 1.0 + 0.5 + 1.0);
        assert!(report.worst <= 2.0 + 1.5 + 2.0);
        assert_eq!(report.num_samples(), 8);
    }
}
