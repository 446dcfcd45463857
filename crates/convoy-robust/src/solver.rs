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

//! # Robust Solver
//!
//! The driver of the decomposition. The master branch-and-bound enumerates
//! routings with all edge costs at their upper bounds; the Benders handler
//! subtracts the regret surrogate from each completed candidate, so the
//! master minimizes the max regret directly. A savings warm start seeds the
//! incumbent and the first optimality cut.
//!
//! Instances without cost uncertainty short-circuit to a single exact
//! solve: under one fixed scenario the cost-optimal routing has zero
//! regret, and no cut is ever needed.

use crate::benders::BendersHandler;
use convoy_bnb::{bnb::BnbSolver, cvrp::CvrpSolver, savings::clarke_wright};
use convoy_core::num::approx::default_eps;
use convoy_model::{instance::Instance, plan::RoutePlan};
use convoy_search::{
    monitor::deadline::DeadlineMonitor,
    num::SolverFloat,
    result::{SolverResult, TerminationReason},
    stats::SearchStatistics,
};

/// The outcome of a robust solve.
///
/// Plans carry their certified max regret as the objective value: exact
/// when optimality is proven, an upper bound otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct RobustOutcome<T> {
    pub result: SolverResult<T>,
    pub reason: TerminationReason,
    /// The plan's cost with all of its edges at their upper bounds, i.e.
    /// its cost under its own worst scenario.
    pub worst_case_cost: Option<T>,
    /// A lower bound on the optimal max regret, if the search produced one.
    pub best_bound: Option<T>,
    /// The number of optimality cuts generated.
    pub num_cuts: u64,
    /// When the Benders handler last accepted a candidate straight from the
    /// cut pool. Diagnostic for gauging how stale the incumbent is.
    pub last_accepted_at: Option<std::time::Instant>,
    pub statistics: SearchStatistics,
    integral_costs: bool,
    eps: T,
}

impl<T> RobustOutcome<T>
where
    T: SolverFloat,
{
    /// The certified max regret of the returned plan, if any. Exact when
    /// [`Self::is_optimal`] holds, otherwise an upper bound.
    #[inline]
    pub fn regret(&self) -> Option<T> {
        self.result.plan().map(|p| p.objective_value())
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.result, SolverResult::Optimal(_))
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        self.result.plan().is_some()
    }

    /// The best bound tightened by integrality: when every cost bound of
    /// the instance is integral the optimal regret is integral too, so a
    /// fractional bound rounds up. Falls back to the plain bound otherwise.
    pub fn rounded_bound(&self) -> Option<T> {
        let bound = self.best_bound?;
        if self.integral_costs {
            Some((bound - self.eps).ceil())
        } else {
            Some(bound)
        }
    }
}

impl<T> std::fmt::Display for RobustOutcome<T>
where
    T: SolverFloat,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Robust Outcome")?;
        writeln!(f, "  Result: {}", self.result)?;
        writeln!(f, "  Termination: {}", self.reason)?;
        match self.worst_case_cost {
            Some(cost) => writeln!(f, "  Worst-Case Cost: {}", cost)?,
            None => writeln!(f, "  Worst-Case Cost: none")?,
        }
        match self.best_bound {
            Some(bound) => writeln!(f, "  Regret Bound: {}", bound)?,
            None => writeln!(f, "  Regret Bound: none")?,
        }
        writeln!(f, "  Cuts: {}", self.num_cuts)?;
        write!(f, "{}", self.statistics)
    }
}

/// Solves robust CVRP instances to min-max regret.
#[derive(Clone, Debug)]
pub struct RobustSolver<T> {
    time_limit: std::time::Duration,
    eps: T,
}

impl<T> Default for RobustSolver<T>
where
    T: SolverFloat,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RobustSolver<T>
where
    T: SolverFloat,
{
    /// Creates a solver with the default tolerance and a one-minute budget.
    #[inline]
    pub fn new() -> Self {
        Self {
            time_limit: std::time::Duration::from_secs(60),
            eps: default_eps(),
        }
    }

    /// Sets the wall-clock budget shared by the master search and all of
    /// its subproblems.
    #[inline]
    pub fn time_limit(mut self, limit: std::time::Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the numeric tolerance.
    #[inline]
    pub fn eps(mut self, eps: T) -> Self {
        self.eps = eps;
        self
    }

    /// Solves the instance to min-max regret.
    pub fn solve(&self, instance: &Instance<T>) -> RobustOutcome<T> {
        let deadline = std::time::Instant::now() + self.time_limit;
        let integral_costs = instance.has_integral_costs(self.eps);

        if instance.is_deterministic(self.eps) {
            return self.solve_deterministic(instance, deadline, integral_costs);
        }

        let warm = clarke_wright(instance, instance.upper_matrix(), self.eps);
        let mut handler = BendersHandler::new(instance, self.eps, deadline);
        let mut master = BnbSolver::with_eps(self.eps);
        let outcome = master.solve_with_warm_start(
            instance,
            instance.upper_matrix(),
            &mut handler,
            DeadlineMonitor::new(deadline),
            warm.as_ref(),
        );

        let mut statistics = outcome.statistics;
        statistics.absorb_subsearch(handler.subproblem_statistics());
        statistics.cuts_generated = handler.num_cuts() as u64;
        statistics.subproblem_solves = handler.num_subproblem_solves();

        // An inexact subproblem may have priced some candidate too high, so
        // optimality of the incumbent is no longer certified.
        let (result, reason) = if handler.is_inexact() {
            match outcome.result {
                SolverResult::Optimal(plan) => (
                    SolverResult::Feasible(plan),
                    TerminationReason::Aborted(
                        "subproblem budget exhausted; optimality not proven".to_string(),
                    ),
                ),
                other => (other, outcome.reason),
            }
        } else {
            (outcome.result, outcome.reason)
        };

        let worst_case_cost = result.plan().map(|p| p.cost_under(instance.upper_matrix()));
        // The regret is non-negative for every routing, so the bound never
        // drops below zero.
        let best_bound = outcome
            .best_bound
            .map(|b| if b > T::zero() { b } else { T::zero() });

        RobustOutcome {
            result,
            reason,
            worst_case_cost,
            best_bound,
            num_cuts: handler.num_cuts() as u64,
            last_accepted_at: handler.last_accepted_at(),
            statistics,
            integral_costs,
            eps: self.eps,
        }
    }

    /// The uncertainty-free fast path: one exact solve, zero cuts.
    fn solve_deterministic(
        &self,
        instance: &Instance<T>,
        deadline: std::time::Instant,
        integral_costs: bool,
    ) -> RobustOutcome<T> {
        let outcome = CvrpSolver::new().eps(self.eps).solve(
            instance,
            instance.upper_matrix(),
            DeadlineMonitor::new(deadline),
        );

        let worst_case_cost = outcome.result.plan().map(|p| p.objective_value());
        let result = match outcome.result {
            SolverResult::Optimal(plan) => {
                // The cost-optimal routing under the single scenario has
                // zero regret.
                SolverResult::Optimal(RoutePlan::new(T::zero(), plan.into_arcs()))
            }
            SolverResult::Feasible(plan) => {
                // Without a proof of cost optimality the regret is only
                // bounded: at most the gap to the proven cost bound.
                let gap = match outcome.best_bound {
                    Some(bound) => plan.objective_value() - bound,
                    None => instance.surrogate_cap(),
                };
                SolverResult::Feasible(RoutePlan::new(gap, plan.into_arcs()))
            }
            SolverResult::Infeasible => SolverResult::Infeasible,
            SolverResult::Unknown => SolverResult::Unknown,
        };

        let best_bound = match result {
            SolverResult::Infeasible => None,
            _ => Some(T::zero()),
        };

        RobustOutcome {
            result,
            reason: outcome.reason,
            worst_case_cost,
            best_bound,
            num_cuts: 0,
            last_accepted_at: None,
            statistics: outcome.statistics,
            integral_costs,
            eps: self.eps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_model::{index::NodeIndex, instance::InstanceBuilder};
    use proptest::prelude::*;

    fn node(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    /// Only the chain edge is uncertain; the single-route plan is the
    /// zero-regret optimum (it is cost-optimal under its own worst
    /// scenario).
    fn chain_instance() -> Instance<f64> {
        let mut b = InstanceBuilder::new(2, 2.0);
        b.set_demand(node(1), 1.0)
            .set_demand(node(2), 1.0)
            .set_edge_cost(node(0), node(1), 1.0)
            .set_edge_cost(node(0), node(2), 1.0)
            .set_edge_bounds(node(1), node(2), 0.0, 1.0);
        b.build()
    }

    /// A wider chain interval makes both plans equally regretful: the
    /// single route regrets 2 in its worst case, and so does the pair of
    /// out-and-back routes.
    fn tied_instance() -> Instance<f64> {
        let mut b = InstanceBuilder::new(2, 2.0);
        b.set_demand(node(1), 1.0)
            .set_demand(node(2), 1.0)
            .set_edge_cost(node(0), node(1), 1.0)
            .set_edge_cost(node(0), node(2), 1.0)
            .set_edge_bounds(node(1), node(2), 0.0, 4.0);
        b.build()
    }

    #[test]
    fn test_zero_regret_optimum() {
        let ins = chain_instance();
        let outcome = RobustSolver::new().solve(&ins);
        assert!(outcome.is_optimal());
        assert_eq!(outcome.regret(), Some(0.0));

        let plan = outcome.result.plan().unwrap();
        assert_eq!(plan.routes().len(), 1);
        assert_eq!(outcome.worst_case_cost, Some(3.0));
    }

    #[test]
    fn test_tied_instance_has_regret_two() {
        let ins = tied_instance();
        let outcome = RobustSolver::new().solve(&ins);
        assert!(outcome.is_optimal());
        assert_eq!(outcome.regret(), Some(2.0));
        assert_eq!(outcome.best_bound, Some(2.0));
    }

    #[test]
    fn test_single_customer_has_zero_regret() {
        let mut b = InstanceBuilder::new(1, 1.0);
        b.set_demand(node(1), 0.5)
            .set_edge_bounds(node(0), node(1), 3.0, 5.0);
        let ins = b.build();

        let outcome = RobustSolver::new().solve(&ins);
        assert!(outcome.is_optimal());
        // The only routing is also the only rival.
        assert_eq!(outcome.regret(), Some(0.0));
        assert_eq!(outcome.worst_case_cost, Some(10.0));

        let routes = outcome.result.plan().unwrap().routes();
        assert_eq!(routes, vec![vec![node(0), node(1), node(0)]]);
    }

    #[test]
    fn test_ring_of_four_pairs_adjacent_customers() {
        // Four unit-demand customers on a ring, capacity two. Depot arcs
        // are certain; neighboring customers are cheap but uncertain.
        let mut b = InstanceBuilder::new(4, 2.0);
        for c in 1..=4 {
            b.set_demand(node(c), 1.0);
            b.set_edge_cost(node(0), node(c), 10.0);
        }
        b.set_edge_bounds(node(1), node(2), 1.0, 2.0)
            .set_edge_bounds(node(2), node(3), 1.0, 2.0)
            .set_edge_bounds(node(3), node(4), 1.0, 2.0)
            .set_edge_bounds(node(1), node(4), 1.0, 2.0)
            .set_edge_bounds(node(1), node(3), 2.0, 3.0)
            .set_edge_bounds(node(2), node(4), 2.0, 3.0);
        let ins = b.build();

        let outcome = RobustSolver::new().solve(&ins);
        assert!(outcome.is_optimal());

        // Either opposite pairing regrets exactly 2: its own worst case
        // costs 44 while the other pairing stays at 42.
        assert_eq!(outcome.regret(), Some(2.0));
        let routes = outcome.result.plan().unwrap().routes();
        assert_eq!(routes.len(), 2);
        for route in &routes {
            assert_eq!(route.len(), 4); // depot, two customers, depot
        }
    }

    #[test]
    fn test_deterministic_fast_path_generates_no_cut() {
        let mut b = InstanceBuilder::new(2, 2.0);
        b.set_demand(node(1), 1.0)
            .set_demand(node(2), 1.0)
            .set_edge_cost(node(0), node(1), 1.0)
            .set_edge_cost(node(0), node(2), 1.0)
            .set_edge_cost(node(1), node(2), 0.5);
        let ins = b.build();

        let outcome = RobustSolver::new().solve(&ins);
        assert!(outcome.is_optimal());
        assert_eq!(outcome.regret(), Some(0.0));
        assert_eq!(outcome.num_cuts, 0);
        assert_eq!(outcome.statistics.subproblem_solves, 0);
        // Optimal single route 0 -> 1 -> 2 -> 0.
        assert_eq!(outcome.worst_case_cost, Some(2.5));
    }

    #[test]
    fn test_infeasible_instance() {
        let mut b = InstanceBuilder::new(1, 1.0);
        b.set_demand(node(1), 3.0)
            .set_edge_bounds(node(0), node(1), 1.0, 2.0);
        let ins = b.build();

        let outcome = RobustSolver::new().solve(&ins);
        assert!(matches!(outcome.result, SolverResult::Infeasible));
        assert_eq!(outcome.best_bound, None);
        assert!(outcome.regret().is_none());
    }

    #[test]
    fn test_rounded_bound_rounds_up_for_integral_costs() {
        let ins = tied_instance();
        let outcome = RobustSolver::new().solve(&ins);
        // All bounds integral, proven bound 2: rounding must not change it.
        assert_eq!(outcome.rounded_bound(), Some(2.0));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// On random 3-customer instances the optimal regret is always
        /// non-negative and never exceeds the incumbent's worst-case cost.
        #[test]
        fn prop_regret_is_non_negative(
            widths in proptest::collection::vec(0.0f64..2.0, 6),
            base in proptest::collection::vec(1.0f64..5.0, 6),
        ) {
            let mut b = InstanceBuilder::new(3, 2.0);
            for c in 1..=3 {
                b.set_demand(node(c), 1.0);
            }
            let pairs = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
            for (k, &(i, j)) in pairs.iter().enumerate() {
                b.set_edge_bounds(node(i), node(j), base[k], base[k] + widths[k]);
            }
            let ins = b.build();

            let outcome = RobustSolver::new().solve(&ins);
            prop_assert!(outcome.has_solution());
            let regret = outcome.regret().unwrap();
            prop_assert!(regret >= 0.0);
            prop_assert!(regret <= outcome.worst_case_cost.unwrap());
        }
    }
}
