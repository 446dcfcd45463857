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

//! # Benders Candidate Handler
//!
//! The decomposition's glue: the master branch-and-bound enumerates
//! routings with the linear cost at upper bounds, and this handler turns
//! each completed candidate into its max-regret objective.
//!
//! For a candidate `x` with linear cost `c_up(x)`, the max regret is
//! `c_up(x) - y*(x)`, where `y*(x)` is the optimal routing cost under the
//! worst scenario against `x`. The handler first evaluates the accumulated
//! cut pool; if the pool's surrogate `r` already matches the fresh
//! subproblem value the candidate is priced with `r`, otherwise a new cut
//! is recorded and the exact value is returned. Either way one subproblem
//! solve per candidate suffices, because the new cut is tight at the
//! candidate that spawned it.
//!
//! Subproblems share the master's absolute deadline. A subproblem that runs
//! out of budget but still holds a feasible rival yields a valid (possibly
//! loose) cut and marks the evaluation inexact; a subproblem with no rival
//! at all aborts the master search.

use crate::{
    cuts::{CutPool, OptimalityCut},
    oracle::worst_case_scenario,
};
use convoy_bnb::{
    cvrp::CvrpSolver,
    handler::{CandidateError, CandidateHandler},
};
use convoy_model::{instance::Instance, plan::RoutePlan};
use convoy_search::{
    monitor::deadline::DeadlineMonitor, num::SolverFloat, result::SolverResult,
    stats::SearchStatistics,
};

/// Prices master candidates by their max regret, lazily building the
/// optimality cut pool.
pub struct BendersHandler<'a, T> {
    instance: &'a Instance<T>,
    pool: CutPool<T>,
    r_cap: T,
    eps: T,
    deadline: std::time::Instant,
    subsolver: CvrpSolver<T>,
    /// Set when some subproblem could not prove optimality of its rival.
    inexact: bool,
    /// When a candidate last passed the cut pool without spawning a new cut.
    last_accepted_at: Option<std::time::Instant>,
    cuts_generated: u64,
    subproblem_solves: u64,
    /// Node counters aggregated over all subproblem solves.
    subproblem_stats: SearchStatistics,
}

impl<'a, T> BendersHandler<'a, T>
where
    T: SolverFloat,
{
    /// Creates a handler for one master solve. `deadline` is shared with
    /// the master search, so subproblems never outlive the overall budget.
    pub fn new(instance: &'a Instance<T>, eps: T, deadline: std::time::Instant) -> Self {
        Self {
            instance,
            pool: CutPool::new(),
            r_cap: instance.surrogate_cap(),
            eps,
            deadline,
            subsolver: CvrpSolver::new().eps(eps),
            inexact: false,
            last_accepted_at: None,
            cuts_generated: 0,
            subproblem_solves: 0,
            subproblem_stats: SearchStatistics::new(),
        }
    }

    /// Whether any subproblem failed to prove its rival optimal. When true,
    /// accepted objectives may overestimate the true max regret, so the
    /// master's optimality claim must be downgraded.
    #[inline]
    pub fn is_inexact(&self) -> bool {
        self.inexact
    }

    /// The number of cuts added to the pool.
    #[inline]
    pub fn num_cuts(&self) -> usize {
        self.pool.len()
    }

    /// The number of adversarial subproblems solved.
    #[inline]
    pub fn num_subproblem_solves(&self) -> u64 {
        self.subproblem_solves
    }

    /// Node counters aggregated over all subproblem solves.
    #[inline]
    pub fn subproblem_statistics(&self) -> &SearchStatistics {
        &self.subproblem_stats
    }

    /// When a candidate was last accepted straight from the cut pool, i.e.
    /// the pool's surrogate already matched the fresh subproblem value.
    #[inline]
    pub fn last_accepted_at(&self) -> Option<std::time::Instant> {
        self.last_accepted_at
    }
}

impl<'a, T> CandidateHandler<T> for BendersHandler<'a, T>
where
    T: SolverFloat,
{
    fn name(&self) -> &str {
        "BendersHandler"
    }

    fn evaluate(&mut self, plan: &RoutePlan<T>, linear_cost: T) -> Result<T, CandidateError> {
        let selection = plan.selection(self.instance.num_nodes());
        let surrogate = self
            .pool
            .tightest_rhs(&selection, self.instance, self.r_cap);

        let scenario = worst_case_scenario(self.instance, &selection);
        self.subproblem_solves += 1;
        let outcome = self
            .subsolver
            .solve(self.instance, &scenario, DeadlineMonitor::new(self.deadline));
        self.subproblem_stats.absorb_subsearch(&outcome.statistics);

        let rival = match outcome.result {
            SolverResult::Optimal(rival) => rival,
            SolverResult::Feasible(rival) => {
                self.inexact = true;
                rival
            }
            SolverResult::Infeasible => {
                // The candidate itself is feasible under every scenario, so
                // an infeasible subproblem means inconsistent inputs.
                return Err(CandidateError(
                    "adversarial subproblem reported infeasible".to_string(),
                ));
            }
            SolverResult::Unknown => {
                return Err(CandidateError(
                    "adversarial subproblem exhausted its budget without a rival".to_string(),
                ));
            }
        };

        let rival_cost = rival.objective_value();
        if rival_cost + self.eps < surrogate {
            // The pool did not anticipate this rival: record the cut. It is
            // tight at this candidate, so the exact regret is known without
            // a second subproblem solve.
            if self
                .pool
                .add(OptimalityCut::from_plan(&rival, self.instance))
            {
                self.cuts_generated += 1;
            }
            Ok(linear_cost - rival_cost)
        } else {
            // The pool already certifies a surrogate at least as small as
            // the fresh rival's cost.
            self.last_accepted_at = Some(std::time::Instant::now());
            Ok(linear_cost - surrogate)
        }
    }

    /// The regret term subtracts at most the smallest certified surrogate,
    /// so this bound only tightens as cuts accumulate and never invalidates
    /// earlier prunes.
    #[inline]
    fn adjustment_bound(&self) -> T {
        -self.pool.surrogate_bound(self.r_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_model::{index::NodeIndex, instance::InstanceBuilder};
    use std::time::{Duration, Instant};

    fn node(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn arc(i: usize, j: usize) -> (NodeIndex, NodeIndex) {
        (node(i), node(j))
    }

    /// Two unit-demand customers, capacity two. Only the chain edge is
    /// uncertain, which makes the single-route plan the zero-regret
    /// optimum.
    fn chain_instance() -> Instance<f64> {
        let mut b = InstanceBuilder::new(2, 2.0);
        b.set_demand(node(1), 1.0)
            .set_demand(node(2), 1.0)
            .set_edge_cost(node(0), node(1), 1.0)
            .set_edge_cost(node(0), node(2), 1.0)
            .set_edge_bounds(node(1), node(2), 0.0, 1.0);
        b.build()
    }

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(60)
    }

    fn single_route() -> RoutePlan<f64> {
        RoutePlan::new(3.0, vec![arc(0, 1), arc(1, 2), arc(2, 0)])
    }

    fn two_routes() -> RoutePlan<f64> {
        RoutePlan::new(4.0, vec![arc(0, 1), arc(1, 0), arc(0, 2), arc(2, 0)])
    }

    #[test]
    fn test_first_candidate_generates_a_cut_and_exact_regret() {
        let ins = chain_instance();
        let mut handler = BendersHandler::new(&ins, 1e-4, far_deadline());

        // Worst scenario against the two-route plan drops the chain edge to
        // zero; the rival single route then costs 2, so the regret is 2.
        let objective = handler.evaluate(&two_routes(), 4.0).unwrap();
        assert_eq!(objective, 2.0);
        assert_eq!(handler.num_cuts(), 1);
        assert_eq!(handler.num_subproblem_solves(), 1);
        assert!(!handler.is_inexact());
    }

    #[test]
    fn test_pool_reuses_a_tight_cut_without_a_new_one() {
        let ins = chain_instance();
        let mut handler = BendersHandler::new(&ins, 1e-4, far_deadline());
        handler.evaluate(&two_routes(), 4.0).unwrap();

        // Against the single route, every rival (including itself) pays its
        // raised edges; the cut from the previous candidate is already
        // tight, so no new cut appears and the regret is zero.
        let objective = handler.evaluate(&single_route(), 3.0).unwrap();
        assert_eq!(objective, 0.0);
        assert_eq!(handler.num_cuts(), 1);
    }

    #[test]
    fn test_adjustment_bound_tightens_with_cuts() {
        let ins = chain_instance();
        let mut handler = BendersHandler::new(&ins, 1e-4, far_deadline());

        // Without cuts the bound falls back to the surrogate cap.
        assert_eq!(
            CandidateHandler::<f64>::adjustment_bound(&handler),
            -ins.surrogate_cap()
        );

        handler.evaluate(&two_routes(), 4.0).unwrap();
        // The recorded rival is the single route with all edges raised:
        // 1 + 1 + 1 = 3.
        assert_eq!(CandidateHandler::<f64>::adjustment_bound(&handler), -3.0);
    }

    #[test]
    fn test_expired_deadline_aborts_evaluation() {
        let ins = chain_instance();
        let mut handler = BendersHandler::new(&ins, 1e-4, Instant::now() - Duration::from_secs(1));

        // With the deadline already passed the subproblem still returns its
        // savings warm start, so evaluation succeeds but is marked inexact.
        let result = handler.evaluate(&two_routes(), 4.0);
        match result {
            Ok(_) => assert!(handler.is_inexact()),
            Err(e) => assert!(e.to_string().contains("budget")),
        }
    }
}
