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

//! # Post-Hoc Regret Evaluation
//!
//! Certifies the max regret of a committed routing independently of the
//! search that produced it: build the worst scenario against the routing,
//! solve the rival problem exactly, and take the cost difference. Useful
//! for validating solver output and for scoring routings produced by other
//! means.

use crate::oracle::worst_case_scenario;
use convoy_bnb::cvrp::CvrpSolver;
use convoy_model::{instance::Instance, plan::RoutePlan};
use convoy_search::{
    monitor::deadline::DeadlineMonitor, num::SolverFloat, result::SolverResult,
};

/// The certified regret of one committed routing.
#[derive(Debug, Clone, PartialEq)]
pub struct RegretReport<T> {
    /// The committed routing's cost under its worst scenario.
    pub committed_cost: T,
    /// The best rival cost under that scenario.
    pub rival_cost: T,
    /// The difference of the two. When `exact` is false the rival is only
    /// feasible, so this is a lower bound on the true max regret.
    pub regret: T,
    /// The rival routing.
    pub rival: RoutePlan<T>,
    /// Whether the rival was proven cost-optimal.
    pub exact: bool,
}

/// The error type for regret evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegretError(pub String);

impl std::fmt::Display for RegretError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "regret evaluation failed: {}", self.0)
    }
}

impl std::error::Error for RegretError {}

/// Certifies the max regret of `plan` within the given wall-clock budget.
pub fn evaluate_regret<T>(
    instance: &Instance<T>,
    plan: &RoutePlan<T>,
    budget: std::time::Duration,
) -> Result<RegretReport<T>, RegretError>
where
    T: SolverFloat,
{
    let selection = plan.selection(instance.num_nodes());
    let scenario = worst_case_scenario(instance, &selection);
    let committed_cost = plan.cost_under(&scenario);

    let outcome = CvrpSolver::new().solve(instance, &scenario, DeadlineMonitor::from_now(budget));
    let exact = outcome.is_optimal();
    let rival = match outcome.result {
        SolverResult::Optimal(rival) | SolverResult::Feasible(rival) => rival,
        SolverResult::Infeasible => {
            return Err(RegretError(
                "rival problem reported infeasible for a feasible instance".to_string(),
            ))
        }
        SolverResult::Unknown => {
            return Err(RegretError(
                "rival search exhausted its budget without a routing".to_string(),
            ))
        }
    };

    let rival_cost = rival.objective_value();
    Ok(RegretReport {
        committed_cost,
        rival_cost,
        regret: committed_cost - rival_cost,
        rival,
        exact,
    })
}
