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

use crate::{num::SolverFloat, stats::SearchStatistics};
use convoy_model::plan::RoutePlan;

#[derive(Debug, Clone, PartialEq)]
pub enum SolverResult<T> {
    /// We have proven that the problem is infeasible.
    Infeasible,
    /// We have found a solution and proven its optimality.
    Optimal(RoutePlan<T>),
    /// We have found a feasible solution, but not proven its optimality.
    Feasible(RoutePlan<T>),
    /// The solver terminated without finding a solution and
    /// without proving infeasibility.
    Unknown,
}

impl<T> SolverResult<T> {
    /// The plan carried by this result, if any.
    #[inline]
    pub fn plan(&self) -> Option<&RoutePlan<T>> {
        match self {
            SolverResult::Optimal(plan) | SolverResult::Feasible(plan) => Some(plan),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }

    /// Consumes this result and returns the plan carried by it, if any.
    #[inline]
    pub fn into_plan(self) -> Option<RoutePlan<T>> {
        match self {
            SolverResult::Optimal(plan) | SolverResult::Feasible(plan) => Some(plan),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: SolverFloat,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Optimal(plan) => {
                write!(f, "Optimal(objective={})", plan.objective_value())
            }
            SolverResult::Feasible(plan) => {
                write!(f, "Feasible(objective={})", plan.objective_value())
            }
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The solver found and proved optimality of a solution.
    OptimalityProven,
    /// The solver proved that the problem is infeasible.
    InfeasibilityProven,
    /// The solver aborted due to a search limit (time, iterations, etc.).
    /// The string contains information about the reason for abortion.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", *reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome<T> {
    pub result: SolverResult<T>,
    pub reason: TerminationReason,
    /// The best proven lower bound on the objective, if the search produced
    /// one. On proven optimality this equals the objective value.
    pub best_bound: Option<T>,
    pub statistics: SearchStatistics,
}

impl<T> SolverOutcome<T>
where
    T: SolverFloat,
{
    #[inline]
    pub fn new(
        result: SolverResult<T>,
        reason: TerminationReason,
        best_bound: Option<T>,
        statistics: SearchStatistics,
    ) -> Self {
        Self {
            result,
            reason,
            best_bound,
            statistics,
        }
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.result, SolverResult::Optimal(_))
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self.result, SolverResult::Feasible(_))
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self.result, SolverResult::Infeasible)
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        matches!(
            self.result,
            SolverResult::Optimal(_) | SolverResult::Feasible(_)
        )
    }
}

impl<T> std::fmt::Display for SolverOutcome<T>
where
    T: SolverFloat,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result: {}", self.result)?;
        writeln!(f, "Termination: {}", self.reason)?;
        match &self.best_bound {
            Some(bound) => writeln!(f, "Best Bound: {}", bound)?,
            None => writeln!(f, "Best Bound: none")?,
        }
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_model::index::NodeIndex;

    fn plan(objective: f64) -> RoutePlan<f64> {
        RoutePlan::new(
            objective,
            vec![
                (NodeIndex::new(0), NodeIndex::new(1)),
                (NodeIndex::new(1), NodeIndex::new(0)),
            ],
        )
    }

    #[test]
    fn test_result_predicates() {
        let outcome = SolverOutcome::new(
            SolverResult::Optimal(plan(5.0)),
            TerminationReason::OptimalityProven,
            Some(5.0),
            SearchStatistics::new(),
        );
        assert!(outcome.is_optimal());
        assert!(outcome.has_solution());
        assert!(!outcome.is_infeasible());
    }

    #[test]
    fn test_plan_extraction() {
        let result = SolverResult::Feasible(plan(3.0));
        assert_eq!(result.plan().unwrap().objective_value(), 3.0);
        assert!(SolverResult::<f64>::Unknown.plan().is_none());
        assert!(SolverResult::<f64>::Infeasible.into_plan().is_none());
    }

    #[test]
    fn test_display_mentions_objective_and_reason() {
        let outcome = SolverOutcome::new(
            SolverResult::Feasible(plan(3.5)),
            TerminationReason::Aborted("time limit reached".to_string()),
            Some(2.0),
            SearchStatistics::new(),
        );
        let rendered = format!("{}", outcome);
        assert!(rendered.contains("Feasible(objective=3.5)"));
        assert!(rendered.contains("Aborted: time limit reached"));
        assert!(rendered.contains("Best Bound: 2"));
    }
}
