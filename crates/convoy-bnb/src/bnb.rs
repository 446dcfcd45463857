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

//! Branch-and-bound engine for capacitated routing.
//!
//! This module implements a stateful search engine that builds depot-rooted
//! routes arc by arc, pruning with an admissible completion bound and an
//! incumbent. The `BnbSolver` owns reusable trail and stack storage across
//! solves, supports warm starts via an initial routing, and delegates the
//! evaluation of complete candidates to a `CandidateHandler`, which lets
//! the same engine serve both as a plain exact solver and as the master
//! search of a decomposition.
//!
//! Branching is symmetry-reduced: a route may only close from a tail not
//! smaller than its first customer, and new routes start at strictly
//! increasing first customers. Every capacity-feasible routing has exactly
//! one representative under these rules, so the search stays exhaustive. A
//! search session object encapsulates per-run state, statistics, and
//! timing; the engine is deterministic for a fixed instance and handler.

use crate::{
    bound::CompletionBound,
    handler::{CandidateError, CandidateHandler},
    stack::{Decision, SearchStack},
    state::SearchState,
    trail::SearchTrail,
};
use convoy_core::num::approx::default_eps;
use convoy_model::{index::DEPOT, instance::Instance, matrix::CostMatrix, plan::RoutePlan};
use convoy_search::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    num::SolverFloat,
    result::{SolverOutcome, SolverResult, TerminationReason},
    stats::SearchStatistics,
};
use smallvec::SmallVec;

/// An exact branch-and-bound solver for depot-rooted capacitated routing.
/// The engine only explores and prunes; complete candidates are priced by
/// the `CandidateHandler` the caller supplies.
#[derive(Clone)]
pub struct BnbSolver<T> {
    trail: SearchTrail<T>,
    stack: SearchStack<T>,
    eps: T,
}

impl<T> Default for BnbSolver<T>
where
    T: SolverFloat,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BnbSolver<T>
where
    T: SolverFloat,
{
    /// Creates a new solver with the default numeric tolerance.
    #[inline]
    pub fn new() -> Self {
        Self::with_eps(default_eps())
    }

    /// Creates a new solver with an explicit numeric tolerance. The
    /// tolerance governs capacity comparisons.
    #[inline]
    pub fn with_eps(eps: T) -> Self {
        Self {
            trail: SearchTrail::new(),
            stack: SearchStack::new(),
            eps,
        }
    }

    /// Creates a solver with preallocated trail and stack storage for
    /// instances of up to `num_nodes` nodes.
    #[inline]
    pub fn preallocated(num_nodes: usize) -> Self {
        Self {
            trail: SearchTrail::preallocated(num_nodes),
            stack: SearchStack::preallocated(num_nodes),
            eps: default_eps(),
        }
    }

    /// Solves the routing problem over the given cost matrix.
    ///
    /// The matrix is passed separately from the instance because the same
    /// instance is solved under different cost realizations (bounds,
    /// scenarios); demands and capacity always come from the instance.
    #[inline]
    pub fn solve<H, S>(
        &mut self,
        instance: &Instance<T>,
        costs: &CostMatrix<T>,
        handler: &mut H,
        monitor: S,
    ) -> SolverOutcome<T>
    where
        H: CandidateHandler<T>,
        S: SearchMonitor<T>,
    {
        self.solve_with_warm_start(instance, costs, handler, monitor, None)
    }

    /// Solves with an initial routing installed as the incumbent before the
    /// search starts. The warm start must be a capacity-feasible routing of
    /// this instance; it is priced through the handler like any candidate.
    pub fn solve_with_warm_start<H, S>(
        &mut self,
        instance: &Instance<T>,
        costs: &CostMatrix<T>,
        handler: &mut H,
        mut monitor: S,
        warm_start: Option<&RoutePlan<T>>,
    ) -> SolverOutcome<T>
    where
        H: CandidateHandler<T>,
        S: SearchMonitor<T>,
    {
        debug_assert!(
            costs.dim() == instance.num_nodes(),
            "called `BnbSolver::solve` with a cost matrix of dim {} for an instance of {} nodes",
            costs.dim(),
            instance.num_nodes()
        );

        let session = BnbSearchSession::new(self, instance, costs, handler, &mut monitor);
        let res = session.run(warm_start);
        self.reset();
        res
    }

    /// Resets the reusable storage. Does not deallocate.
    #[inline]
    fn reset(&mut self) {
        self.trail.reset();
        self.stack.reset();
    }
}

/// A search session encapsulating the state and logic of one solve.
struct BnbSearchSession<'a, T, H, S> {
    solver: &'a mut BnbSolver<T>,
    instance: &'a Instance<T>,
    costs: &'a CostMatrix<T>,
    handler: &'a mut H,
    monitor: &'a mut S,
    bound: CompletionBound<T>,
    state: SearchState<T>,
    best_objective: T,
    best_plan: Option<RoutePlan<T>>,
    stats: SearchStatistics,
    start_time: std::time::Instant,
}

impl<'a, T, H, S> BnbSearchSession<'a, T, H, S>
where
    T: SolverFloat,
    H: CandidateHandler<T>,
    S: SearchMonitor<T>,
{
    #[inline]
    fn new(
        solver: &'a mut BnbSolver<T>,
        instance: &'a Instance<T>,
        costs: &'a CostMatrix<T>,
        handler: &'a mut H,
        monitor: &'a mut S,
    ) -> Self {
        let bound = CompletionBound::new(costs);
        let state = SearchState::new(instance.num_nodes());
        Self {
            solver,
            instance,
            costs,
            handler,
            monitor,
            bound,
            state,
            best_objective: T::infinity(),
            best_plan: None,
            stats: SearchStatistics::new(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Runs the search session to completion.
    fn run(mut self, warm_start: Option<&RoutePlan<T>>) -> SolverOutcome<T> {
        self.monitor.on_enter_search(self.instance);

        // Structural infeasibility: a single demand above the capacity can
        // never be routed.
        if self
            .instance
            .customers()
            .any(|c| self.instance.demand(c) > self.instance.capacity() + self.solver.eps)
        {
            return self.finalize(TerminationReason::InfeasibilityProven);
        }

        if let Some(plan) = warm_start {
            if let Err(e) = self.install_warm_start(plan) {
                return self.finalize(TerminationReason::Aborted(e.to_string()));
            }
        }

        self.initialize();

        let reason: TerminationReason = loop {
            self.monitor.on_step();
            if let SearchCommand::Terminate(msg) = self.monitor.search_command() {
                break TerminationReason::Aborted(msg);
            }

            if self.solver.stack.is_current_level_empty() {
                if self.solver.stack.depth() <= 1 {
                    break if self.best_plan.is_some() {
                        TerminationReason::OptimalityProven
                    } else {
                        TerminationReason::InfeasibilityProven
                    };
                }
                self.backtrack_step();
            } else if let Err(e) = self.process_next_decision() {
                break TerminationReason::Aborted(e.to_string());
            }
        };

        self.finalize(reason)
    }

    /// Prices the warm-start routing and installs it as the incumbent.
    fn install_warm_start(&mut self, plan: &RoutePlan<T>) -> Result<(), CandidateError> {
        let linear = plan.cost_under(self.costs);
        self.stats.on_candidate_evaluated();
        let objective = self.handler.evaluate(plan, linear)?;
        let accepted = RoutePlan::new(objective, plan.arcs().to_vec());
        self.stats.on_solution_found();
        self.monitor.on_solution_found(&accepted);
        self.best_objective = objective;
        self.best_plan = Some(accepted);
        Ok(())
    }

    /// Opens the root frame and enqueues the root decisions.
    fn initialize(&mut self) {
        self.solver.stack.push_frame();
        self.stats.on_node_explored();

        let root_bound = self.bound.remaining_cost(&self.state, self.costs)
            + self.handler.adjustment_bound();
        self.expand(root_bound);
    }

    #[inline]
    fn backtrack_step(&mut self) {
        self.solver.trail.backtrack(&mut self.state);
        self.solver.stack.pop_frame();
    }

    /// Pops and applies the next pending decision of the current frame.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the current frame is exhausted.
    fn process_next_decision(&mut self) -> Result<(), CandidateError> {
        debug_assert!(
            !self.solver.stack.is_current_level_empty(),
            "called `BnbSearchSession::process_next_decision` with an exhausted frame"
        );
        let decision = self
            .solver
            .stack
            .pop()
            .expect("a pending decision in the current frame");

        // Arc-level bound check against the incumbent. The handler's
        // adjustment bound accounts for the non-linear objective part.
        let new_linear = self.state.partial_cost() + decision.arc_cost();
        if new_linear + self.handler.adjustment_bound() >= self.best_objective {
            self.stats.on_prune_bound();
            return Ok(());
        }

        self.descend(decision)
    }

    /// Applies a decision, then either prices the completed candidate or
    /// bounds and expands the new node.
    fn descend(&mut self, decision: Decision<T>) -> Result<(), CandidateError> {
        let target = decision.target();
        let demand = if target == DEPOT {
            T::zero()
        } else {
            self.instance.demand(target)
        };

        let token = self.state.apply(target, decision.arc_cost(), demand);
        self.solver.trail.push(token);
        self.solver.stack.push_frame();

        self.stats.on_node_explored();
        self.stats.on_depth_reached(self.solver.stack.depth());
        self.handler.on_node(&self.state);

        if self.state.is_complete(self.instance.num_customers()) {
            // Leaf: the fresh frame stays empty, so the main loop
            // backtracks right after pricing.
            return self.handle_candidate();
        }

        let remaining = self.bound.remaining_cost(&self.state, self.costs);
        let node_bound =
            self.state.partial_cost() + remaining + self.handler.adjustment_bound();
        if node_bound >= self.best_objective {
            self.stats.on_prune_bound();
            return Ok(());
        }

        self.expand(node_bound);
        Ok(())
    }

    /// Generates the children of the current node onto the current frame.
    /// Children are enqueued so the cheapest arc is explored first.
    fn expand(&mut self, node_bound: T) {
        let tail = self.state.tail();
        let mut children: SmallVec<[Decision<T>; 16]> = SmallVec::new();

        if tail == DEPOT {
            // Start a new route. Strictly increasing first customers keep
            // route order canonical.
            let boundary = self.state.boundary();
            for c in self.instance.customers() {
                if c > boundary && !self.state.is_visited(c) {
                    children.push(Decision::new(c, self.costs.get(DEPOT, c), node_bound));
                }
            }
        } else {
            // Close the open route, but only in its canonical orientation.
            if tail >= self.state.route_first() {
                children.push(Decision::new(DEPOT, self.costs.get(tail, DEPOT), node_bound));
            }
            // Extend the open route within capacity.
            let headroom =
                self.instance.capacity() + self.solver.eps - self.state.route_load();
            for c in self.instance.customers() {
                if !self.state.is_visited(c) && self.instance.demand(c) <= headroom {
                    children.push(Decision::new(c, self.costs.get(tail, c), node_bound));
                }
            }
        }

        if children.is_empty() {
            self.stats.on_prune_infeasible();
            return;
        }

        // Most expensive first: the stack is LIFO, so the cheapest arc is
        // popped first. Ties break on the target for determinism.
        children.sort_by(|a, b| {
            b.arc_cost()
                .partial_cmp(&a.arc_cost())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.target().cmp(&a.target()))
        });

        self.stats.on_decisions_generated(children.len() as u64);
        for child in children {
            self.solver.stack.push(child);
        }
    }

    /// Prices a complete routing through the handler and updates the
    /// incumbent on improvement.
    fn handle_candidate(&mut self) -> Result<(), CandidateError> {
        self.stats.on_candidate_evaluated();
        let linear = self.state.partial_cost();
        let plan = RoutePlan::new(linear, self.state.arcs().to_vec());
        let objective = self.handler.evaluate(&plan, linear)?;

        if objective < self.best_objective {
            let accepted = RoutePlan::new(objective, plan.into_arcs());
            self.best_objective = objective;
            self.stats.on_solution_found();
            self.monitor.on_solution_found(&accepted);
            self.best_plan = Some(accepted);
        } else {
            self.stats.on_prune_bound();
        }
        Ok(())
    }

    /// Builds the outcome and closes the session.
    fn finalize(mut self, reason: TerminationReason) -> SolverOutcome<T> {
        self.stats.solve_duration = self.start_time.elapsed();
        self.monitor.on_exit_search();

        let best_bound = match &reason {
            TerminationReason::OptimalityProven => Some(self.best_objective),
            TerminationReason::InfeasibilityProven => None,
            TerminationReason::Aborted(_) => {
                // Everything not yet explored costs at least the smallest
                // pending bound; everything explored is dominated by the
                // incumbent.
                let pending = self.solver.stack.min_pending_bound();
                match (self.best_plan.is_some(), pending) {
                    (true, Some(p)) => Some(if p < self.best_objective {
                        p
                    } else {
                        self.best_objective
                    }),
                    (true, None) => Some(self.best_objective),
                    (false, Some(p)) => Some(p),
                    (false, None) => None,
                }
            }
        };

        let result = match &reason {
            TerminationReason::OptimalityProven => {
                let plan = self
                    .best_plan
                    .expect("expected an incumbent routing when optimality is proven");
                SolverResult::Optimal(plan)
            }
            TerminationReason::InfeasibilityProven => SolverResult::Infeasible,
            TerminationReason::Aborted(_) => match self.best_plan {
                Some(plan) => SolverResult::Feasible(plan),
                None => SolverResult::Unknown,
            },
        };

        SolverOutcome::new(result, reason, best_bound, self.stats)
    }
}
