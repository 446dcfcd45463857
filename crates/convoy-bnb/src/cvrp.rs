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

//! # Exact CVRP Solver
//!
//! The convenience front end over the branch-and-bound engine for plain
//! capacitated routing: a fixed cost matrix, the linear objective, and an
//! optional savings warm start. Used both standalone and as the subproblem
//! solver of the robust decomposition.

use crate::{bnb::BnbSolver, handler::AcceptAll, savings::clarke_wright};
use convoy_core::num::approx::default_eps;
use convoy_model::{instance::Instance, matrix::CostMatrix};
use convoy_search::{
    monitor::search_monitor::SearchMonitor, num::SolverFloat, result::SolverOutcome,
};

/// An exact solver for capacitated routing under a fixed cost matrix.
#[derive(Clone, Debug)]
pub struct CvrpSolver<T> {
    eps: T,
    use_savings_warm_start: bool,
}

impl<T> Default for CvrpSolver<T>
where
    T: SolverFloat,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CvrpSolver<T>
where
    T: SolverFloat,
{
    /// Creates a solver with the default tolerance and the savings warm
    /// start enabled.
    #[inline]
    pub fn new() -> Self {
        Self {
            eps: default_eps(),
            use_savings_warm_start: true,
        }
    }

    /// Sets the numeric tolerance used for capacity comparisons.
    #[inline]
    pub fn eps(mut self, eps: T) -> Self {
        self.eps = eps;
        self
    }

    /// Enables or disables the savings warm start.
    #[inline]
    pub fn savings_warm_start(mut self, enabled: bool) -> Self {
        self.use_savings_warm_start = enabled;
        self
    }

    /// Solves the instance under the given cost matrix.
    pub fn solve<S>(
        &self,
        instance: &Instance<T>,
        costs: &CostMatrix<T>,
        monitor: S,
    ) -> SolverOutcome<T>
    where
        S: SearchMonitor<T>,
    {
        let warm = if self.use_savings_warm_start {
            clarke_wright(instance, costs, self.eps)
        } else {
            None
        };

        let mut solver = BnbSolver::with_eps(self.eps);
        let mut handler = AcceptAll::new();
        solver.solve_with_warm_start(instance, costs, &mut handler, monitor, warm.as_ref())
    }
}
