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

//! # Candidate Handlers
//!
//! The hook through which the engine delegates the part of the objective it
//! cannot evaluate itself. Whenever the search completes a full routing it
//! calls [`CandidateHandler::evaluate`] with the candidate plan and its cost
//! under the search's cost matrix; the handler returns the candidate's true
//! objective, which may differ from the linear cost when the handler models
//! an adversarial or recourse term.
//!
//! [`CandidateHandler::adjustment_bound`] must return a lower bound on the
//! difference between the true objective and the linear cost, valid for
//! every complete routing. The engine adds it to its linear lower bounds, so
//! an overly optimistic value breaks pruning correctness.

use crate::state::SearchState;
use convoy_model::plan::RoutePlan;
use convoy_search::num::SolverFloat;

/// The error type for candidate evaluation. Evaluation failures abort the
/// search, so the message ends up in the termination reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateError(pub String);

impl std::fmt::Display for CandidateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "candidate evaluation failed: {}", self.0)
    }
}

impl std::error::Error for CandidateError {}

/// Evaluates complete candidate routings on behalf of the search.
pub trait CandidateHandler<T>
where
    T: SolverFloat,
{
    fn name(&self) -> &str;

    /// Returns the true objective of a complete candidate routing.
    /// `linear_cost` is the plan's cost under the search's cost matrix.
    fn evaluate(&mut self, plan: &RoutePlan<T>, linear_cost: T) -> Result<T, CandidateError>;

    /// A lower bound on `true objective - linear cost` over all complete
    /// routings. Must never exceed the actual difference for any candidate.
    fn adjustment_bound(&self) -> T;

    /// Called once per explored node. Handlers that track search progress
    /// can hook in here; the default does nothing.
    #[inline]
    fn on_node(&mut self, _state: &SearchState<T>) {}
}

/// The pass-through handler: the linear cost is the objective. Turns the
/// engine into a plain exact solver for the given cost matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AcceptAll;

impl AcceptAll {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> CandidateHandler<T> for AcceptAll
where
    T: SolverFloat,
{
    fn name(&self) -> &str {
        "AcceptAll"
    }

    #[inline]
    fn evaluate(&mut self, _plan: &RoutePlan<T>, linear_cost: T) -> Result<T, CandidateError> {
        Ok(linear_cost)
    }

    #[inline]
    fn adjustment_bound(&self) -> T {
        T::zero()
    }
}
