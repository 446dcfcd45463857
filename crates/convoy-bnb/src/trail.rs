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

//! # Search Trail
//!
//! Chronological undo log for the search state. Every applied branching
//! move pushes one undo token; backtracking pops the newest token and
//! restores the state. The trail depth equals the search depth.

use crate::state::{SearchState, UndoToken};
use num_traits::Float;

/// The undo log of a search run.
#[derive(Clone, Debug)]
pub struct SearchTrail<T> {
    entries: Vec<UndoToken<T>>,
}

impl<T> Default for SearchTrail<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchTrail<T>
where
    T: Float,
{
    /// Creates a new empty trail.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a trail with preallocated storage for `num_nodes` nodes.
    /// A depot-rooted routing has at most `2 * num_nodes` arcs, so that is
    /// the deepest the trail can grow.
    #[inline]
    pub fn preallocated(num_nodes: usize) -> Self {
        Self {
            entries: Vec::with_capacity(2 * num_nodes),
        }
    }

    /// The current search depth (number of applied moves).
    #[inline]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Whether no move is applied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records an applied move.
    #[inline]
    pub fn push(&mut self, token: UndoToken<T>) {
        self.entries.push(token);
    }

    /// Undoes the most recent move. Returns `None` on an empty trail.
    #[inline]
    pub fn backtrack(&mut self, state: &mut SearchState<T>) -> Option<()> {
        let token = self.entries.pop()?;
        state.restore(token);
        Some(())
    }

    /// Clears the trail without deallocating.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_model::index::{NodeIndex, DEPOT};

    fn node(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn test_backtrack_restores_in_reverse_order() {
        let mut state = SearchState::<f64>::new(3);
        let mut trail = SearchTrail::new();

        trail.push(state.apply(node(1), 2.0, 0.4));
        trail.push(state.apply(node(2), 1.0, 0.3));
        trail.push(state.apply(DEPOT, 3.0, 0.0));
        assert_eq!(trail.depth(), 3);

        trail.backtrack(&mut state).unwrap();
        assert_eq!(state.tail(), node(2));
        trail.backtrack(&mut state).unwrap();
        trail.backtrack(&mut state).unwrap();
        assert!(trail.is_empty());
        assert_eq!(state.num_visited(), 0);
        assert_eq!(state.partial_cost(), 0.0);
    }

    #[test]
    fn test_backtrack_on_empty_trail() {
        let mut state = SearchState::<f64>::new(2);
        let mut trail = SearchTrail::<f64>::new();
        assert!(trail.backtrack(&mut state).is_none());
    }
}
