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

//! # Decision Stack
//!
//! The frontier of the depth-first search, organized in frames: one frame
//! per search node, holding that node's not-yet-explored branching
//! decisions. Decisions carry the lower bound of the node that generated
//! them, so the tightest proven bound over the unexplored frontier can be
//! read off the stack when the search is aborted.

use convoy_model::index::NodeIndex;
use num_traits::Float;

/// One branching decision: route the open tail to `target`. A depot target
/// closes the open route; a customer target extends it (or starts a new
/// route when no route is open).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision<T> {
    target: NodeIndex,
    arc_cost: T,
    parent_bound: T,
}

impl<T> Decision<T>
where
    T: Float,
{
    #[inline]
    pub fn new(target: NodeIndex, arc_cost: T, parent_bound: T) -> Self {
        Self {
            target,
            arc_cost,
            parent_bound,
        }
    }

    /// The node the open tail is routed to.
    #[inline]
    pub fn target(&self) -> NodeIndex {
        self.target
    }

    /// The cost of the committed arc under the search's cost matrix.
    #[inline]
    pub fn arc_cost(&self) -> T {
        self.arc_cost
    }

    /// The lower bound of the node this decision branches from. Every
    /// completion reachable through this decision costs at least this much.
    #[inline]
    pub fn parent_bound(&self) -> T {
        self.parent_bound
    }
}

/// A stack of branching decisions organized in per-node frames.
#[derive(Clone, Debug)]
pub struct SearchStack<T> {
    entries: Vec<Decision<T>>,
    frames: Vec<usize>,
}

impl<T> Default for SearchStack<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchStack<T>
where
    T: Float,
{
    /// Creates a new empty stack.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a stack with preallocated storage for `num_nodes` nodes.
    #[inline]
    pub fn preallocated(num_nodes: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_nodes * num_nodes),
            frames: Vec::with_capacity(2 * num_nodes),
        }
    }

    /// The total number of pending decisions across all frames.
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// The number of open frames (the search depth plus one).
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Whether the stack has no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Opens a new frame for the node just descended into.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Closes the current frame. The frame must be exhausted.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if pending decisions remain in the frame.
    #[inline]
    pub fn pop_frame(&mut self) -> Option<()> {
        let start = self.frames.pop()?;
        debug_assert!(
            self.entries.len() == start,
            "called `SearchStack::pop_frame` with {} pending decisions in the frame",
            self.entries.len() - start
        );
        Some(())
    }

    /// Pushes a decision onto the current frame.
    #[inline]
    pub fn push(&mut self, decision: Decision<T>) {
        debug_assert!(
            !self.frames.is_empty(),
            "called `SearchStack::push` without an open frame"
        );
        self.entries.push(decision);
    }

    /// Pops the next decision of the current frame, or `None` if the frame
    /// is exhausted.
    #[inline]
    pub fn pop(&mut self) -> Option<Decision<T>> {
        let start = *self.frames.last()?;
        if self.entries.len() > start {
            self.entries.pop()
        } else {
            None
        }
    }

    /// Whether the current frame has no pending decisions.
    #[inline]
    pub fn is_current_level_empty(&self) -> bool {
        match self.frames.last() {
            Some(&start) => self.entries.len() <= start,
            None => true,
        }
    }

    /// The smallest parent bound over all pending decisions. This is a
    /// valid lower bound on every completion still reachable through the
    /// unexplored frontier.
    pub fn min_pending_bound(&self) -> Option<T> {
        self.entries
            .iter()
            .map(|d| d.parent_bound())
            .fold(None, |acc, b| match acc {
                None => Some(b),
                Some(a) => Some(if b < a { b } else { a }),
            })
    }

    /// Clears the stack without deallocating.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn decision(target: usize, cost: f64, bound: f64) -> Decision<f64> {
        Decision::new(node(target), cost, bound)
    }

    #[test]
    fn test_frames_isolate_levels() {
        let mut stack = SearchStack::new();
        stack.push_frame();
        stack.push(decision(1, 1.0, 0.0));
        stack.push(decision(2, 2.0, 0.0));

        stack.push_frame();
        assert!(stack.is_current_level_empty());
        // The parent's decisions are not visible from the child frame.
        assert!(stack.pop().is_none());

        stack.pop_frame().unwrap();
        assert_eq!(stack.pop().unwrap().target(), node(2));
        assert_eq!(stack.pop().unwrap().target(), node(1));
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_pop_is_lifo_within_frame() {
        let mut stack = SearchStack::new();
        stack.push_frame();
        stack.push(decision(3, 3.0, 0.0));
        stack.push(decision(1, 1.0, 0.0));
        assert_eq!(stack.pop().unwrap().target(), node(1));
        assert_eq!(stack.pop().unwrap().target(), node(3));
    }

    #[test]
    fn test_min_pending_bound() {
        let mut stack = SearchStack::new();
        assert!(stack.min_pending_bound().is_none());

        stack.push_frame();
        stack.push(decision(1, 1.0, 4.0));
        stack.push_frame();
        stack.push(decision(2, 1.0, 2.5));
        stack.push(decision(3, 1.0, 7.0));
        assert_eq!(stack.min_pending_bound(), Some(2.5));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut stack = SearchStack::new();
        stack.push_frame();
        stack.push(decision(1, 1.0, 0.0));
        stack.reset();
        assert!(stack.is_empty());
        assert_eq!(stack.num_entries(), 0);
    }
}
