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

/// Statistics collected during a search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchStatistics {
    /// Number of branch-and-bound nodes explored.
    pub nodes_explored: u64,
    /// Number of branching decisions generated.
    pub decisions_generated: u64,
    /// Number of subtrees pruned by the lower bound.
    pub prunes_bound: u64,
    /// Number of subtrees pruned as capacity-infeasible.
    pub prunes_infeasible: u64,
    /// Number of improving solutions found.
    pub solutions_found: u64,
    /// Number of candidate solutions handed to the candidate handler.
    pub candidates_evaluated: u64,
    /// Number of lazy cuts added in response to candidates.
    pub cuts_generated: u64,
    /// Number of subordinate solves triggered by candidates.
    pub subproblem_solves: u64,
    /// Maximum search depth reached.
    pub max_depth: usize,
    /// Total duration of the search.
    pub solve_duration: std::time::Duration,
}

impl SearchStatistics {
    /// Creates zeroed statistics.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored += 1;
    }

    #[inline]
    pub fn on_decisions_generated(&mut self, count: u64) {
        self.decisions_generated += count;
    }

    #[inline]
    pub fn on_prune_bound(&mut self) {
        self.prunes_bound += 1;
    }

    #[inline]
    pub fn on_prune_infeasible(&mut self) {
        self.prunes_infeasible += 1;
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found += 1;
    }

    #[inline]
    pub fn on_candidate_evaluated(&mut self) {
        self.candidates_evaluated += 1;
    }

    #[inline]
    pub fn on_depth_reached(&mut self, depth: usize) {
        if depth > self.max_depth {
            self.max_depth = depth;
        }
    }

    /// Folds statistics from a subordinate search into this one. Durations
    /// add up; the maximum depth does not carry across searches.
    pub fn absorb_subsearch(&mut self, other: &SearchStatistics) {
        self.nodes_explored += other.nodes_explored;
        self.decisions_generated += other.decisions_generated;
        self.prunes_bound += other.prunes_bound;
        self.prunes_infeasible += other.prunes_infeasible;
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Nodes Explored: {}", self.nodes_explored)?;
        writeln!(f, "  Decisions Generated: {}", self.decisions_generated)?;
        writeln!(f, "  Prunes (bound): {}", self.prunes_bound)?;
        writeln!(f, "  Prunes (infeasible): {}", self.prunes_infeasible)?;
        writeln!(f, "  Solutions Found: {}", self.solutions_found)?;
        writeln!(f, "  Candidates Evaluated: {}", self.candidates_evaluated)?;
        writeln!(f, "  Cuts Generated: {}", self.cuts_generated)?;
        writeln!(f, "  Subproblem Solves: {}", self.subproblem_solves)?;
        writeln!(f, "  Max Depth: {}", self.max_depth)?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_mutators_accumulate() {
        let mut stats = SearchStatistics::new();
        stats.on_node_explored();
        stats.on_node_explored();
        stats.on_decisions_generated(5);
        stats.on_prune_bound();
        stats.on_prune_infeasible();
        stats.on_solution_found();
        stats.on_candidate_evaluated();
        stats.on_depth_reached(3);
        stats.on_depth_reached(2);

        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.decisions_generated, 5);
        assert_eq!(stats.prunes_bound, 1);
        assert_eq!(stats.prunes_infeasible, 1);
        assert_eq!(stats.solutions_found, 1);
        assert_eq!(stats.candidates_evaluated, 1);
        assert_eq!(stats.max_depth, 3);
    }

    #[test]
    fn test_absorb_subsearch_sums_node_counters() {
        let mut outer = SearchStatistics::new();
        outer.on_node_explored();
        outer.on_depth_reached(7);

        let mut inner = SearchStatistics::new();
        inner.on_node_explored();
        inner.on_node_explored();
        inner.on_decisions_generated(4);
        inner.on_depth_reached(12);

        outer.absorb_subsearch(&inner);
        assert_eq!(outer.nodes_explored, 3);
        assert_eq!(outer.decisions_generated, 4);
        // Depth is per-search.
        assert_eq!(outer.max_depth, 7);
    }

    #[test]
    fn test_display_formats_all_fields() {
        let stats = SearchStatistics {
            nodes_explored: 10,
            decisions_generated: 20,
            prunes_bound: 3,
            prunes_infeasible: 2,
            solutions_found: 1,
            candidates_evaluated: 4,
            cuts_generated: 2,
            subproblem_solves: 4,
            max_depth: 9,
            solve_duration: Duration::from_millis(1234),
        };

        let rendered = format!("{}", stats);
        assert!(rendered.contains("Nodes Explored: 10"));
        assert!(rendered.contains("Prunes (bound): 3"));
        assert!(rendered.contains("Cuts Generated: 2"));
        assert!(rendered.contains("Solve Duration (secs): 1.234"));
    }
}
