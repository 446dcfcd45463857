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

//! # Deadline Monitor
//!
//! Enforces an absolute wall-clock deadline instead of a per-search budget.
//! Unlike the time-limit monitor, the deadline does not reset when a search
//! is entered, so one deadline can be shared between an outer search and the
//! subordinate searches it spawns: whichever search is running when the
//! deadline passes gets terminated.

use crate::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    num::SolverFloat,
};
use convoy_model::{instance::Instance, plan::RoutePlan};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineMonitor<T> {
    clock_check_mask: u64,
    steps: u64,
    deadline: std::time::Instant,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> DeadlineMonitor<T> {
    /// Same default cadence as the time-limit monitor.
    const DEFAULT_STEP_CLOCK_CHECK_MASK: u64 = 0x3FFF;

    /// Creates a monitor that terminates the search at `deadline`.
    #[inline]
    pub fn new(deadline: std::time::Instant) -> Self {
        Self {
            clock_check_mask: Self::DEFAULT_STEP_CLOCK_CHECK_MASK,
            steps: 0,
            deadline,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Creates a monitor whose deadline lies `budget` from now.
    #[inline]
    pub fn from_now(budget: std::time::Duration) -> Self {
        Self::new(std::time::Instant::now() + budget)
    }

    /// The absolute deadline this monitor enforces.
    #[inline]
    pub fn deadline(&self) -> std::time::Instant {
        self.deadline
    }
}

impl<T> SearchMonitor<T> for DeadlineMonitor<T>
where
    T: SolverFloat,
{
    fn name(&self) -> &str {
        "DeadlineMonitor"
    }

    // The deadline is absolute; entering a search does not reset it.
    fn on_enter_search(&mut self, _instance: &Instance<T>) {
        self.steps = 0;
    }

    fn on_exit_search(&mut self) {}

    fn on_solution_found(&mut self, _plan: &RoutePlan<T>) {}

    #[inline(always)]
    fn on_step(&mut self) {
        self.steps = self.steps.wrapping_add(1);
    }

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        if (self.steps & self.clock_check_mask) == 0 && std::time::Instant::now() >= self.deadline {
            return SearchCommand::Terminate("deadline reached".to_string());
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_terminates_once_deadline_passed() {
        let mon = DeadlineMonitor::<f64>::new(Instant::now() - Duration::from_millis(5));
        match mon.search_command() {
            SearchCommand::Terminate(msg) => assert!(msg.contains("deadline")),
            other => panic!("expected Terminate, got {:?}", other),
        }
    }

    #[test]
    fn test_continues_before_deadline() {
        let mon = DeadlineMonitor::<f64>::from_now(Duration::from_secs(3600));
        assert_eq!(mon.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_entering_search_does_not_reset_deadline() {
        let deadline = Instant::now() - Duration::from_millis(5);
        let mut mon = DeadlineMonitor::<f64>::new(deadline);
        let instance = {
            use convoy_model::{index::NodeIndex, instance::InstanceBuilder};
            let mut b = InstanceBuilder::new(1, 1.0);
            b.set_demand(NodeIndex::new(1), 0.5);
            b.build()
        };
        mon.on_enter_search(&instance);
        assert_eq!(mon.deadline(), deadline);
        assert!(matches!(mon.search_command(), SearchCommand::Terminate(_)));
    }
}
