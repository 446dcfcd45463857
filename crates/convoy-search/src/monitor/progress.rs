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

//! # Progress Monitor
//!
//! Logs incumbents and search lifecycle events to a writer, one line per
//! event with the elapsed wall-clock time. Intended for long-running solves
//! where silent searches are hard to babysit.

use crate::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    num::SolverFloat,
};
use convoy_model::{instance::Instance, plan::RoutePlan};
use std::io::Write;

/// A monitor that writes one log line per lifecycle event. Never terminates
/// the search. Write errors are swallowed; logging must not fail a solve.
pub struct ProgressMonitor<T, W> {
    sink: W,
    start_time: std::time::Instant,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> ProgressMonitor<T, std::io::Stdout> {
    /// Creates a monitor logging to standard output.
    #[inline]
    pub fn stdout() -> Self {
        Self::with_sink(std::io::stdout())
    }
}

impl<T, W> ProgressMonitor<T, W>
where
    W: Write,
{
    /// Creates a monitor logging to an arbitrary writer.
    #[inline]
    pub fn with_sink(sink: W) -> Self {
        Self {
            sink,
            start_time: std::time::Instant::now(),
            _phantom: std::marker::PhantomData,
        }
    }

    fn log(&mut self, message: std::fmt::Arguments<'_>) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let _ = writeln!(self.sink, "[{:9.3}s] {}", elapsed, message);
    }
}

impl<T, W> SearchMonitor<T> for ProgressMonitor<T, W>
where
    T: SolverFloat,
    W: Write,
{
    fn name(&self) -> &str {
        "ProgressMonitor"
    }

    fn on_enter_search(&mut self, instance: &Instance<T>) {
        self.start_time = std::time::Instant::now();
        let customers = instance.num_customers();
        self.log(format_args!("search started ({} customers)", customers));
    }

    fn on_exit_search(&mut self) {
        self.log(format_args!("search finished"));
    }

    fn on_solution_found(&mut self, plan: &RoutePlan<T>) {
        let objective = plan.objective_value();
        self.log(format_args!("incumbent objective {}", objective));
    }

    #[inline(always)]
    fn on_step(&mut self) {}

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_model::{index::NodeIndex, instance::InstanceBuilder};

    fn tiny_instance() -> Instance<f64> {
        let mut b = InstanceBuilder::new(1, 1.0);
        b.set_demand(NodeIndex::new(1), 0.5);
        b.build()
    }

    #[test]
    fn test_logs_lifecycle_and_incumbents() {
        let mut sink = Vec::new();
        {
            let mut mon = ProgressMonitor::<f64, _>::with_sink(&mut sink);
            mon.on_enter_search(&tiny_instance());
            mon.on_solution_found(&RoutePlan::new(
                7.5,
                vec![
                    (NodeIndex::new(0), NodeIndex::new(1)),
                    (NodeIndex::new(1), NodeIndex::new(0)),
                ],
            ));
            mon.on_exit_search();
        }
        let log = String::from_utf8(sink).unwrap();
        assert!(log.contains("search started (1 customers)"));
        assert!(log.contains("incumbent objective 7.5"));
        assert!(log.contains("search finished"));
    }

    #[test]
    fn test_never_terminates() {
        let mon = ProgressMonitor::<f64, _>::with_sink(Vec::new());
        assert_eq!(mon.search_command(), SearchCommand::Continue);
    }
}
