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

//! Instance loaders for the two text formats robust-routing benchmarks
//! come in, plus a reader for sampled-scenario files.
//!
//! The edge-list format starts with the customer count `n`, followed by
//! one line per edge `i j upper lower` up to a `node_demand` marker, then
//! `n` demand lines:
//!
//! ```raw
//! 2
//! 0 1 4.0 1.0
//! 0 2 3.0 3.0
//! 1 2 2.5 2.0
//! node_demand
//! 0.3
//! 0.4
//! ```
//!
//! The matrix-block format carries full `(n+1) x (n+1)` bound matrices
//! under `min_dist:` and `max_dist:` markers and the customer demands under
//! `node_demand:`. Scenario-sample files hold realized cost matrices, one
//! per `--- Sample` section under a `dist_matrix:` marker.
//!
//! The vehicle capacity is not part of either format; the loader carries it
//! as configuration and defaults to `1.0`, matching instances with demands
//! normalized against the vehicle.

use crate::{
    index::NodeIndex,
    instance::{Instance, InstanceBuilder},
    matrix::CostMatrix,
};
use num_traits::Float;
use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the instance loading process.
#[derive(Debug)]
pub enum InstanceLoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input ended before the expected data was complete.
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// The customer count is invalid (must be > 0).
    InvalidDimensions,
    /// A required section marker was not found.
    MissingMarker(&'static str),
    /// A matrix row had the wrong number of entries.
    WrongRowLength { expected: usize, found: usize },
    /// An edge was given a lower bound above its upper bound.
    InvalidInterval { i: usize, j: usize },
    /// A customer was given a negative demand.
    InvalidDemand { customer: usize },
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "f64").
    pub type_name: &'static str,
}

impl std::fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl Display for InstanceLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while parsing instance"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::InvalidDimensions => {
                write!(f, "The customer count must be a positive integer")
            }
            Self::MissingMarker(marker) => {
                write!(f, "Required section marker '{}' not found", marker)
            }
            Self::WrongRowLength { expected, found } => {
                write!(
                    f,
                    "Matrix row has {} entries but {} were expected",
                    found, expected
                )
            }
            Self::InvalidInterval { i, j } => {
                write!(
                    f,
                    "Edge ({}, {}) has its lower bound above its upper bound",
                    i, j
                )
            }
            Self::InvalidDemand { customer } => {
                write!(f, "Customer {} has a negative demand", customer)
            }
        }
    }
}

impl std::error::Error for InstanceLoaderError {}

impl From<std::io::Error> for InstanceLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for InstanceLoaderError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

fn parse_token<T: FromStr>(token: &str) -> Result<T, InstanceLoaderError> {
    token.parse::<T>().map_err(|_| {
        InstanceLoaderError::Parse(ParseTokenError {
            token: token.to_owned(),
            type_name: std::any::type_name::<T>(),
        })
    })
}

/// Reads all non-empty, trimmed lines from a reader.
fn read_lines<R: BufRead>(rdr: R) -> Result<Vec<String>, InstanceLoaderError> {
    let mut lines = Vec::new();
    for line in rdr.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_owned());
        }
    }
    Ok(lines)
}

/// A configurable loader for robust CVRP instances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceLoader<T> {
    capacity: T,
}

impl<T> Default for InstanceLoader<T>
where
    T: Float,
{
    fn default() -> Self {
        Self {
            capacity: T::one(),
        }
    }
}

impl<T> InstanceLoader<T>
where
    T: Float + FromStr,
{
    /// Creates a new `InstanceLoader` with capacity `1.0`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the uniform vehicle capacity attached to loaded instances.
    #[inline]
    pub fn capacity(mut self, capacity: T) -> Self {
        self.capacity = capacity;
        self
    }

    /// Loads an edge-list instance from a type implementing `BufRead`.
    pub fn edge_list_from_bufread<R: BufRead>(
        &self,
        rdr: R,
    ) -> Result<Instance<T>, InstanceLoaderError> {
        let lines = read_lines(rdr)?;
        let mut iter = lines.iter();

        let n: usize = parse_token(iter.next().ok_or(InstanceLoaderError::UnexpectedEof)?)?;
        if n == 0 {
            return Err(InstanceLoaderError::InvalidDimensions);
        }

        let mut builder = InstanceBuilder::new(n, self.capacity);

        // Edge lines run until the demand marker: i j upper lower.
        let mut saw_marker = false;
        for line in iter.by_ref() {
            if line.starts_with("node_demand") {
                saw_marker = true;
                break;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != 4 {
                return Err(InstanceLoaderError::WrongRowLength {
                    expected: 4,
                    found: tokens.len(),
                });
            }
            let i: usize = parse_token(tokens[0])?;
            let j: usize = parse_token(tokens[1])?;
            if i > n || j > n {
                return Err(InstanceLoaderError::InvalidDimensions);
            }
            let hi: T = parse_token(tokens[2])?;
            let lo: T = parse_token(tokens[3])?;
            if lo > hi {
                return Err(InstanceLoaderError::InvalidInterval { i, j });
            }
            builder.set_edge_bounds(NodeIndex::new(i), NodeIndex::new(j), lo, hi);
        }
        if !saw_marker {
            return Err(InstanceLoaderError::MissingMarker("node_demand"));
        }

        for customer in 1..=n {
            let line = iter.next().ok_or(InstanceLoaderError::UnexpectedEof)?;
            let demand: T = parse_token(line)?;
            if demand < T::zero() {
                return Err(InstanceLoaderError::InvalidDemand { customer });
            }
            builder.set_demand(NodeIndex::new(customer), demand);
        }

        Ok(builder.build())
    }

    /// Loads a matrix-block instance from a type implementing `BufRead`.
    pub fn matrix_blocks_from_bufread<R: BufRead>(
        &self,
        rdr: R,
    ) -> Result<Instance<T>, InstanceLoaderError> {
        let lines = read_lines(rdr)?;

        let min_idx = find_marker(&lines, "min_dist:")?;
        let max_idx = find_marker(&lines, "max_dist:")?;
        let demand_idx = find_marker(&lines, "node_demand:")?;

        // The node count is implied by the span of the first matrix block.
        let num_nodes = max_idx
            .checked_sub(min_idx + 1)
            .ok_or(InstanceLoaderError::InvalidDimensions)?;
        if num_nodes < 2 {
            return Err(InstanceLoaderError::InvalidDimensions);
        }
        let n = num_nodes - 1;

        let lower = parse_matrix_block(&lines, min_idx + 1, num_nodes)?;
        let upper = parse_matrix_block(&lines, max_idx + 1, num_nodes)?;

        let mut builder = InstanceBuilder::new(n, self.capacity);
        for i in 0..num_nodes {
            for j in (i + 1)..num_nodes {
                let (ni, nj) = (NodeIndex::new(i), NodeIndex::new(j));
                let lo = lower.get(ni, nj);
                let hi = upper.get(ni, nj);
                if lo > hi {
                    return Err(InstanceLoaderError::InvalidInterval { i, j });
                }
                builder.set_edge_bounds(ni, nj, lo, hi);
            }
        }

        for customer in 1..=n {
            let line = lines
                .get(demand_idx + customer)
                .ok_or(InstanceLoaderError::UnexpectedEof)?;
            let demand: T = parse_token(line)?;
            if demand < T::zero() {
                return Err(InstanceLoaderError::InvalidDemand { customer });
            }
            builder.set_demand(NodeIndex::new(customer), demand);
        }

        Ok(builder.build())
    }

    /// Loads an edge-list instance from a file path.
    #[inline]
    pub fn edge_list_from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Instance<T>, InstanceLoaderError> {
        let file = File::open(path)?;
        self.edge_list_from_bufread(BufReader::new(file))
    }

    /// Loads a matrix-block instance from a file path.
    #[inline]
    pub fn matrix_blocks_from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Instance<T>, InstanceLoaderError> {
        let file = File::open(path)?;
        self.matrix_blocks_from_bufread(BufReader::new(file))
    }

    /// Loads an edge-list instance from a string slice.
    #[inline]
    pub fn edge_list_from_str(&self, s: &str) -> Result<Instance<T>, InstanceLoaderError> {
        self.edge_list_from_bufread(s.as_bytes())
    }

    /// Loads a matrix-block instance from a string slice.
    #[inline]
    pub fn matrix_blocks_from_str(&self, s: &str) -> Result<Instance<T>, InstanceLoaderError> {
        self.matrix_blocks_from_bufread(s.as_bytes())
    }
}

fn find_marker(lines: &[String], marker: &'static str) -> Result<usize, InstanceLoaderError> {
    lines
        .iter()
        .position(|l| l.starts_with(marker))
        .ok_or(InstanceLoaderError::MissingMarker(marker))
}

fn parse_matrix_block<T>(
    lines: &[String],
    start: usize,
    num_nodes: usize,
) -> Result<CostMatrix<T>, InstanceLoaderError>
where
    T: Float + FromStr,
{
    let mut matrix = CostMatrix::zeros(num_nodes);
    for i in 0..num_nodes {
        let line = lines
            .get(start + i)
            .ok_or(InstanceLoaderError::UnexpectedEof)?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != num_nodes {
            return Err(InstanceLoaderError::WrongRowLength {
                expected: num_nodes,
                found: tokens.len(),
            });
        }
        // Only the upper triangle matters; the blocks are symmetric.
        for (j, token) in tokens.iter().enumerate().skip(i + 1) {
            let value: T = parse_token(token)?;
            matrix.set_symmetric(NodeIndex::new(i), NodeIndex::new(j), value);
        }
    }
    Ok(matrix)
}

/// Reads realized cost matrices from a scenario-sample file.
///
/// Each `--- Sample` section carries one `dist_matrix:` block; rows are read
/// until a non-numeric line or the end of the section. Sections without a
/// matrix are skipped.
pub fn scenario_samples_from_bufread<T, R>(rdr: R) -> Result<Vec<CostMatrix<T>>, InstanceLoaderError>
where
    T: Float + FromStr,
    R: BufRead,
{
    let lines = read_lines(rdr)?;
    let mut samples = Vec::new();

    let mut idx = 0;
    while idx < lines.len() {
        if !lines[idx].starts_with("--- Sample") {
            idx += 1;
            continue;
        }
        // Scan this section for its matrix block.
        idx += 1;
        let mut rows: Vec<Vec<T>> = Vec::new();
        let mut in_matrix = false;
        while idx < lines.len() && !lines[idx].starts_with("--- Sample") {
            let line = &lines[idx];
            if line.starts_with("dist_matrix:") {
                in_matrix = true;
            } else if in_matrix {
                match line
                    .split_whitespace()
                    .map(parse_token::<T>)
                    .collect::<Result<Vec<T>, _>>()
                {
                    Ok(row) => rows.push(row),
                    Err(_) => in_matrix = false,
                }
            }
            idx += 1;
        }
        if rows.is_empty() {
            continue;
        }

        let dim = rows.len();
        let mut matrix = CostMatrix::zeros(dim);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(InstanceLoaderError::WrongRowLength {
                    expected: dim,
                    found: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate().skip(i + 1) {
                matrix.set_symmetric(NodeIndex::new(i), NodeIndex::new(j), value);
            }
        }
        samples.push(matrix);
    }

    Ok(samples)
}

/// Reads realized cost matrices from a scenario-sample file path.
#[inline]
pub fn scenario_samples_from_path<T, P>(path: P) -> Result<Vec<CostMatrix<T>>, InstanceLoaderError>
where
    T: Float + FromStr,
    P: AsRef<Path>,
{
    let file = File::open(path)?;
    scenario_samples_from_bufread(BufReader::new(file))
}

/// Reads realized cost matrices from a string slice.
#[inline]
pub fn scenario_samples_from_str<T>(s: &str) -> Result<Vec<CostMatrix<T>>, InstanceLoaderError>
where
    T: Float + FromStr,
{
    scenario_samples_from_bufread(s.as_bytes())
}

/// Loads a scenario-sample from a generic reader.
#[inline]
pub fn scenario_samples_from_reader<T, R>(r: R) -> Result<Vec<CostMatrix<T>>, InstanceLoaderError>
where
    T: Float + FromStr,
    R: Read,
{
    scenario_samples_from_bufread(BufReader::new(r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::DEPOT;

    fn node(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    const EDGE_LIST_INSTANCE: &str = "\
2
0 1 4.0 1.0
0 2 3.0 3.0
1 2 2.5 2.0
node_demand
0.3
0.4
";

    const MATRIX_BLOCKS_INSTANCE: &str = "\
min_dist:
0.0 1.0 3.0
1.0 0.0 2.0
3.0 2.0 0.0
max_dist:
0.0 4.0 3.0
4.0 0.0 2.5
3.0 2.5 0.0
node_demand:
0.3
0.4
";

    #[test]
    fn test_edge_list_loads_bounds_and_demands() {
        let ins = InstanceLoader::<f64>::new()
            .edge_list_from_str(EDGE_LIST_INSTANCE)
            .expect("Failed to load");

        assert_eq!(ins.num_customers(), 2);
        assert_eq!(ins.capacity(), 1.0);
        assert_eq!(ins.lower(node(0), node(1)), 1.0);
        assert_eq!(ins.upper(node(0), node(1)), 4.0);
        assert_eq!(ins.lower(node(1), node(2)), 2.0);
        assert_eq!(ins.demand(node(1)), 0.3);
        assert_eq!(ins.demand(node(2)), 0.4);
        assert_eq!(ins.demand(DEPOT), 0.0);
    }

    #[test]
    fn test_matrix_blocks_matches_edge_list() {
        let a = InstanceLoader::<f64>::new()
            .edge_list_from_str(EDGE_LIST_INSTANCE)
            .expect("Failed to load edge list");
        let b = InstanceLoader::<f64>::new()
            .matrix_blocks_from_str(MATRIX_BLOCKS_INSTANCE)
            .expect("Failed to load matrix blocks");
        assert_eq!(a, b);
    }

    #[test]
    fn test_capacity_configuration() {
        let ins = InstanceLoader::<f64>::new()
            .capacity(30.0)
            .edge_list_from_str(EDGE_LIST_INSTANCE)
            .expect("Failed to load");
        assert_eq!(ins.capacity(), 30.0);
    }

    #[test]
    fn test_edge_list_missing_marker() {
        let data = "1\n0 1 2.0 1.0\n0.5\n";
        let res = InstanceLoader::<f64>::new().edge_list_from_str(data);
        assert!(matches!(
            res,
            Err(InstanceLoaderError::MissingMarker("node_demand"))
        ));
    }

    #[test]
    fn test_edge_list_rejects_inverted_interval() {
        let data = "1\n0 1 1.0 2.0\nnode_demand\n0.5\n";
        let res = InstanceLoader::<f64>::new().edge_list_from_str(data);
        assert!(matches!(
            res,
            Err(InstanceLoaderError::InvalidInterval { i: 0, j: 1 })
        ));
    }

    #[test]
    fn test_edge_list_parse_error_keeps_token() {
        let data = "1\n0 1 garbage 1.0\nnode_demand\n0.5\n";
        let res = InstanceLoader::<f64>::new().edge_list_from_str(data);
        match res {
            Err(InstanceLoaderError::Parse(e)) => {
                assert_eq!(e.token, "garbage");
                assert!(e.type_name.contains("f64"));
            }
            _ => panic!("Expected Parse error with context"),
        }
    }

    #[test]
    fn test_edge_list_truncated_demands() {
        let data = "2\n0 1 2.0 1.0\nnode_demand\n0.5\n";
        let res = InstanceLoader::<f64>::new().edge_list_from_str(data);
        assert!(matches!(res, Err(InstanceLoaderError::UnexpectedEof)));
    }

    #[test]
    fn test_scenario_samples() {
        let data = "\
min_dist:
0.0 1.0
1.0 0.0
max_dist:
0.0 2.0
2.0 0.0
--- Sample 1 ---
dist_matrix:
0.0 1.5
1.5 0.0
--- Sample 2 ---
dist_matrix:
0.0 1.8
1.8 0.0
";
        let samples: Vec<CostMatrix<f64>> =
            scenario_samples_from_str(data).expect("Failed to load samples");
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].get(node(0), node(1)), 1.5);
        assert_eq!(samples[1].get(node(1), node(0)), 1.8);
    }
}
