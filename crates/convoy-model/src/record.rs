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

//! The three-line solution record exchanged with reporting tooling:
//!
//! ```raw
//! obj:1.9308
//! regret:0.1401
//! sol:[(0, 1), (1, 2), (2, 0)]
//! ```
//!
//! A file may hold any number of records back to back; lines between
//! records are ignored.

use crate::{index::NodeIndex, plan::RoutePlan};
use num_traits::Float;
use std::{fmt::Display, io::Write, str::FromStr};

/// One solved instance: the master objective, the realized regret, and the
/// directed arcs of the committed routing.
#[derive(Clone, PartialEq, Debug)]
pub struct SolutionRecord<T> {
    /// The master objective value (worst-case cost minus rival cost).
    pub objective: T,
    /// The min-max regret of the committed routing.
    pub regret: T,
    /// The directed arcs of the committed routing.
    pub arcs: Vec<(NodeIndex, NodeIndex)>,
}

/// The error type for record parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A record line was missing or carried the wrong prefix.
    MissingField(&'static str),
    /// A numeric value or arc tuple could not be parsed.
    Malformed(String),
}

impl Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Record is missing its '{}' line", field),
            Self::Malformed(detail) => write!(f, "Malformed record: {}", detail),
        }
    }
}

impl std::error::Error for RecordError {}

impl<T> SolutionRecord<T>
where
    T: Float + Display + FromStr,
{
    /// Builds a record from a committed plan and its evaluated regret.
    pub fn from_plan(plan: &RoutePlan<T>, regret: T) -> Self {
        Self {
            objective: plan.objective_value(),
            regret,
            arcs: plan.arcs().to_vec(),
        }
    }

    /// Writes this record in its three-line text form.
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "obj:{}", self.objective)?;
        writeln!(w, "regret:{}", self.regret)?;
        let arcs: Vec<String> = self
            .arcs
            .iter()
            .map(|(i, j)| format!("({}, {})", i.get(), j.get()))
            .collect();
        writeln!(w, "sol:[{}]", arcs.join(", "))
    }

    /// Parses every record found in the given text.
    pub fn parse_all(text: &str) -> Result<Vec<Self>, RecordError> {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let mut records = Vec::new();

        let mut idx = 0;
        while idx < lines.len() {
            let Some(obj_str) = lines[idx].strip_prefix("obj:") else {
                idx += 1;
                continue;
            };
            let regret_str = lines
                .get(idx + 1)
                .and_then(|l| l.strip_prefix("regret:"))
                .ok_or(RecordError::MissingField("regret"))?;
            let sol_str = lines
                .get(idx + 2)
                .and_then(|l| l.strip_prefix("sol:"))
                .ok_or(RecordError::MissingField("sol"))?;

            records.push(Self {
                objective: parse_value(obj_str)?,
                regret: parse_value(regret_str)?,
                arcs: parse_arc_list(sol_str)?,
            });
            idx += 3;
        }

        Ok(records)
    }
}

fn parse_value<T: FromStr>(s: &str) -> Result<T, RecordError> {
    s.trim()
        .parse::<T>()
        .map_err(|_| RecordError::Malformed(format!("could not parse value '{}'", s.trim())))
}

/// Parses `[(0, 1), (1, 2)]` into directed arcs. The empty list is valid.
fn parse_arc_list(s: &str) -> Result<Vec<(NodeIndex, NodeIndex)>, RecordError> {
    let inner = s
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| RecordError::Malformed(format!("arc list '{}' is not bracketed", s.trim())))?;

    let mut arcs = Vec::new();
    let mut rest = inner.trim_start();
    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| RecordError::Malformed("expected '(' in arc list".to_owned()))?;
        let close = rest[open..]
            .find(')')
            .map(|off| open + off)
            .ok_or_else(|| RecordError::Malformed("unclosed '(' in arc list".to_owned()))?;
        let pair = &rest[open + 1..close];
        let mut parts = pair.split(',');
        let i: usize = parse_value(parts.next().unwrap_or(""))?;
        let j = parse_value(
            parts
                .next()
                .ok_or_else(|| RecordError::Malformed(format!("arc '({})' has one entry", pair)))?,
        )?;
        if parts.next().is_some() {
            return Err(RecordError::Malformed(format!(
                "arc '({})' has more than two entries",
                pair
            )));
        }
        arcs.push((NodeIndex::new(i), NodeIndex::new(j)));
        rest = rest[close + 1..].trim_start();
    }
    Ok(arcs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(i: usize, j: usize) -> (NodeIndex, NodeIndex) {
        (NodeIndex::new(i), NodeIndex::new(j))
    }

    #[test]
    fn test_write_format() {
        let record = SolutionRecord {
            objective: 14.5f64,
            regret: 2.0,
            arcs: vec![arc(0, 1), arc(1, 2), arc(2, 0)],
        };
        let mut out = Vec::new();
        record.write_to(&mut out).expect("write failed");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "obj:14.5\nregret:2\nsol:[(0, 1), (1, 2), (2, 0)]\n"
        );
    }

    #[test]
    fn test_parse_roundtrip() {
        let record = SolutionRecord {
            objective: 1.9308f64,
            regret: 0.1401,
            arcs: vec![arc(0, 2), arc(2, 1), arc(1, 0)],
        };
        let mut out = Vec::new();
        record.write_to(&mut out).expect("write failed");
        let text = String::from_utf8(out).unwrap();

        let parsed = SolutionRecord::<f64>::parse_all(&text).expect("parse failed");
        assert_eq!(parsed, vec![record]);
    }

    #[test]
    fn test_parse_multiple_records_with_noise() {
        let text = "\
# run 1
obj:3.0
regret:0.5
sol:[(0, 1), (1, 0)]
elapsed: 12s
obj:4.0
regret:0
sol:[]
";
        let parsed = SolutionRecord::<f64>::parse_all(text).expect("parse failed");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].arcs, vec![arc(0, 1), arc(1, 0)]);
        assert!(parsed[1].arcs.is_empty());
    }

    #[test]
    fn test_parse_missing_sol_line() {
        let text = "obj:3.0\nregret:0.5\n";
        let res = SolutionRecord::<f64>::parse_all(text);
        assert_eq!(res, Err(RecordError::MissingField("sol")));
    }

    #[test]
    fn test_parse_malformed_arc() {
        let text = "obj:3.0\nregret:0.5\nsol:[(0, 1), (2)]\n";
        let res = SolutionRecord::<f64>::parse_all(text);
        assert!(matches!(res, Err(RecordError::Malformed(_))));
    }
}
