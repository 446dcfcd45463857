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

//! # Convoy Model
//!
//! Problem data for robust capacitated vehicle routing: nodes and demands,
//! interval-bounded symmetric edge costs, routing solutions, and the text
//! formats the surrounding tooling exchanges.
//!
//! ## Modules
//!
//! - `index`: the typed node index (`NodeIndex`, depot = node 0).
//! - `matrix`: dense symmetric cost matrices over all node pairs.
//! - `instance`: the immutable problem instance and its builder.
//! - `plan`: arc-based routing solutions and their route decomposition.
//! - `scenario`: random cost realizations drawn within the interval bounds.
//! - `loading`: parsers for the two instance file formats and for
//!   sample-scenario files.
//! - `record`: the three-line solution record exchanged with reporting
//!   tooling.

pub mod index;
pub mod instance;
pub mod loading;
pub mod matrix;
pub mod plan;
pub mod record;
pub mod scenario;
