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

//! # Symmetric Cost Matrices
//!
//! A dense square matrix of edge costs over all node pairs. Costs are
//! symmetric by construction: [`CostMatrix::set_symmetric`] writes both
//! directions, and the loaders only ever go through it. The diagonal is
//! meaningless and kept at zero.

use crate::index::NodeIndex;
use num_traits::Float;

/// A dense, symmetric `dim x dim` matrix of edge costs.
#[derive(Clone, PartialEq, Debug)]
pub struct CostMatrix<T> {
    dim: usize,
    data: Vec<T>,
}

impl<T> CostMatrix<T>
where
    T: Float,
{
    /// Creates a `dim x dim` matrix filled with zeros.
    #[inline]
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            data: vec![T::zero(); dim * dim],
        }
    }

    /// The number of nodes (rows/columns) of the matrix.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the cost of the edge between `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, i: NodeIndex, j: NodeIndex) -> T {
        debug_assert!(
            i.get() < self.dim && j.get() < self.dim,
            "called `CostMatrix::get` with index out of bounds: dim is {} but indices are ({}, {})",
            self.dim,
            i.get(),
            j.get()
        );
        self.data[i.get() * self.dim + j.get()]
    }

    /// Sets the cost of the edge between `i` and `j` in both directions.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn set_symmetric(&mut self, i: NodeIndex, j: NodeIndex, value: T) {
        debug_assert!(
            i.get() < self.dim && j.get() < self.dim,
            "called `CostMatrix::set_symmetric` with index out of bounds: dim is {} but indices are ({}, {})",
            self.dim,
            i.get(),
            j.get()
        );
        self.data[i.get() * self.dim + j.get()] = value;
        self.data[j.get() * self.dim + i.get()] = value;
    }

    /// Whether the matrix is symmetric. Always true for matrices built
    /// through `set_symmetric`; useful as a test invariant.
    pub fn is_symmetric(&self) -> bool {
        for i in 0..self.dim {
            for j in (i + 1)..self.dim {
                if self.data[i * self.dim + j] != self.data[j * self.dim + i] {
                    return false;
                }
            }
        }
        true
    }

    /// Iterates over all undirected edges `(i, j)` with `i < j`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        (0..self.dim).flat_map(move |i| {
            ((i + 1)..self.dim).map(move |j| (NodeIndex::new(i), NodeIndex::new(j)))
        })
    }

    /// The sum of all directed arc costs, i.e. every undirected edge counted
    /// once per direction. A routing may traverse both directions of an edge
    /// (out-and-back routes do), so this is the correct coarse upper bound on
    /// any routing cost.
    pub fn directed_sum(&self) -> T {
        let mut total = T::zero();
        for (i, j) in self.edges() {
            total = total + self.get(i, j) + self.get(i, j);
        }
        total
    }
}
