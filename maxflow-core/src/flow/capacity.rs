// Licensed under the Apache License, Version 2.0 (the "License"); you may
// not use this file except in compliance with the License. You may obtain
// a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations
// under the License.

use std::fmt::Debug;
use std::ops::{AddAssign, SubAssign};

use ndarray::Array2;
use num_traits::{PrimInt, Signed};
use petgraph::visit::{EdgeRef, IntoEdges, NodeIndexable};

use super::error::MaxFlowError;

/// Numeric type shared by capacities and flow values.
///
/// Flows are skew symmetric, so the type has to be signed, and integral
/// values are what guarantees that every strategy terminates. Any signed
/// primitive integer qualifies.
pub trait Capacity: PrimInt + Signed + AddAssign + SubAssign + Debug + Send + Sync {}

impl<T> Capacity for T where T: PrimInt + Signed + AddAssign + SubAssign + Debug + Send + Sync {}

/// Read-only access to the capacity of every ordered vertex pair.
///
/// Vertices are addressed by their dense index (see
/// [`NodeIndexable::to_index`]). Pairs outside `0..dimension()` have a
/// capacity of zero.
pub trait CapacityMatrix<T> {
    /// The capacity of the directed edge `(u, v)`, zero if it is absent.
    fn capacity(&self, u: usize, v: usize) -> T;

    /// The number of vertices the matrix covers.
    fn dimension(&self) -> usize;
}

impl<T, C> CapacityMatrix<T> for &C
where
    C: CapacityMatrix<T> + ?Sized,
{
    fn capacity(&self, u: usize, v: usize) -> T {
        (**self).capacity(u, v)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

/// The default capacity: every edge present in the graph carries one unit.
///
/// Edge existence is answered from the outgoing edges of the graph, nothing
/// besides the graph reference is stored.
pub struct StructuralCapacity<G> {
    graph: G,
}

impl<G> StructuralCapacity<G>
where
    G: IntoEdges + NodeIndexable,
{
    pub fn new(graph: G) -> Self {
        StructuralCapacity { graph }
    }
}

impl<G, T> CapacityMatrix<T> for StructuralCapacity<G>
where
    G: IntoEdges + NodeIndexable,
    T: Capacity,
{
    fn capacity(&self, u: usize, v: usize) -> T {
        let bound = self.graph.node_bound();
        if u >= bound || v >= bound {
            return T::zero();
        }

        let a = self.graph.from_index(u);
        let b = self.graph.from_index(v);
        if self.graph.edges(a).any(|e| e.target() == b) {
            T::one()
        } else {
            T::zero()
        }
    }

    fn dimension(&self) -> usize {
        self.graph.node_bound()
    }
}

/// Explicit capacities stored in a square, non-negative matrix.
///
/// `matrix[[u, v]]` is the capacity of the edge `(u, v)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseCapacity<T> {
    matrix: Array2<T>,
}

impl<T: Capacity> DenseCapacity<T> {
    /// Wrap an existing matrix.
    ///
    /// Fails with [`MaxFlowError::DimensionMismatch`] if the matrix is not
    /// square and with [`MaxFlowError::NegativeCapacity`] on the first
    /// negative entry.
    pub fn new(matrix: Array2<T>) -> Result<Self, MaxFlowError> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(MaxFlowError::DimensionMismatch {
                expected: rows,
                found: cols,
            });
        }

        if let Some(((tail, head), _)) = matrix.indexed_iter().find(|(_, c)| c.is_negative()) {
            return Err(MaxFlowError::NegativeCapacity { tail, head });
        }

        Ok(DenseCapacity { matrix })
    }

    /// An all-zero matrix over `node_count` vertices.
    pub fn zeros(node_count: usize) -> Self {
        DenseCapacity {
            matrix: Array2::zeros((node_count, node_count)),
        }
    }

    /// Build a matrix from `(tail, head, capacity)` triples.
    ///
    /// A later triple for the same pair replaces the earlier one.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<Self, MaxFlowError>
    where
        I: IntoIterator<Item = (usize, usize, T)>,
    {
        let mut capacities = Self::zeros(node_count);
        for (tail, head, capacity) in edges {
            capacities.set(tail, head, capacity)?;
        }
        Ok(capacities)
    }

    /// Set the capacity of the edge `(tail, head)`.
    pub fn set(&mut self, tail: usize, head: usize, capacity: T) -> Result<(), MaxFlowError> {
        let node_count = self.matrix.nrows();
        if tail >= node_count || head >= node_count {
            return Err(MaxFlowError::MalformedGraph {
                tail,
                head,
                node_count,
            });
        }
        if capacity.is_negative() {
            return Err(MaxFlowError::NegativeCapacity { tail, head });
        }

        self.matrix[[tail, head]] = capacity;
        Ok(())
    }

    pub fn as_array(&self) -> &Array2<T> {
        &self.matrix
    }

    pub fn into_inner(self) -> Array2<T> {
        self.matrix
    }
}

impl<T: Capacity> CapacityMatrix<T> for DenseCapacity<T> {
    fn capacity(&self, u: usize, v: usize) -> T {
        self.matrix.get((u, v)).copied().unwrap_or_else(T::zero)
    }

    fn dimension(&self) -> usize {
        self.matrix.nrows()
    }
}

impl<T: Capacity> TryFrom<Array2<T>> for DenseCapacity<T> {
    type Error = MaxFlowError;

    fn try_from(matrix: Array2<T>) -> Result<Self, Self::Error> {
        DenseCapacity::new(matrix)
    }
}
