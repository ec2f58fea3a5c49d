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

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::{EdgeRef, IntoEdgeReferences, NodeIndexable};

use super::capacity::{Capacity, CapacityMatrix};
use super::error::MaxFlowError;

/// Flow assignment keyed by the dense index pair `(u, v)`.
pub type FlowMap<T> = HashMap<(usize, usize), T>;

/// The residual network of a flow network.
///
/// It contains every edge of the input graph and, for each of them, the edge
/// in the opposite direction. Parallel input edges collapse into a single
/// arc, and a reverse edge already present in the input is kept as is.
/// Arcs that only exist for reverse flow bookkeeping carry no capacity of
/// their own.
#[derive(Debug, Clone)]
pub struct ResidualNetwork {
    graph: DiGraph<(), ()>,
    reverse: Vec<EdgeIndex>,
    original: FixedBitSet,
}

impl ResidualNetwork {
    /// Build the residual network over the vertices `0..node_count` from
    /// the directed edges `(tail, head)`.
    ///
    /// Fails with [`MaxFlowError::MalformedGraph`] on the first edge with an
    /// endpoint outside of `0..node_count`; nothing is returned in that case.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<Self, MaxFlowError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut graph = DiGraph::with_capacity(node_count, 0);
        for _ in 0..node_count {
            graph.add_node(());
        }

        let mut input_edges = Vec::new();
        for (tail, head) in edges {
            if tail >= node_count || head >= node_count {
                return Err(MaxFlowError::MalformedGraph {
                    tail,
                    head,
                    node_count,
                });
            }
            let (a, b) = (NodeIndex::new(tail), NodeIndex::new(head));
            input_edges.push(graph.update_edge(a, b, ()));
            graph.update_edge(b, a, ());
        }

        let mut original = FixedBitSet::with_capacity(graph.edge_count());
        for edge in input_edges {
            original.insert(edge.index());
        }

        // Every arc has its twin, a self-loop is its own.
        let reverse = graph
            .edge_references()
            .map(|e| graph.find_edge(e.target(), e.source()).unwrap_or(e.id()))
            .collect();

        Ok(ResidualNetwork {
            graph,
            reverse,
            original,
        })
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// The number of arcs, reverse arcs included.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_edge(&self, u: usize, v: usize) -> bool {
        u < self.node_count()
            && v < self.node_count()
            && self
                .graph
                .find_edge(NodeIndex::new(u), NodeIndex::new(v))
                .is_some()
    }

    /// Whether the arc `(u, v)` was an edge of the input graph.
    pub fn is_original(&self, u: usize, v: usize) -> bool {
        u < self.node_count()
            && v < self.node_count()
            && self
                .graph
                .find_edge(NodeIndex::new(u), NodeIndex::new(v))
                .is_some_and(|e| self.original.contains(e.index()))
    }

    /// All arcs as `(tail, head)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
    }

    /// The outgoing arcs of `u` as `(arc, head)` pairs. Self-loops are
    /// skipped since they can never carry flow from the source to the sink.
    pub fn out_arcs(&self, u: usize) -> impl Iterator<Item = (EdgeIndex, usize)> + '_ {
        self.graph
            .edges(NodeIndex::new(u))
            .map(|e| (e.id(), e.target().index()))
            .filter(move |&(_, v)| v != u)
    }

    /// Outgoing arcs of every vertex, for the strategies that keep a
    /// current-arc pointer into them.
    pub(crate) fn adjacency(&self) -> Vec<Vec<(EdgeIndex, usize)>> {
        (0..self.node_count())
            .map(|u| self.out_arcs(u).collect())
            .collect()
    }

    #[inline]
    pub fn reverse(&self, edge: EdgeIndex) -> EdgeIndex {
        self.reverse[edge.index()]
    }

    pub fn graph(&self) -> &DiGraph<(), ()> {
        &self.graph
    }

    /// The capacity of an arc: the matrix entry for input edges and zero for
    /// arcs that were added as reverse edges.
    pub fn arc_capacity<T, C>(&self, edge: EdgeIndex, capacities: &C) -> T
    where
        T: Capacity,
        C: CapacityMatrix<T> + ?Sized,
    {
        if !self.original.contains(edge.index()) {
            return T::zero();
        }
        match self.graph.edge_endpoints(edge) {
            Some((u, v)) => capacities.capacity(u.index(), v.index()),
            None => T::zero(),
        }
    }

    /// Check that `source` and `target` are distinct vertices of the network
    /// and that `capacities` covers exactly its vertices.
    pub(crate) fn validate<T, C>(
        &self,
        source: usize,
        target: usize,
        capacities: &C,
    ) -> Result<(), MaxFlowError>
    where
        C: CapacityMatrix<T> + ?Sized,
    {
        check_endpoints(source, target, self.node_count())?;
        if capacities.dimension() != self.node_count() {
            return Err(MaxFlowError::DimensionMismatch {
                expected: self.node_count(),
                found: capacities.dimension(),
            });
        }
        Ok(())
    }
}

pub(crate) fn check_endpoints(
    source: usize,
    target: usize,
    node_count: usize,
) -> Result<(), MaxFlowError> {
    if source == target || source >= node_count || target >= node_count {
        return Err(MaxFlowError::InvalidEndpoints {
            source_node: source,
            target_node: target,
            node_count,
        });
    }
    Ok(())
}

/// Build the residual network of `graph` without modifying it.
///
/// Vertices of the residual network are the indices `0..graph.node_bound()`.
pub fn build_residual_network<G>(graph: G) -> Result<ResidualNetwork, MaxFlowError>
where
    G: IntoEdgeReferences + NodeIndexable,
{
    ResidualNetwork::from_edges(
        graph.node_bound(),
        graph
            .edge_references()
            .map(|e| (graph.to_index(e.source()), graph.to_index(e.target()))),
    )
}

/// Capacity and net flow of every arc during a single run.
///
/// This is the only state a strategy mutates on the network; it is created
/// at the start of a run and turned into the flow assignment at the end.
/// The flow on an arc stays within `[-capacity(reverse), capacity(arc)]`, so
/// no update leaves the range of `T`.
#[derive(Debug, Clone)]
pub(crate) struct ResidualCapacities<T> {
    capacity: Vec<T>,
    flow: Vec<T>,
}

impl<T: Capacity> ResidualCapacities<T> {
    pub fn new<C>(network: &ResidualNetwork, capacities: &C) -> Self
    where
        C: CapacityMatrix<T> + ?Sized,
    {
        let capacity: Vec<T> = network
            .graph
            .edge_indices()
            .map(|e| network.arc_capacity(e, capacities))
            .collect();
        let flow = vec![T::zero(); capacity.len()];
        ResidualCapacities { capacity, flow }
    }

    /// Remaining capacity of `edge`.
    ///
    /// An arc whose twin carries flow may have more than `T::max_value()`
    /// left; the result saturates there.
    #[inline]
    pub fn get(&self, edge: EdgeIndex) -> T {
        let e = edge.index();
        self.capacity[e].saturating_sub(self.flow[e])
    }

    /// Send `amount` units along `edge`. `amount` must not exceed
    /// `get(edge)`.
    #[inline]
    pub fn augment(&mut self, network: &ResidualNetwork, edge: EdgeIndex, amount: T) {
        self.flow[edge.index()] += amount;
        self.flow[network.reverse(edge).index()] -= amount;
    }

    /// Net flow on every arc of the network.
    pub fn into_flow(self, network: &ResidualNetwork) -> FlowMap<T> {
        network
            .graph
            .edge_references()
            .map(|e| ((e.source().index(), e.target().index()), self.flow[e.id().index()]))
            .collect()
    }
}
