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

use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use petgraph::visit::{
    EdgeRef, IntoEdgeReferences, IntoEdges, IntoNodeIdentifiers, NodeIndexable,
};

use super::capacity::{Capacity, CapacityMatrix, StructuralCapacity};
use super::dinic::dinic;
use super::edmonds_karp::edmonds_karp;
use super::error::MaxFlowError;
use super::preflow_push::preflow_push;
use super::residual::{build_residual_network, check_endpoints, FlowMap, ResidualNetwork};

/// The strategy used to compute a maximum flow.
///
/// All of them return the same flow value; the flow assignment may differ
/// when several maximum flows exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum MaxFlowAlgorithm {
    /// Shortest augmenting paths, `O(V E^2)`.
    EdmondsKarp,
    /// Blocking flows on level graphs, `O(V^2 E)`.
    Dinic,
    /// Highest-label push-relabel, `O(V^3)`.
    #[default]
    PushRelabel,
}

impl MaxFlowAlgorithm {
    pub const ALL: [MaxFlowAlgorithm; 3] = [
        MaxFlowAlgorithm::EdmondsKarp,
        MaxFlowAlgorithm::Dinic,
        MaxFlowAlgorithm::PushRelabel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MaxFlowAlgorithm::EdmondsKarp => "edmonds-karp",
            MaxFlowAlgorithm::Dinic => "dinic",
            MaxFlowAlgorithm::PushRelabel => "push-relabel",
        }
    }

    /// Run the strategy on an already built residual network.
    pub fn run<T, C>(
        &self,
        network: &ResidualNetwork,
        source: usize,
        target: usize,
        capacities: &C,
    ) -> Result<(T, FlowMap<T>), MaxFlowError>
    where
        T: Capacity,
        C: CapacityMatrix<T> + ?Sized,
    {
        match self {
            MaxFlowAlgorithm::EdmondsKarp => edmonds_karp(network, source, target, capacities),
            MaxFlowAlgorithm::Dinic => dinic(network, source, target, capacities),
            MaxFlowAlgorithm::PushRelabel => preflow_push(network, source, target, capacities),
        }
    }
}

impl fmt::Display for MaxFlowAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MaxFlowAlgorithm {
    type Err = MaxFlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "edmonds-karp" => Ok(MaxFlowAlgorithm::EdmondsKarp),
            "dinic" => Ok(MaxFlowAlgorithm::Dinic),
            "push-relabel" | "preflow-push" => Ok(MaxFlowAlgorithm::PushRelabel),
            _ => Err(MaxFlowError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Options of [`maximum_flow`] and [`minimum_cut`].
///
/// * `capacity_matrix` - Explicit capacities. `None` (the default) gives
///     every edge of the graph a capacity of one.
/// * `algorithm` - The strategy, push-relabel by default.
///
/// The configuration only borrows its capacity matrix, so one value can be
/// shared by concurrent solves.
pub struct MaxFlowConfig<'a, T> {
    pub capacity_matrix: Option<&'a (dyn CapacityMatrix<T> + Sync)>,
    pub algorithm: MaxFlowAlgorithm,
}

impl<'a, T> MaxFlowConfig<'a, T> {
    pub fn with_capacities(mut self, capacities: &'a (dyn CapacityMatrix<T> + Sync)) -> Self {
        self.capacity_matrix = Some(capacities);
        self
    }

    pub fn with_algorithm(mut self, algorithm: MaxFlowAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

impl<T> Default for MaxFlowConfig<'_, T> {
    fn default() -> Self {
        MaxFlowConfig {
            capacity_matrix: None,
            algorithm: MaxFlowAlgorithm::default(),
        }
    }
}

impl<T> Clone for MaxFlowConfig<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MaxFlowConfig<'_, T> {}

impl<T> fmt::Debug for MaxFlowConfig<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaxFlowConfig")
            .field(
                "capacity_matrix",
                &self.capacity_matrix.map(|c| c.dimension()),
            )
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// The return type of [`maximum_flow`].
///
/// * `value` - the maximum flow value
/// * `flow_edges` - the net flow of every pair of the residual network, so
///     `flow_edges[&(u, v)] == -flow_edges[&(v, u)]`
#[derive(Debug, Clone)]
pub struct MaxFlowReturn<N, T> {
    pub value: T,
    pub flow_edges: HashMap<(N, N), T>,
}

impl<N: Eq + Hash, T: Capacity> MaxFlowReturn<N, T> {
    /// The flow from `u` to `v`, zero for pairs outside the residual network.
    pub fn flow(&self, u: N, v: N) -> T {
        self.flow_edges.get(&(u, v)).copied().unwrap_or_else(T::zero)
    }
}

/// The return type of [`minimum_cut`].
///
/// * `value` - the total capacity of the cut, equal to the maximum flow value
/// * `source_side` - vertices reachable from the source in the final
///     residual network
/// * `sink_side` - all other vertices
/// * `cut_edges` - edges with positive capacity leading from the source side
///     to the sink side
#[derive(Debug, Clone)]
pub struct MinCutReturn<N, T> {
    pub value: T,
    pub source_side: Vec<N>,
    pub sink_side: Vec<N>,
    pub cut_edges: Vec<(N, N)>,
}

/// Validate the input, build the residual network, run the configured
/// strategy and hand everything to `finish`.
fn solve<G, T, R, F>(
    graph: G,
    source: G::NodeId,
    target: G::NodeId,
    config: MaxFlowConfig<'_, T>,
    finish: F,
) -> Result<R, MaxFlowError>
where
    G: IntoEdgeReferences + IntoEdges + NodeIndexable,
    T: Capacity,
    F: FnOnce(&ResidualNetwork, &dyn CapacityMatrix<T>, usize, T, FlowMap<T>) -> R,
{
    let node_count = graph.node_bound();
    let s = graph.to_index(source);
    let t = graph.to_index(target);
    check_endpoints(s, t, node_count)?;

    let structural;
    let capacities: &dyn CapacityMatrix<T> = match config.capacity_matrix {
        Some(capacities) => capacities,
        None => {
            structural = StructuralCapacity::new(graph);
            &structural
        }
    };
    if capacities.dimension() != node_count {
        return Err(MaxFlowError::DimensionMismatch {
            expected: node_count,
            found: capacities.dimension(),
        });
    }

    log::debug!(
        "maximum flow from {s} to {t} over {node_count} nodes using {}",
        config.algorithm
    );
    let network = build_residual_network(graph)?;
    let (value, flow) = config.algorithm.run(&network, s, t, capacities)?;

    Ok(finish(&network, capacities, s, value, flow))
}

/// Compute a maximum flow from `source` to `target`.
///
/// ``graph`` is treated as a digraph: for an undirected graph every edge is
/// only usable in the direction it is reported by `edge_references()` plus
/// its residual reverse. The residual network is built from a copy, the
/// graph itself is never modified.
///
/// Arguments:
///
/// * `graph` - The input graph object to run the algorithm on
/// * `source` - The node flow leaves from
/// * `target` - The node flow arrives at
/// * `config` - The capacities and the strategy, see [`MaxFlowConfig`]
///
/// Fails with [`MaxFlowError::InvalidEndpoints`] if `source == target` or
/// either is out of range and with [`MaxFlowError::DimensionMismatch`] if the
/// capacity matrix does not cover exactly the nodes of `graph`. A target that
/// can't be reached is not an error; the flow is zero everywhere.
///
/// # Example
/// ```rust
/// use maxflow_core::flow::{maximum_flow, MaxFlowConfig};
/// use maxflow_core::petgraph::graph::{DiGraph, NodeIndex};
///
/// // Without explicit capacities every edge carries one unit.
/// let graph = DiGraph::<(), ()>::from_edges([(0, 1), (1, 3), (0, 2), (2, 3)]);
/// let result = maximum_flow(&graph, NodeIndex::new(0), NodeIndex::new(3), MaxFlowConfig::<i64>::default())
///     .unwrap();
///
/// assert_eq!(result.value, 2);
/// assert_eq!(result.flow(NodeIndex::new(1), NodeIndex::new(3)), 1);
/// ```
pub fn maximum_flow<G, T>(
    graph: G,
    source: G::NodeId,
    target: G::NodeId,
    config: MaxFlowConfig<'_, T>,
) -> Result<MaxFlowReturn<G::NodeId, T>, MaxFlowError>
where
    G: IntoEdgeReferences + IntoEdges + NodeIndexable,
    G::NodeId: Eq + Hash,
    T: Capacity,
{
    solve(graph, source, target, config, |_, _, _, value, flow| {
        let flow_edges = flow
            .into_iter()
            .map(|((u, v), f)| ((graph.from_index(u), graph.from_index(v)), f))
            .collect();
        MaxFlowReturn { value, flow_edges }
    })
}

/// Compute a minimum `source`-`target` cut.
///
/// A maximum flow is computed first with [`maximum_flow`]'s rules; the
/// source side of the cut are the nodes still reachable from the source over
/// arcs with positive residual capacity. By the max-flow min-cut theorem the
/// capacity of the cut equals the flow value.
///
/// # Example
/// ```rust
/// use maxflow_core::flow::{minimum_cut, DenseCapacity, MaxFlowConfig};
/// use maxflow_core::petgraph::graph::{DiGraph, NodeIndex};
///
/// let graph = DiGraph::<(), ()>::from_edges([(0, 1), (1, 2), (0, 2)]);
/// let capacities = DenseCapacity::from_edges(3, [(0, 1, 10), (1, 2, 5), (0, 2, 3)]).unwrap();
/// let cut = minimum_cut(
///     &graph,
///     NodeIndex::new(0),
///     NodeIndex::new(2),
///     MaxFlowConfig::default().with_capacities(&capacities),
/// )
/// .unwrap();
///
/// assert_eq!(cut.value, 8);
/// assert_eq!(cut.sink_side, vec![NodeIndex::new(2)]);
/// ```
pub fn minimum_cut<G, T>(
    graph: G,
    source: G::NodeId,
    target: G::NodeId,
    config: MaxFlowConfig<'_, T>,
) -> Result<MinCutReturn<G::NodeId, T>, MaxFlowError>
where
    G: IntoEdgeReferences + IntoEdges + IntoNodeIdentifiers + NodeIndexable,
    T: Capacity,
{
    solve(graph, source, target, config, |network, capacities, s, value, flow| {
        let mut reachable = FixedBitSet::with_capacity(network.node_count());
        reachable.insert(s);
        let mut queue = VecDeque::from([s]);
        while let Some(u) = queue.pop_front() {
            for (edge, v) in network.out_arcs(u) {
                if reachable.contains(v) {
                    continue;
                }
                let capacity: T = network.arc_capacity(edge, capacities);
                let flow = flow.get(&(u, v)).copied().unwrap_or_else(T::zero);
                if capacity.saturating_sub(flow) > T::zero() {
                    reachable.insert(v);
                    queue.push_back(v);
                }
            }
        }

        let mut cut_value = T::zero();
        let mut cut_edges = Vec::new();
        for e in network.graph().edge_references() {
            let (u, v) = (e.source().index(), e.target().index());
            let capacity: T = network.arc_capacity(e.id(), capacities);
            if reachable.contains(u) && !reachable.contains(v) && capacity > T::zero() {
                cut_value += capacity;
                cut_edges.push((graph.from_index(u), graph.from_index(v)));
            }
        }
        debug_assert!(cut_value == value);

        let (source_side, sink_side) = graph
            .node_identifiers()
            .partition(|&n| reachable.contains(graph.to_index(n)));
        MinCutReturn {
            value: cut_value,
            source_side,
            sink_side,
            cut_edges,
        }
    })
}

#[cfg(test)]
mod tests {
    use crate::flow::{
        maximum_flow, minimum_cut, DenseCapacity, MaxFlowAlgorithm, MaxFlowConfig, MaxFlowError,
    };
    use petgraph::graph::{DiGraph, NodeIndex};
    use petgraph::stable_graph::StableDiGraph;

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("dinic".parse::<MaxFlowAlgorithm>(), Ok(MaxFlowAlgorithm::Dinic));
        assert_eq!("Edmonds_Karp".parse::<MaxFlowAlgorithm>(), Ok(MaxFlowAlgorithm::EdmondsKarp));
        assert_eq!("push-relabel".parse::<MaxFlowAlgorithm>(), Ok(MaxFlowAlgorithm::PushRelabel));
        assert_eq!(
            "simplex".parse::<MaxFlowAlgorithm>(),
            Err(MaxFlowError::UnknownAlgorithm("simplex".to_string()))
        );
        for algorithm in MaxFlowAlgorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<MaxFlowAlgorithm>(), Ok(algorithm));
        }
    }

    #[test]
    fn test_default_config() {
        let config = MaxFlowConfig::<i32>::default();
        assert!(config.capacity_matrix.is_none());
        assert_eq!(config.algorithm, MaxFlowAlgorithm::PushRelabel);
    }

    #[test]
    fn test_source_equals_target() {
        let graph = DiGraph::<(), ()>::from_edges([(0, 1)]);
        let res = maximum_flow(
            &graph,
            NodeIndex::new(1),
            NodeIndex::new(1),
            MaxFlowConfig::<i32>::default(),
        );
        assert_eq!(
            res.unwrap_err(),
            MaxFlowError::InvalidEndpoints {
                source_node: 1,
                target_node: 1,
                node_count: 2
            }
        );
    }

    #[test]
    fn test_target_out_of_range() {
        let graph = DiGraph::<(), ()>::from_edges([(0, 1)]);
        let res = maximum_flow(
            &graph,
            NodeIndex::new(0),
            NodeIndex::new(4),
            MaxFlowConfig::<i32>::default(),
        );
        assert!(matches!(res, Err(MaxFlowError::InvalidEndpoints { .. })));
    }

    #[test]
    fn test_capacity_dimension_mismatch() {
        let graph = DiGraph::<(), ()>::from_edges([(0, 1)]);
        let capacities = DenseCapacity::from_edges(3, [(0, 1, 2)]).unwrap();
        let res = maximum_flow(
            &graph,
            NodeIndex::new(0),
            NodeIndex::new(1),
            MaxFlowConfig::default().with_capacities(&capacities),
        );
        assert_eq!(
            res.unwrap_err(),
            MaxFlowError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_flow_keyed_by_node_id() {
        let mut graph = StableDiGraph::<&str, ()>::new();
        let s = graph.add_node("s");
        let gone = graph.add_node("gone");
        let a = graph.add_node("a");
        let t = graph.add_node("t");
        graph.add_edge(s, a, ());
        graph.add_edge(a, t, ());
        graph.add_edge(s, gone, ());
        graph.remove_node(gone);

        let result = maximum_flow(&graph, s, t, MaxFlowConfig::<i32>::default()).unwrap();
        assert_eq!(result.value, 1);
        assert_eq!(result.flow(s, a), 1);
        assert_eq!(result.flow(t, a), -1);
        assert_eq!(result.flow(s, t), 0);
        assert_eq!(result.flow_edges.len(), 4);
    }

    #[test]
    fn test_minimum_cut_partitions() {
        let graph = DiGraph::<(), ()>::from_edges([(0, 1), (0, 2), (1, 3), (2, 3), (1, 2)]);
        let capacities =
            DenseCapacity::from_edges(4, [(0, 1, 3), (0, 2, 2), (1, 3, 2), (2, 3, 3), (1, 2, 1)])
                .unwrap();
        for algorithm in MaxFlowAlgorithm::ALL {
            let config = MaxFlowConfig::default()
                .with_capacities(&capacities)
                .with_algorithm(algorithm);
            let cut = minimum_cut(&graph, NodeIndex::new(0), NodeIndex::new(3), config).unwrap();

            assert_eq!(cut.value, 5);
            assert!(cut.source_side.contains(&NodeIndex::new(0)));
            assert!(cut.sink_side.contains(&NodeIndex::new(3)));
            assert_eq!(cut.source_side.len() + cut.sink_side.len(), 4);
        }
    }
}
