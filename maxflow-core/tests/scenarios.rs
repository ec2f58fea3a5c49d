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

use maxflow_core::flow::{
    maximum_flow, minimum_cut, CapacityMatrix, DenseCapacity, MaxFlowAlgorithm, MaxFlowConfig,
    MaxFlowError, MaxFlowReturn,
};
use maxflow_core::petgraph::graph::{DiGraph, NodeIndex};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn solve_all(
    graph: &DiGraph<(), ()>,
    source: usize,
    target: usize,
    capacities: Option<&DenseCapacity<i64>>,
) -> Vec<MaxFlowReturn<NodeIndex, i64>> {
    MaxFlowAlgorithm::ALL
        .iter()
        .map(|&algorithm| {
            let mut config = MaxFlowConfig::default().with_algorithm(algorithm);
            if let Some(capacities) = capacities {
                config = config.with_capacities(capacities);
            }
            maximum_flow(graph, NodeIndex::new(source), NodeIndex::new(target), config).unwrap()
        })
        .collect()
}

fn n(i: usize) -> NodeIndex {
    NodeIndex::new(i)
}

#[test]
fn test_scenario_a() {
    init_logger();
    let graph = DiGraph::<(), ()>::from_edges([(0, 1), (1, 2), (0, 2)]);
    let capacities = DenseCapacity::from_edges(3, [(0, 1, 10), (1, 2, 5), (0, 2, 3)]).unwrap();

    for result in solve_all(&graph, 0, 2, Some(&capacities)) {
        assert_eq!(result.value, 8);
        assert_eq!(result.flow(n(0), n(1)), 5);
        assert_eq!(result.flow(n(1), n(2)), 5);
        assert_eq!(result.flow(n(0), n(2)), 3);
    }
}

#[test]
fn test_scenario_b() {
    init_logger();
    let graph = DiGraph::<(), ()>::from_edges([(0, 1), (0, 2), (1, 3), (2, 3), (1, 2)]);
    let capacities =
        DenseCapacity::from_edges(4, [(0, 1, 3), (0, 2, 2), (1, 3, 2), (2, 3, 3), (1, 2, 1)])
            .unwrap();

    for result in solve_all(&graph, 0, 3, Some(&capacities)) {
        assert_eq!(result.value, 5);
        assert_eq!(result.flow(n(1), n(2)), 1);
    }
}

#[test]
fn test_scenario_c() {
    init_logger();
    let mut graph = DiGraph::<(), ()>::new();
    graph.add_node(());
    graph.add_node(());

    for result in solve_all(&graph, 0, 1, None) {
        assert_eq!(result.value, 0);
        assert!(result.flow_edges.values().all(|&f| f == 0));
    }

    let capacities = DenseCapacity::zeros(2);
    for result in solve_all(&graph, 0, 1, Some(&capacities)) {
        assert_eq!(result.value, 0);
        assert!(result.flow_edges.is_empty());
    }
}

#[test]
fn test_scenario_d() {
    init_logger();
    let graph = DiGraph::<(), ()>::from_edges([(0, 1), (1, 2)]);

    for result in solve_all(&graph, 0, 2, None) {
        assert_eq!(result.value, 1);
        assert_eq!(result.flow(n(0), n(1)), 1);
        assert_eq!(result.flow(n(1), n(2)), 1);
        assert_eq!(result.flow(n(2), n(1)), -1);
    }
}

#[test]
fn test_default_algorithm_is_push_relabel() {
    let graph = DiGraph::<(), ()>::from_edges([(0, 1), (1, 2)]);
    let default = maximum_flow(&graph, n(0), n(2), MaxFlowConfig::<i32>::default()).unwrap();
    let explicit = maximum_flow(
        &graph,
        n(0),
        n(2),
        MaxFlowConfig::default().with_algorithm(MaxFlowAlgorithm::PushRelabel),
    )
    .unwrap();

    assert_eq!(default.value, explicit.value);
    assert_eq!(default.flow_edges, explicit.flow_edges);
}

#[test]
fn test_resolving_gives_same_value() {
    let graph = DiGraph::<(), ()>::from_edges([(0, 1), (0, 2), (1, 3), (2, 3), (1, 2), (2, 1)]);
    let capacities = DenseCapacity::from_edges(
        4,
        [(0, 1, 4), (0, 2, 6), (1, 3, 5), (2, 3, 2), (1, 2, 3), (2, 1, 3)],
    )
    .unwrap();

    let first = solve_all(&graph, 0, 3, Some(&capacities));
    let second = solve_all(&graph, 0, 3, Some(&capacities));
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.value, 7);
        assert_eq!(a.value, b.value);
    }
    assert_eq!(graph.edge_count(), 6);
}

#[test]
fn test_self_loop_carries_no_flow() {
    let graph = DiGraph::<(), ()>::from_edges([(0, 1), (1, 1), (1, 2)]);
    let capacities = DenseCapacity::from_edges(3, [(0, 1, 4), (1, 1, 9), (1, 2, 3)]).unwrap();

    for result in solve_all(&graph, 0, 2, Some(&capacities)) {
        assert_eq!(result.value, 3);
        assert_eq!(result.flow(n(1), n(1)), 0);
    }
}

#[test]
fn test_flow_only_on_residual_pairs() {
    let graph = DiGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3)]);
    let capacities = DenseCapacity::from_edges(4, [(0, 1, 2), (1, 2, 2), (2, 3, 2)]).unwrap();

    for result in solve_all(&graph, 0, 3, Some(&capacities)) {
        let mut pairs: Vec<(usize, usize)> = result
            .flow_edges
            .keys()
            .map(|(u, v)| (u.index(), v.index()))
            .collect();
        pairs.sort();
        assert_eq!(pairs, vec![(0, 1), (1, 0), (1, 2), (2, 1), (2, 3), (3, 2)]);
    }
}

#[test]
fn test_unreachable_sink_cut() {
    let graph = DiGraph::<(), ()>::from_edges([(0, 1), (2, 1)]);
    let cut = minimum_cut(&graph, n(0), n(2), MaxFlowConfig::<i64>::default()).unwrap();

    assert_eq!(cut.value, 0);
    assert!(cut.cut_edges.is_empty());
    assert_eq!(cut.source_side, vec![n(0), n(1)]);
    assert_eq!(cut.sink_side, vec![n(2)]);
}

#[test]
fn test_structural_capacity_dimension() {
    let graph = DiGraph::<(), ()>::from_edges([(0, 1), (1, 4)]);
    let structural = maxflow_core::flow::StructuralCapacity::new(&graph);

    assert_eq!(CapacityMatrix::<i64>::dimension(&structural), 5);
    let result = maximum_flow(&graph, n(0), n(4), MaxFlowConfig::<i64>::default()).unwrap();
    assert_eq!(result.value, 1);
}

#[test]
fn test_antiparallel_edges_at_type_limit() {
    init_logger();
    let graph = DiGraph::<(), ()>::from_edges([(0, 1), (1, 0)]);
    let capacities = DenseCapacity::from_edges(2, [(0, 1, i32::MAX), (1, 0, i32::MAX)]).unwrap();

    for algorithm in MaxFlowAlgorithm::ALL {
        let config = MaxFlowConfig::default()
            .with_capacities(&capacities)
            .with_algorithm(algorithm);
        let result = maximum_flow(&graph, n(0), n(1), config).unwrap();
        assert_eq!(result.value, i32::MAX, "{algorithm}");
        assert_eq!(result.flow(n(0), n(1)), i32::MAX, "{algorithm}");
        assert_eq!(result.flow(n(1), n(0)), -i32::MAX, "{algorithm}");

        let cut = minimum_cut(&graph, n(0), n(1), config).unwrap();
        assert_eq!(cut.value, i32::MAX, "{algorithm}");
        assert_eq!(cut.cut_edges, vec![(n(0), n(1))], "{algorithm}");
    }
}

#[test]
fn test_flow_value_out_of_range() {
    let graph = DiGraph::<(), ()>::from_edges([(0, 1), (0, 2), (1, 3), (2, 3)]);
    let capacities = DenseCapacity::from_edges(
        4,
        [(0, 1, i32::MAX), (0, 2, i32::MAX), (1, 3, i32::MAX), (2, 3, i32::MAX)],
    )
    .unwrap();

    for algorithm in MaxFlowAlgorithm::ALL {
        let config = MaxFlowConfig::default()
            .with_capacities(&capacities)
            .with_algorithm(algorithm);
        let result = maximum_flow(&graph, n(0), n(3), config);
        assert_eq!(result.unwrap_err(), MaxFlowError::FlowOverflow, "{algorithm}");
    }
}
