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

use petgraph::graph::EdgeIndex;

use super::capacity::{Capacity, CapacityMatrix};
use super::error::{checked_add, MaxFlowError};
use super::residual::{FlowMap, ResidualCapacities, ResidualNetwork};

struct DinicState<'a, T> {
    network: &'a ResidualNetwork,
    residual: ResidualCapacities<T>,
    adjacency: Vec<Vec<(EdgeIndex, usize)>>,
    levels: Vec<Option<usize>>,
    current: Vec<usize>,
    source: usize,
    target: usize,
}

impl<'a, T: Capacity> DinicState<'a, T> {
    /// Label every vertex with its BFS distance from the source over arcs
    /// with positive residual capacity. Returns whether the target got a
    /// level.
    fn build_levels(&mut self) -> bool {
        self.levels.fill(None);
        self.levels[self.source] = Some(0);
        let mut queue = VecDeque::from([self.source]);

        while let Some(u) = queue.pop_front() {
            let next = self.levels[u].map(|l| l + 1);
            for &(edge, v) in &self.adjacency[u] {
                if self.levels[v].is_none() && self.residual.get(edge) > T::zero() {
                    self.levels[v] = next;
                    queue.push_back(v);
                }
            }
        }

        self.levels[self.target].is_some()
    }

    /// The first arc of `u` at or after its current-arc pointer that is in
    /// the level graph and not saturated. Arcs passed over are never looked
    /// at again during this phase.
    fn next_admissible(&mut self, u: usize) -> Option<(EdgeIndex, usize)> {
        let next = self.levels[u].map(|l| l + 1);
        while let Some(&(edge, v)) = self.adjacency[u].get(self.current[u]) {
            if self.levels[v] == next && self.residual.get(edge) > T::zero() {
                return Some((edge, v));
            }
            self.current[u] += 1;
        }
        None
    }

    /// Find one source-target path in the level graph and saturate its
    /// bottleneck. Returns zero once the flow of this phase is blocking.
    fn augment_path(&mut self) -> T {
        let mut path: Vec<(EdgeIndex, usize)> = Vec::new();
        let mut u = self.source;

        loop {
            if u == self.target {
                let bottleneck = path
                    .iter()
                    .map(|&(edge, _)| self.residual.get(edge))
                    .min()
                    .unwrap_or_else(T::zero);
                for &(edge, _) in &path {
                    self.residual.augment(self.network, edge, bottleneck);
                }
                return bottleneck;
            }

            match self.next_admissible(u) {
                Some((edge, v)) => {
                    path.push((edge, u));
                    u = v;
                }
                // Dead end: retreat and skip the arc that led here.
                None => match path.pop() {
                    Some((_, tail)) => {
                        self.current[tail] += 1;
                        u = tail;
                    }
                    None => return T::zero(),
                },
            }
        }
    }
}

/// Compute a maximum flow with Dinic's algorithm.
///
/// Every phase builds the level graph of the residual network with a
/// breadth-first search from the source and then saturates it with a
/// blocking flow, found by repeated depth-first searches that never revisit
/// an exhausted arc within the phase. There are at most `V` phases, so the
/// algorithm runs in `O(V^2 E)`.
///
/// Arguments:
///
/// * `network` - The residual network, see
///     [`build_residual_network`](crate::flow::build_residual_network)
/// * `source` - Index of the source vertex
/// * `target` - Index of the sink vertex
/// * `capacities` - The capacity of every vertex pair
///
/// # Example
/// ```rust
/// use maxflow_core::flow::{dinic, DenseCapacity, ResidualNetwork};
///
/// let network = ResidualNetwork::from_edges(4, [(0, 1), (0, 2), (1, 3), (2, 3), (1, 2)]).unwrap();
/// let capacities =
///     DenseCapacity::from_edges(4, [(0, 1, 3), (0, 2, 2), (1, 3, 2), (2, 3, 3), (1, 2, 1)]).unwrap();
/// let (value, _) = dinic(&network, 0, 3, &capacities).unwrap();
///
/// assert_eq!(value, 5);
/// ```
pub fn dinic<T, C>(
    network: &ResidualNetwork,
    source: usize,
    target: usize,
    capacities: &C,
) -> Result<(T, FlowMap<T>), MaxFlowError>
where
    T: Capacity,
    C: CapacityMatrix<T> + ?Sized,
{
    network.validate(source, target, capacities)?;

    let node_count = network.node_count();
    let mut state = DinicState {
        network,
        residual: ResidualCapacities::new(network, capacities),
        adjacency: network.adjacency(),
        levels: vec![None; node_count],
        current: vec![0; node_count],
        source,
        target,
    };

    let mut value = T::zero();
    let mut phases = 0usize;
    while state.build_levels() {
        state.current.fill(0);
        let mut phase_flow = T::zero();
        loop {
            let pushed = state.augment_path();
            if pushed <= T::zero() {
                break;
            }
            phase_flow = checked_add(phase_flow, pushed)?;
        }

        value = checked_add(value, phase_flow)?;
        phases += 1;
        log::trace!("dinic: phase {phases} blocking flow {phase_flow:?}");
    }

    log::debug!("dinic: {phases} phases, flow value {value:?}");
    Ok((value, state.residual.into_flow(network)))
}
