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

use petgraph::graph::EdgeIndex;
use priority_queue::PriorityQueue;

use super::capacity::{Capacity, CapacityMatrix};
use super::error::{checked_add, MaxFlowError};
use super::residual::{FlowMap, ResidualCapacities, ResidualNetwork};

struct PreflowPushState<'a, T> {
    network: &'a ResidualNetwork,
    s: usize,
    t: usize,
    residual: ResidualCapacities<T>,
    adjacency: Vec<Vec<(EdgeIndex, usize)>>,
    current: Vec<usize>,
    excess: Vec<T>,
    heights: Vec<usize>,
    // Active vertices keyed by their height, highest first.
    active: PriorityQueue<usize, usize>,
    pushes: usize,
    relabels: usize,
}

impl<'a, T: Capacity> PreflowPushState<'a, T> {
    // The excess of the source is never read, so it is not tracked.
    fn push(&mut self, edge: EdgeIndex, u: usize, v: usize, amount: T) -> Result<(), MaxFlowError> {
        if v != self.s {
            self.excess[v] = checked_add(self.excess[v], amount)?;
        }
        self.residual.augment(self.network, edge, amount);
        if u != self.s {
            self.excess[u] -= amount;
        }
        self.pushes += 1;
        self.activate(v);
        Ok(())
    }

    fn activate(&mut self, v: usize) {
        if v != self.s && v != self.t && self.excess[v] > T::zero() {
            self.active.push(v, self.heights[v]);
        }
    }

    /// Lift `u` one above its lowest neighbour over a residual arc. Returns
    /// false if `u` has no residual arc at all.
    fn relabel(&mut self, u: usize) -> bool {
        let lowest = self.adjacency[u]
            .iter()
            .filter(|&&(edge, _)| self.residual.get(edge) > T::zero())
            .map(|&(_, v)| self.heights[v])
            .min();

        match lowest {
            Some(height) => {
                self.heights[u] = height + 1;
                self.relabels += 1;
                true
            }
            None => false,
        }
    }

    /// Push the excess of `u` along admissible arcs, relabelling whenever
    /// the arcs of `u` are exhausted, until `u` is inactive.
    fn discharge(&mut self, u: usize) -> Result<(), MaxFlowError> {
        while self.excess[u] > T::zero() {
            let arc = self.adjacency[u].get(self.current[u]).copied();
            let Some((edge, v)) = arc else {
                if !self.relabel(u) {
                    log::warn!("push-relabel: vertex {u} holds excess without residual arcs");
                    return Ok(());
                }
                self.current[u] = 0;
                continue;
            };

            let residual = self.residual.get(edge);
            if residual > T::zero() && self.heights[u] == self.heights[v] + 1 {
                let amount = self.excess[u].min(residual);
                self.push(edge, u, v, amount)?;
            } else {
                self.current[u] += 1;
            }
        }
        Ok(())
    }
}

/// Compute a maximum flow with the Goldberg-Tarjan push-relabel algorithm.
///
/// The source starts at height `V` and saturates all of its outgoing arcs.
/// Then, as long as some vertex other than the source and the sink holds
/// excess flow, the active vertex with the highest label is discharged:
/// its excess is pushed along admissible arcs (positive residual capacity,
/// leading exactly one level down) and the vertex is relabelled whenever
/// none is left. The flow value is the excess that reached the sink. The
/// algorithm runs in `O(V^3)`.
///
/// Returns [`MaxFlowError::FlowOverflow`] when the excess collected by a
/// vertex does not fit in `T`.
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
/// use maxflow_core::flow::{preflow_push, DenseCapacity, ResidualNetwork};
///
/// let network = ResidualNetwork::from_edges(3, [(0, 1), (1, 2), (0, 2)]).unwrap();
/// let capacities = DenseCapacity::from_edges(3, [(0, 1, 10), (1, 2, 5), (0, 2, 3)]).unwrap();
/// let (value, flow) = preflow_push(&network, 0, 2, &capacities).unwrap();
///
/// assert_eq!(value, 8);
/// assert_eq!(flow[&(0, 2)], 3);
/// ```
pub fn preflow_push<T, C>(
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

    let num_nodes = network.node_count();
    let mut state = PreflowPushState {
        network,
        s: source,
        t: target,
        residual: ResidualCapacities::new(network, capacities),
        adjacency: network.adjacency(),
        current: vec![0; num_nodes],
        excess: vec![T::zero(); num_nodes],
        heights: vec![0; num_nodes],
        active: PriorityQueue::new(),
        pushes: 0,
        relabels: 0,
    };

    // Initialize the preflow by saturating every arc leaving the source.
    state.heights[source] = num_nodes;
    for i in 0..state.adjacency[source].len() {
        let (edge, v) = state.adjacency[source][i];
        let capacity = state.residual.get(edge);
        if capacity > T::zero() {
            state.push(edge, source, v, capacity)?;
        }
    }

    while let Some((u, _)) = state.active.pop() {
        state.discharge(u)?;
    }

    let value = state.excess[target];
    log::debug!(
        "push-relabel: {} pushes, {} relabels, flow value {value:?}",
        state.pushes,
        state.relabels
    );
    Ok((value, state.residual.into_flow(network)))
}
