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

use fixedbitset::FixedBitSet;
use petgraph::graph::EdgeIndex;

use super::capacity::{Capacity, CapacityMatrix};
use super::error::{checked_add, MaxFlowError};
use super::residual::{FlowMap, ResidualCapacities, ResidualNetwork};

/// Breadth-first search for a shortest augmenting path.
///
/// On success `pred[v]` holds the arc used to reach `v` together with its
/// tail, for every vertex on the path except the source.
fn find_augmenting_path<T: Capacity>(
    network: &ResidualNetwork,
    residual: &ResidualCapacities<T>,
    source: usize,
    target: usize,
    pred: &mut [Option<(EdgeIndex, usize)>],
) -> bool {
    pred.fill(None);
    let mut visited = FixedBitSet::with_capacity(network.node_count());
    visited.insert(source);
    let mut queue = VecDeque::from([source]);

    while let Some(u) = queue.pop_front() {
        for (edge, v) in network.out_arcs(u) {
            if visited.contains(v) || residual.get(edge) <= T::zero() {
                continue;
            }
            visited.insert(v);
            pred[v] = Some((edge, u));
            if v == target {
                return true;
            }
            queue.push_back(v);
        }
    }

    false
}

/// Compute a maximum flow with the Edmonds-Karp algorithm.
///
/// Augmenting paths are found by breadth-first search, so each of them is a
/// shortest path (by edge count) over the arcs with positive residual
/// capacity. The algorithm runs in `O(V E^2)`.
///
/// Arguments:
///
/// * `network` - The residual network, see
///     [`build_residual_network`](crate::flow::build_residual_network)
/// * `source` - Index of the source vertex
/// * `target` - Index of the sink vertex
/// * `capacities` - The capacity of every vertex pair
///
/// Returns the flow value and the net flow on every arc of `network`.
///
/// # Example
/// ```rust
/// use maxflow_core::flow::{edmonds_karp, DenseCapacity, ResidualNetwork};
///
/// let network = ResidualNetwork::from_edges(3, [(0, 1), (1, 2), (0, 2)]).unwrap();
/// let capacities = DenseCapacity::from_edges(3, [(0, 1, 10), (1, 2, 5), (0, 2, 3)]).unwrap();
/// let (value, flow) = edmonds_karp(&network, 0, 2, &capacities).unwrap();
///
/// assert_eq!(value, 8);
/// assert_eq!(flow[&(0, 1)], 5);
/// assert_eq!(flow[&(2, 1)], -5);
/// ```
pub fn edmonds_karp<T, C>(
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

    let mut residual = ResidualCapacities::new(network, capacities);
    let mut pred = vec![None; network.node_count()];
    let mut value = T::zero();
    let mut paths = 0usize;

    while find_augmenting_path(network, &residual, source, target, &mut pred) {
        let mut bottleneck = T::max_value();
        let mut v = target;
        while let Some((edge, u)) = pred[v] {
            bottleneck = bottleneck.min(residual.get(edge));
            v = u;
        }

        let mut v = target;
        while let Some((edge, u)) = pred[v] {
            residual.augment(network, edge, bottleneck);
            v = u;
        }

        value = checked_add(value, bottleneck)?;
        paths += 1;
        log::trace!("edmonds-karp: augmenting path {paths} carries {bottleneck:?}");
    }

    log::debug!("edmonds-karp: {paths} augmenting paths, flow value {value:?}");
    Ok((value, residual.into_flow(network)))
}
