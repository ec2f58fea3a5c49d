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

use thiserror::Error;

use super::capacity::Capacity;

/// Errors reported by the maximum flow routines.
///
/// Apart from `FlowOverflow` all of them are caused by invalid input and are
/// raised before any traversal of the network starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaxFlowError {
    /// The source equals the target, or one of them is not a vertex index
    /// of the network.
    #[error(
        "invalid endpoints: source {source_node} and target {target_node} must be distinct \
         vertices of a network with {node_count} nodes"
    )]
    InvalidEndpoints {
        source_node: usize,
        target_node: usize,
        node_count: usize,
    },
    /// A capacity matrix whose dimension disagrees with the vertex count.
    #[error("capacity matrix dimension {found} does not match the {expected} nodes of the network")]
    DimensionMismatch { expected: usize, found: usize },
    /// An edge references a vertex outside `0..node_count`.
    #[error("edge ({tail}, {head}) references a vertex outside of a network with {node_count} nodes")]
    MalformedGraph {
        tail: usize,
        head: usize,
        node_count: usize,
    },
    #[error("negative capacity on edge ({tail}, {head})")]
    NegativeCapacity { tail: usize, head: usize },
    #[error("unknown maximum flow algorithm \"{0}\"")]
    UnknownAlgorithm(String),
    /// The flow value, or the excess of some vertex, does not fit in the
    /// capacity type.
    #[error("flow value exceeds the range of the capacity type")]
    FlowOverflow,
}

/// `a + b`, or `FlowOverflow` when the sum leaves the range of `T`.
pub(crate) fn checked_add<T: Capacity>(a: T, b: T) -> Result<T, MaxFlowError> {
    a.checked_add(&b).ok_or(MaxFlowError::FlowOverflow)
}
