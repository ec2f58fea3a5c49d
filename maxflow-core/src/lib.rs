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

//! # maxflow-core
//!
//! Maximum flow algorithms for directed capacitated networks built on top of
//! [`petgraph`]. Three strategies are available: Edmonds-Karp, Dinic and
//! push-relabel, all of them sharing the same residual network construction
//! and returning the flow value together with a per-edge flow assignment.
//!
//! ```rust
//! use maxflow_core::flow::{maximum_flow, DenseCapacity, MaxFlowAlgorithm, MaxFlowConfig};
//! use maxflow_core::petgraph::graph::{DiGraph, NodeIndex};
//!
//! let graph = DiGraph::<(), ()>::from_edges([(0, 1), (1, 2), (0, 2)]);
//! let capacities = DenseCapacity::from_edges(3, [(0, 1, 10), (1, 2, 5), (0, 2, 3)]).unwrap();
//! let config = MaxFlowConfig::default()
//!     .with_capacities(&capacities)
//!     .with_algorithm(MaxFlowAlgorithm::Dinic);
//!
//! let result = maximum_flow(&graph, NodeIndex::new(0), NodeIndex::new(2), config).unwrap();
//! assert_eq!(result.value, 8);
//! ```

pub mod flow;

// Re-export the graph and array crates so callers use the same versions.
pub use ndarray;
pub use petgraph;
