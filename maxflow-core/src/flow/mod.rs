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

//! Maximum flow algorithms.
//!
//! [`maximum_flow`] is the entry point: it builds the residual network of the
//! input graph and runs one of [`edmonds_karp`], [`dinic`] or
//! [`preflow_push`] on it. The strategies can also be called directly on a
//! [`ResidualNetwork`].

mod capacity;
mod dinic;
mod edmonds_karp;
mod error;
mod maximum_flow;
mod preflow_push;
mod residual;

pub use capacity::{Capacity, CapacityMatrix, DenseCapacity, StructuralCapacity};
pub use dinic::dinic;
pub use edmonds_karp::edmonds_karp;
pub use error::MaxFlowError;
pub use maximum_flow::{
    maximum_flow, minimum_cut, MaxFlowAlgorithm, MaxFlowConfig, MaxFlowReturn, MinCutReturn,
};
pub use preflow_push::preflow_push;
pub use residual::{build_residual_network, FlowMap, ResidualNetwork};
