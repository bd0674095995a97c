#![deny(missing_docs)]

//! Discrete Bayesian network model: variables with ordered domains, parent
//! relationships and validated conditional probability tables.
//!
//! A [`Network`] is immutable once built. Construction rejects malformed input
//! eagerly (cycles, unknown parents, rows of the wrong length or not summing to
//! one, missing parent combinations) and computes a topological order that all
//! samplers iterate.

mod assignment;
mod builder;
mod cpt;
mod hash;
mod ids;
mod network;
mod serialization;

pub use assignment::{Assignment, Binding, Evidence, Query, ResolvedEvidence, Sample};
pub use builder::{
    build_network, build_network_with, BuildOptions, CptMap, NetworkBuilder, ParentMap,
    VariableDomains,
};
pub use cpt::{Cpt, ParentCombinations, ParentKey};
pub use hash::canonical_hash;
pub use ids::VariableId;
pub use network::Network;
pub use serialization::{CptRowSpec, NetworkSpec, VariableSpec, NETWORK_SCHEMA};
