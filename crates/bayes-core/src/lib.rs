#![deny(missing_docs)]

//! Shared error taxonomy, deterministic randomness and provenance types for
//! approximate inference over discrete Bayesian networks.

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{BayesError, ErrorInfo};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};

/// Tolerance used when checking that a probability vector sums to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;
