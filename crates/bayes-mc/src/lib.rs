#![deny(missing_docs)]

//! Monte-Carlo estimators of conditional probabilities over a discrete
//! [`Network`](bayes_net::Network).
//!
//! Three estimators share one prior sampler: rejection sampling, likelihood
//! weighting and Gibbs sampling. Every estimator takes an explicit random
//! source; [`run_all`] drives all three from a single [`RunConfig`] with
//! independent, reproducible substreams.

use bayes_core::BayesError;

/// YAML run configuration and defaults.
pub mod config;
/// Per-estimator seed derivation.
pub mod determinism;
/// `run_all` entry point running every estimator.
pub mod driver;
/// Gibbs sampling and pluggable per-variable resamplers.
pub mod gibbs;
/// Likelihood weighting.
pub mod likelihood;
/// Prior sampling in topological order.
pub mod prior;
/// Rejection sampling.
pub mod rejection;
/// Estimate reports and their JSON persistence.
pub mod report;

pub use config::{
    GibbsConfig, LikelihoodConfig, RejectionConfig, ResamplerKind, RunConfig, SeedPolicy,
};
pub use determinism::{estimator_rng, estimator_seed};
pub use driver::{run_all, EstimatorKind};
pub use gibbs::{
    gibbs_sampling, gibbs_sampling_detailed, gibbs_sampling_with, ChainOutcome, GibbsOptions,
    MarkovBlanket, ParentConditional, Resampler,
};
pub use likelihood::{
    evidence_factor, likelihood_weighting, likelihood_weighting_detailed,
    likelihood_weighting_with, weighted_sample, EvidenceMode, WeightedOutcome,
};
pub use prior::{draw_uniform, draw_variable, draw_weighted, prior_sample};
pub use rejection::{
    rejection_sampling, rejection_sampling_detailed, rejection_sampling_with,
    RejectionNormalization, RejectionOutcome,
};
pub use report::{EstimateReport, REPORT_SCHEMA};

pub(crate) fn ensure_samples(samples: usize) -> Result<(), BayesError> {
    if samples == 0 {
        return Err(BayesError::query("zero-samples", "sample count must be positive")
            .with_hint("request at least one sample"));
    }
    Ok(())
}
