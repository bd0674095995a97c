use bayes_core::BayesError;
use bayes_net::{Evidence, Network, Query};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ensure_samples;
use crate::prior::prior_sample;

/// Denominator used by the rejection estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectionNormalization {
    /// Divide by the number of draws. The result estimates the joint
    /// `P(query, evidence)` rather than the conditional.
    #[default]
    TotalDraws,
    /// Divide by the number of evidence-consistent draws (textbook rejection
    /// sampling). Yields 0.0 when nothing is accepted.
    AcceptedSamples,
}

/// Counts gathered by a rejection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RejectionOutcome {
    /// Number of prior samples drawn.
    pub draws: usize,
    /// Samples consistent with the evidence.
    pub accepted: usize,
    /// Accepted samples that also satisfy the query.
    pub satisfied: usize,
    /// Normalization applied to produce `estimate`.
    pub normalization: RejectionNormalization,
    /// Estimated probability in `[0, 1]`.
    pub estimate: f64,
}

/// Rejection sampling estimate of the query given the evidence, divided by the
/// number of draws.
pub fn rejection_sampling<R: Rng + ?Sized>(
    network: &Network,
    query: &Query,
    evidence: &Evidence,
    samples: usize,
    rng: &mut R,
) -> Result<f64, BayesError> {
    rejection_sampling_with(
        network,
        query,
        evidence,
        samples,
        RejectionNormalization::TotalDraws,
        rng,
    )
}

/// Rejection sampling estimate with an explicit normalization.
pub fn rejection_sampling_with<R: Rng + ?Sized>(
    network: &Network,
    query: &Query,
    evidence: &Evidence,
    samples: usize,
    normalization: RejectionNormalization,
    rng: &mut R,
) -> Result<f64, BayesError> {
    rejection_sampling_detailed(network, query, evidence, samples, normalization, rng)
        .map(|outcome| outcome.estimate)
}

/// Runs rejection sampling and returns the raw counts with the estimate.
pub fn rejection_sampling_detailed<R: Rng + ?Sized>(
    network: &Network,
    query: &Query,
    evidence: &Evidence,
    samples: usize,
    normalization: RejectionNormalization,
    rng: &mut R,
) -> Result<RejectionOutcome, BayesError> {
    ensure_samples(samples)?;
    let query = query.resolve(network)?;
    let evidence = evidence.resolve(network)?;

    let mut accepted = 0usize;
    let mut satisfied = 0usize;
    for _ in 0..samples {
        let sample = prior_sample(network, rng)?;
        if !sample.satisfies(evidence.bindings()) {
            continue;
        }
        accepted += 1;
        if sample.satisfies(&query) {
            satisfied += 1;
        }
    }

    let denominator = match normalization {
        RejectionNormalization::TotalDraws => samples,
        RejectionNormalization::AcceptedSamples => accepted,
    };
    let estimate = if denominator == 0 {
        0.0
    } else {
        satisfied as f64 / denominator as f64
    };
    if accepted == 0 {
        log::warn!("rejection sampling accepted none of {samples} draws; estimate is 0");
    }
    log::debug!(
        "rejection sampling: draws={} accepted={} satisfied={} estimate={}",
        samples,
        accepted,
        satisfied,
        estimate
    );
    Ok(RejectionOutcome {
        draws: samples,
        accepted,
        satisfied,
        normalization,
        estimate,
    })
}
