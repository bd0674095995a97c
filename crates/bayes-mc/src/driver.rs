use bayes_core::BayesError;
use bayes_net::{Evidence, Network, Query};
use serde::{Deserialize, Serialize};

use crate::config::{ResamplerKind, RunConfig};
use crate::determinism::estimator_rng;
use crate::gibbs::{gibbs_sampling_detailed, MarkovBlanket, ParentConditional};
use crate::likelihood::likelihood_weighting_detailed;
use crate::rejection::rejection_sampling_detailed;
use crate::report::EstimateReport;

/// The estimators driven by [`run_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EstimatorKind {
    /// Prior sampling with rejection.
    Rejection,
    /// Likelihood weighting.
    LikelihoodWeighting,
    /// Gibbs sampling.
    Gibbs,
}

impl EstimatorKind {
    /// Every estimator, in the order [`run_all`] runs them.
    pub const ALL: [EstimatorKind; 3] = [
        EstimatorKind::Rejection,
        EstimatorKind::LikelihoodWeighting,
        EstimatorKind::Gibbs,
    ];

    /// Stable name used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimatorKind::Rejection => "rejection",
            EstimatorKind::LikelihoodWeighting => "likelihood-weighting",
            EstimatorKind::Gibbs => "gibbs",
        }
    }

    pub(crate) fn substream(&self) -> u64 {
        match self {
            EstimatorKind::Rejection => 0,
            EstimatorKind::LikelihoodWeighting => 1,
            EstimatorKind::Gibbs => 2,
        }
    }
}

/// Runs all three estimators on one query and collects their outcomes.
///
/// Rejection sampling evaluates the whole conjunction; likelihood weighting
/// and Gibbs target the first pair of the query. Each estimator draws from its
/// own substream of the configured master seed, so a report is reproducible
/// from its configuration alone.
pub fn run_all(
    network: &Network,
    query: &Query,
    evidence: &Evidence,
    config: &RunConfig,
) -> Result<EstimateReport, BayesError> {
    config.validate()?;
    let target = query.first().ok_or_else(|| {
        BayesError::query("empty-query", "query must name at least one variable")
            .with_hint("add a variable = value pair to the query")
    })?;
    let master_seed = config.seed_policy.master_seed;
    let samples = config.samples;

    let mut rng = estimator_rng(master_seed, EstimatorKind::Rejection);
    let rejection = rejection_sampling_detailed(
        network,
        query,
        evidence,
        samples,
        config.rejection.normalization,
        &mut rng,
    )?;
    log::info!(
        "{}: estimate={} accepted={}/{}",
        EstimatorKind::Rejection.as_str(),
        rejection.estimate,
        rejection.accepted,
        rejection.draws
    );

    let mut rng = estimator_rng(master_seed, EstimatorKind::LikelihoodWeighting);
    let likelihood = likelihood_weighting_detailed(
        network,
        &target.variable,
        &target.value,
        evidence,
        samples,
        config.likelihood.evidence_mode,
        &mut rng,
    )?;
    log::info!(
        "{}: estimate={} total_weight={}",
        EstimatorKind::LikelihoodWeighting.as_str(),
        likelihood.estimate,
        likelihood.total_weight
    );

    let mut rng = estimator_rng(master_seed, EstimatorKind::Gibbs);
    let options = config.gibbs.options();
    let gibbs = match config.gibbs.resampler {
        ResamplerKind::ParentConditional => gibbs_sampling_detailed(
            network,
            &target.variable,
            &target.value,
            evidence,
            samples,
            &ParentConditional,
            options,
            &mut rng,
        )?,
        ResamplerKind::MarkovBlanket => gibbs_sampling_detailed(
            network,
            &target.variable,
            &target.value,
            evidence,
            samples,
            &MarkovBlanket,
            options,
            &mut rng,
        )?,
    };
    log::info!(
        "{}: estimate={} hits={}/{}",
        EstimatorKind::Gibbs.as_str(),
        gibbs.estimate,
        gibbs.hits,
        gibbs.counted
    );

    Ok(EstimateReport::new(
        network,
        query.clone(),
        evidence.clone(),
        config.clone(),
        rejection,
        likelihood,
        gibbs,
    ))
}
