use bayes_core::errors::{BayesError, ErrorInfo};
use bayes_net::{Evidence, Network, ResolvedEvidence, Sample, VariableId};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ensure_samples;
use crate::prior::draw_variable;

/// How evidence variables are treated while a weighted sample is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceMode {
    /// Evidence variables are sampled like any other variable and only
    /// contribute their weight factor. The sampled value may differ from the
    /// observed one.
    #[default]
    Unclamped,
    /// Evidence variables are fixed to the observed value before their
    /// children are generated (standard likelihood weighting).
    Clamped,
}

/// Accumulated weights of a likelihood-weighting run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedOutcome {
    /// Number of weighted samples drawn.
    pub samples: usize,
    /// Sum of all sample weights.
    pub total_weight: f64,
    /// Sum of weights of samples where the query holds.
    pub query_weight: f64,
    /// Evidence treatment used during generation.
    pub evidence_mode: EvidenceMode,
    /// Self-normalized estimate `query_weight / total_weight`.
    pub estimate: f64,
}

/// Likelihood-weighting estimate of `P(query_var = query_val | evidence)`.
pub fn likelihood_weighting<R: Rng + ?Sized>(
    network: &Network,
    query_var: &str,
    query_val: &str,
    evidence: &Evidence,
    samples: usize,
    rng: &mut R,
) -> Result<f64, BayesError> {
    likelihood_weighting_with(
        network,
        query_var,
        query_val,
        evidence,
        samples,
        EvidenceMode::Unclamped,
        rng,
    )
}

/// Likelihood-weighting estimate with an explicit evidence mode.
pub fn likelihood_weighting_with<R: Rng + ?Sized>(
    network: &Network,
    query_var: &str,
    query_val: &str,
    evidence: &Evidence,
    samples: usize,
    mode: EvidenceMode,
    rng: &mut R,
) -> Result<f64, BayesError> {
    likelihood_weighting_detailed(network, query_var, query_val, evidence, samples, mode, rng)
        .map(|outcome| outcome.estimate)
}

/// Runs likelihood weighting and returns the accumulated weights.
///
/// Fails with a `zero-total-weight` estimate error when every sample carries
/// zero weight, since the ratio is undefined.
pub fn likelihood_weighting_detailed<R: Rng + ?Sized>(
    network: &Network,
    query_var: &str,
    query_val: &str,
    evidence: &Evidence,
    samples: usize,
    mode: EvidenceMode,
    rng: &mut R,
) -> Result<WeightedOutcome, BayesError> {
    ensure_samples(samples)?;
    let target = network.resolve(query_var, query_val)?;
    let evidence = evidence.resolve(network)?;

    let mut total_weight = 0.0;
    let mut query_weight = 0.0;
    for _ in 0..samples {
        let (sample, weight) = weighted_sample(network, &evidence, mode, rng)?;
        total_weight += weight;
        if sample.get(target.variable) == target.value {
            query_weight += weight;
        }
    }

    if total_weight <= 0.0 {
        return Err(BayesError::Estimate(
            ErrorInfo::new(
                "zero-total-weight",
                "every weighted sample has zero weight; the estimate is undefined",
            )
            .with_context("samples", samples.to_string())
            .with_context("evidence", render_evidence(network, &evidence))
            .with_hint("the evidence may have zero probability under the network"),
        ));
    }
    let estimate = query_weight / total_weight;
    log::debug!(
        "likelihood weighting: samples={} total_weight={} query_weight={} estimate={}",
        samples,
        total_weight,
        query_weight,
        estimate
    );
    Ok(WeightedOutcome {
        samples,
        total_weight,
        query_weight,
        evidence_mode: mode,
        estimate,
    })
}

/// Generates one sample in topological order together with its weight.
pub fn weighted_sample<R: Rng + ?Sized>(
    network: &Network,
    evidence: &ResolvedEvidence,
    mode: EvidenceMode,
    rng: &mut R,
) -> Result<(Sample, f64), BayesError> {
    let mut sample = Sample::for_network(network);
    let mut weight = 1.0;
    for &id in network.topological_order() {
        let observed = evidence.get(id);
        let value = match (mode, observed) {
            (EvidenceMode::Clamped, Some(value)) => value,
            _ => draw_variable(network, id, &sample, rng)?,
        };
        sample.set(id, value);
        if let Some(observed) = observed {
            weight *= evidence_factor(network, id, &sample, observed)?;
        }
    }
    Ok((sample, weight))
}

/// Weight contribution of an evidence variable.
///
/// The row is selected by the parent values currently in `sample`; the entry
/// is taken at the observed value's domain position regardless of the value
/// the variable was sampled to. Roots use their supplied row when present and
/// otherwise the uniform distribution they are drawn from.
pub fn evidence_factor(
    network: &Network,
    id: VariableId,
    sample: &Sample,
    observed: usize,
) -> Result<f64, BayesError> {
    if network.is_root(id) {
        let factor = match network.root_prior(id) {
            Some(row) => row[observed],
            None => 1.0 / network.domain(id).len() as f64,
        };
        return Ok(factor);
    }
    let key = sample.parent_values(network, id);
    let row = network.conditional_by_index(id, &key)?;
    Ok(row[observed])
}

fn render_evidence(network: &Network, evidence: &ResolvedEvidence) -> String {
    evidence
        .bindings()
        .iter()
        .map(|binding| {
            format!(
                "{}={}",
                network.name(binding.variable),
                network.value_label(binding.variable, binding.value)
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}
