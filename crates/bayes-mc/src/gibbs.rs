use bayes_core::BayesError;
use bayes_net::{Evidence, Network, Sample, VariableId};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ensure_samples;
use crate::prior::{draw_uniform, draw_variable, draw_weighted};

/// Resamples one variable given the current full assignment.
///
/// The Gibbs loop owns sweep order, evidence clamping and counting; a
/// resampler only decides the distribution a single variable is drawn from.
pub trait Resampler {
    /// Draws a new value index for `id`. `state` still holds the old value.
    fn resample<R: Rng + ?Sized>(
        &self,
        network: &Network,
        id: VariableId,
        state: &Sample,
        rng: &mut R,
    ) -> Result<usize, BayesError>;
}

/// Draws from the variable's own CPT row keyed by the current parent values,
/// ignoring its children. Roots are drawn uniformly.
///
/// This is not the full conditional, so the chain is only exact for variables
/// without children.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentConditional;

impl Resampler for ParentConditional {
    fn resample<R: Rng + ?Sized>(
        &self,
        network: &Network,
        id: VariableId,
        state: &Sample,
        rng: &mut R,
    ) -> Result<usize, BayesError> {
        draw_variable(network, id, state, rng)
    }
}

/// Draws from the full conditional given the Markov blanket:
/// `P(x | parents) * prod over children of P(child | its parents)`.
///
/// The root factor is the supplied root row, or uniform without one. When the
/// blanket assigns zero mass to every value (an impossible current state, as
/// the uniform initial assignment can be) the draw falls back to
/// [`ParentConditional`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkovBlanket;

impl Resampler for MarkovBlanket {
    fn resample<R: Rng + ?Sized>(
        &self,
        network: &Network,
        id: VariableId,
        state: &Sample,
        rng: &mut R,
    ) -> Result<usize, BayesError> {
        let mut scratch = state.clone();
        let parent_key = state.parent_values(network, id);
        let own_row = if network.is_root(id) {
            network.root_prior(id)
        } else {
            Some(network.conditional_by_index(id, &parent_key)?)
        };

        let domain_size = network.domain(id).len();
        let mut weights = Vec::with_capacity(domain_size);
        for value in 0..domain_size {
            scratch.set(id, value);
            let mut weight = own_row.map_or(1.0, |row| row[value]);
            for &child in network.children(id) {
                if weight == 0.0 {
                    break;
                }
                let key = scratch.parent_values(network, child);
                let row = network.conditional_by_index(child, &key)?;
                weight *= row[scratch.get(child)];
            }
            weights.push(weight);
        }

        if weights.iter().all(|&weight| weight == 0.0) {
            log::trace!(
                "markov blanket of {} has zero mass; drawing from its own row",
                network.name(id)
            );
            return draw_variable(network, id, state, rng);
        }
        draw_weighted(&weights, rng)
    }
}

/// Chain options shared by every resampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GibbsOptions {
    /// Sweeps run before counting starts.
    #[serde(default)]
    pub burn_in: usize,
}

/// Counts gathered by a Gibbs run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainOutcome {
    /// Total sweeps executed, burn-in included.
    pub sweeps: usize,
    /// Sweeps that contributed to the estimate.
    pub counted: usize,
    /// Counted sweeps that ended with the query satisfied.
    pub hits: usize,
    /// Estimated probability `hits / counted`.
    pub estimate: f64,
}

/// Gibbs estimate of `P(query_var = query_val | evidence)` over `sweeps`
/// sweeps of the parent-conditional chain without burn-in.
pub fn gibbs_sampling<R: Rng + ?Sized>(
    network: &Network,
    query_var: &str,
    query_val: &str,
    evidence: &Evidence,
    sweeps: usize,
    rng: &mut R,
) -> Result<f64, BayesError> {
    gibbs_sampling_with(
        network,
        query_var,
        query_val,
        evidence,
        sweeps,
        &ParentConditional,
        GibbsOptions::default(),
        rng,
    )
}

/// Gibbs estimate with an explicit resampler and chain options.
#[allow(clippy::too_many_arguments)]
pub fn gibbs_sampling_with<S: Resampler, R: Rng + ?Sized>(
    network: &Network,
    query_var: &str,
    query_val: &str,
    evidence: &Evidence,
    sweeps: usize,
    resampler: &S,
    options: GibbsOptions,
    rng: &mut R,
) -> Result<f64, BayesError> {
    gibbs_sampling_detailed(
        network, query_var, query_val, evidence, sweeps, resampler, options, rng,
    )
    .map(|outcome| outcome.estimate)
}

/// Runs the Gibbs chain and returns its counts.
///
/// One assignment is initialised with every variable uniform and then mutated
/// in place. Each sweep visits variables in topological order, resamples each
/// from the current assignment (earlier updates in the same sweep are
/// visible) and then overwrites evidence variables with their observed value.
#[allow(clippy::too_many_arguments)]
pub fn gibbs_sampling_detailed<S: Resampler, R: Rng + ?Sized>(
    network: &Network,
    query_var: &str,
    query_val: &str,
    evidence: &Evidence,
    sweeps: usize,
    resampler: &S,
    options: GibbsOptions,
    rng: &mut R,
) -> Result<ChainOutcome, BayesError> {
    ensure_samples(sweeps)?;
    let total = options.burn_in.checked_add(sweeps).ok_or_else(|| {
        BayesError::query("sweep-overflow", "burn-in plus sweeps overflows the sweep count")
            .with_context("burn_in", options.burn_in.to_string())
            .with_context("sweeps", sweeps.to_string())
    })?;
    let target = network.resolve(query_var, query_val)?;
    let evidence = evidence.resolve(network)?;

    let mut state = Sample::for_network(network);
    for &id in network.topological_order() {
        state.set(id, draw_uniform(network.domain(id).len(), rng));
    }

    let mut hits = 0usize;
    for sweep in 0..total {
        for &id in network.topological_order() {
            let value = resampler.resample(network, id, &state, rng)?;
            state.set(id, value);
            if let Some(observed) = evidence.get(id) {
                state.set(id, observed);
            }
        }
        if sweep >= options.burn_in && state.get(target.variable) == target.value {
            hits += 1;
        }
    }

    let estimate = hits as f64 / sweeps as f64;
    log::debug!(
        "gibbs sampling: sweeps={total} burn_in={} hits={hits} estimate={estimate}",
        options.burn_in
    );
    Ok(ChainOutcome {
        sweeps: total,
        counted: sweeps,
        hits,
        estimate,
    })
}
