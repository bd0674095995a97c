use bayes_core::BayesError;
use bayes_net::{Network, Sample, VariableId};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Draws one complete joint sample in topological order without evidence.
pub fn prior_sample<R: Rng + ?Sized>(network: &Network, rng: &mut R) -> Result<Sample, BayesError> {
    let mut sample = Sample::for_network(network);
    for &id in network.topological_order() {
        let value = draw_variable(network, id, &sample, rng)?;
        sample.set(id, value);
    }
    Ok(sample)
}

/// Draws a value for `id` given the values its parents hold in `state`.
///
/// Roots are drawn uniformly from their domain; a row supplied for a root is
/// not consulted.
pub fn draw_variable<R: Rng + ?Sized>(
    network: &Network,
    id: VariableId,
    state: &Sample,
    rng: &mut R,
) -> Result<usize, BayesError> {
    if network.is_root(id) {
        return Ok(draw_uniform(network.domain(id).len(), rng));
    }
    let key = state.parent_values(network, id);
    let row = network.conditional_by_index(id, &key)?;
    draw_weighted(row, rng).map_err(|err| err.with_context("variable", network.name(id)))
}

/// Uniform draw of a domain index.
pub fn draw_uniform<R: Rng + ?Sized>(domain_size: usize, rng: &mut R) -> usize {
    rng.gen_range(0..domain_size)
}

/// Draws an index with probability proportional to `weights`.
pub fn draw_weighted<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Result<usize, BayesError> {
    let distribution: WeightedIndex<f64> = WeightedIndex::new(weights).map_err(|err| {
        BayesError::estimate("degenerate-conditional", "weights cannot be sampled from")
            .with_context("reason", err.to_string())
    })?;
    Ok(distribution.sample(rng))
}
