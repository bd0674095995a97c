use bayes_core::{derive_substream_seed, RngHandle};

use crate::driver::EstimatorKind;

/// Derives the deterministic seed used by one estimator of a run.
pub fn estimator_seed(master_seed: u64, kind: EstimatorKind) -> u64 {
    derive_substream_seed(master_seed, kind.substream())
}

/// RNG handle for one estimator of a run.
pub fn estimator_rng(master_seed: u64, kind: EstimatorKind) -> RngHandle {
    RngHandle::from_seed(estimator_seed(master_seed, kind))
}
