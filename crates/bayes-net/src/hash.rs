use sha2::{Digest, Sha256};

use crate::network::Network;

/// Computes the canonical structural hash of the network.
///
/// Covers names, domains, parents and every CPT row in canonical key order,
/// so two networks that sample identically hash identically.
pub fn canonical_hash(network: &Network) -> String {
    let mut hasher = Sha256::new();
    hasher.update((network.len() as u64).to_le_bytes());
    for id in network.variables() {
        update_str(network.name(id), &mut hasher);
        let domain = network.domain(id);
        hasher.update((domain.len() as u64).to_le_bytes());
        for label in domain {
            update_str(label, &mut hasher);
        }
        let parents = network.parents(id);
        hasher.update((parents.len() as u64).to_le_bytes());
        for &parent in parents {
            update_str(network.name(parent), &mut hasher);
        }
        let cpt = network.cpt(id);
        hasher.update((cpt.len() as u64).to_le_bytes());
        for (key, row) in cpt.rows() {
            for &index in key.indices() {
                hasher.update((index as u64).to_le_bytes());
            }
            for probability in row {
                hasher.update(probability.to_bits().to_le_bytes());
            }
        }
    }
    format!("{:x}", hasher.finalize())
}

fn update_str(value: &str, hasher: &mut Sha256) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}
