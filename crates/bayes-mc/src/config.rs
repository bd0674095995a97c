use std::fs;
use std::path::Path;

use bayes_core::errors::{BayesError, ErrorInfo};
use serde::{Deserialize, Serialize};

use crate::gibbs::GibbsOptions;
use crate::likelihood::EvidenceMode;
use crate::rejection::RejectionNormalization;

/// YAML-configurable parameters governing an estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Samples per estimator (sweeps for Gibbs).
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Master seed and labelling.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Rejection estimator settings.
    #[serde(default)]
    pub rejection: RejectionConfig,
    /// Likelihood-weighting settings.
    #[serde(default)]
    pub likelihood: LikelihoodConfig,
    /// Gibbs chain settings.
    #[serde(default)]
    pub gibbs: GibbsConfig,
}

fn default_samples() -> usize {
    10_000
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            seed_policy: SeedPolicy::default(),
            rejection: RejectionConfig::default(),
            likelihood: LikelihoodConfig::default(),
            gibbs: GibbsConfig::default(),
        }
    }
}

impl RunConfig {
    /// Parses a configuration from YAML; omitted fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, BayesError> {
        let config: RunConfig = serde_yaml::from_str(yaml)
            .map_err(|err| BayesError::Config(ErrorInfo::new("config-parse", err.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, BayesError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            BayesError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&contents)
            .map_err(|err| err.with_context("path", path.display().to_string()))
    }

    /// Serializes the configuration to YAML.
    pub fn to_yaml(&self) -> Result<String, BayesError> {
        serde_yaml::to_string(self)
            .map_err(|err| BayesError::Config(ErrorInfo::new("config-serialize", err.to_string())))
    }

    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> Result<(), BayesError> {
        if self.samples == 0 {
            return Err(BayesError::Config(
                ErrorInfo::new("zero-samples", "sample count must be positive")
                    .with_hint("set `samples` to a value greater than zero"),
            ));
        }
        if self.gibbs.burn_in.checked_add(self.samples).is_none() {
            return Err(BayesError::Config(
                ErrorInfo::new("sweep-overflow", "gibbs burn-in plus samples overflows")
                    .with_context("burn_in", self.gibbs.burn_in.to_string())
                    .with_context("samples", self.samples.to_string()),
            ));
        }
        Ok(())
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed from which every estimator's substream is derived.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded in reports.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

/// Rejection estimator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RejectionConfig {
    /// Denominator of the estimate.
    #[serde(default)]
    pub normalization: RejectionNormalization,
}

/// Likelihood-weighting settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LikelihoodConfig {
    /// Evidence treatment during generation.
    #[serde(default)]
    pub evidence_mode: EvidenceMode,
}

/// Gibbs chain settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GibbsConfig {
    /// Sweeps discarded before counting.
    #[serde(default)]
    pub burn_in: usize,
    /// Per-variable resampling rule.
    #[serde(default)]
    pub resampler: ResamplerKind,
}

impl GibbsConfig {
    /// Chain options derived from the configuration.
    pub fn options(&self) -> GibbsOptions {
        GibbsOptions {
            burn_in: self.burn_in,
        }
    }
}

/// Selects the [`Resampler`](crate::Resampler) used by the Gibbs chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResamplerKind {
    /// [`ParentConditional`](crate::ParentConditional).
    #[default]
    ParentConditional,
    /// [`MarkovBlanket`](crate::MarkovBlanket).
    MarkovBlanket,
}
