use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bayes_core::errors::{BayesError, ErrorInfo};
use bayes_core::{RunProvenance, SchemaVersion};
use bayes_net::{canonical_hash, Evidence, Network, Query};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::gibbs::ChainOutcome;
use crate::likelihood::WeightedOutcome;
use crate::rejection::RejectionOutcome;

/// Schema version written into every estimate report.
pub const REPORT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Outcomes of one [`run_all`](crate::run_all) invocation with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    /// Report schema version.
    pub schema_version: SchemaVersion,
    /// Network hash, seed and tool versions.
    pub provenance: RunProvenance,
    /// Configuration the estimators ran with.
    pub config: RunConfig,
    /// Estimated query.
    pub query: Query,
    /// Conditioning evidence.
    pub evidence: Evidence,
    /// Rejection sampling outcome.
    pub rejection: RejectionOutcome,
    /// Likelihood-weighting outcome.
    pub likelihood: WeightedOutcome,
    /// Gibbs outcome.
    pub gibbs: ChainOutcome,
}

impl EstimateReport {
    pub(crate) fn new(
        network: &Network,
        query: Query,
        evidence: Evidence,
        config: RunConfig,
        rejection: RejectionOutcome,
        likelihood: WeightedOutcome,
        gibbs: ChainOutcome,
    ) -> Self {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert(
            env!("CARGO_PKG_NAME").to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        let provenance = RunProvenance {
            network_hash: canonical_hash(network),
            seed: config.seed_policy.master_seed,
            seed_label: config.seed_policy.label.clone(),
            created_at: Utc::now().to_rfc3339(),
            tool_versions,
        };
        Self {
            schema_version: REPORT_SCHEMA,
            provenance,
            config,
            query,
            evidence,
            rejection,
            likelihood,
            gibbs,
        }
    }

    /// Writes the report as pretty-printed JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), BayesError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                BayesError::Serde(
                    ErrorInfo::new("report-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            BayesError::Serde(
                ErrorInfo::new("report-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            BayesError::Serde(
                ErrorInfo::new("report-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Loads a report from disk, rejecting incompatible schema versions.
    pub fn load(path: &Path) -> Result<Self, BayesError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            BayesError::Serde(
                ErrorInfo::new("report-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let report: EstimateReport = serde_json::from_str(&contents).map_err(|err| {
            BayesError::Serde(
                ErrorInfo::new("report-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        if !REPORT_SCHEMA.is_compatible_with(&report.schema_version) {
            return Err(BayesError::Serde(
                ErrorInfo::new("schema-mismatch", "unsupported report schema version")
                    .with_context("path", path.display().to_string())
                    .with_context("found", format!("{:?}", report.schema_version))
                    .with_context("expected", format!("{REPORT_SCHEMA:?}")),
            ));
        }
        Ok(report)
    }
}
