use bayes_core::errors::{BayesError, ErrorInfo};
use bayes_core::provenance::SchemaVersion;
use serde::{Deserialize, Serialize};

use crate::builder::{assemble, BuildOptions, VariableDecl};
use crate::network::Network;

/// Schema version written by [`Network::to_spec`].
pub const NETWORK_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Serializable description of a network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Schema version of the payload.
    #[serde(default)]
    pub schema_version: SchemaVersion,
    /// Variables in declaration order.
    pub variables: Vec<VariableSpec>,
}

/// One variable of a [`NetworkSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    /// Variable name.
    pub name: String,
    /// Ordered value labels.
    pub domain: Vec<String>,
    /// Ordered parent names.
    #[serde(default)]
    pub parents: Vec<String>,
    /// CPT rows.
    #[serde(default)]
    pub rows: Vec<CptRowSpec>,
}

/// One CPT row of a [`VariableSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CptRowSpec {
    /// Parent labels in parent order (empty for roots).
    #[serde(default)]
    pub parents: Vec<String>,
    /// Probabilities aligned to the variable's domain.
    pub probabilities: Vec<f64>,
}

impl NetworkSpec {
    /// Serializes the description to pretty JSON.
    pub fn to_json(&self) -> Result<String, BayesError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| BayesError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
    }

    /// Parses a description from JSON.
    pub fn from_json(json: &str) -> Result<Self, BayesError> {
        serde_json::from_str(json)
            .map_err(|err| BayesError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))
    }

    /// Serializes the description with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BayesError> {
        bincode::serialize(self)
            .map_err(|err| BayesError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
    }

    /// Restores a description from its `bincode` representation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BayesError> {
        bincode::deserialize(bytes)
            .map_err(|err| BayesError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))
    }
}

impl Network {
    /// Validates a description and builds the network with default options.
    pub fn from_spec(spec: &NetworkSpec) -> Result<Self, BayesError> {
        Self::from_spec_with(spec, BuildOptions::default())
    }

    /// Validates a description and builds the network.
    pub fn from_spec_with(spec: &NetworkSpec, options: BuildOptions) -> Result<Self, BayesError> {
        if !NETWORK_SCHEMA.is_compatible_with(&spec.schema_version) {
            return Err(BayesError::Serde(
                ErrorInfo::new("schema-mismatch", "unsupported network schema version")
                    .with_context("found", format!("{:?}", spec.schema_version))
                    .with_context("expected", format!("{NETWORK_SCHEMA:?}")),
            ));
        }
        let decls = spec
            .variables
            .iter()
            .map(|variable| VariableDecl {
                name: variable.name.clone(),
                domain: variable.domain.clone(),
                parents: variable.parents.clone(),
                rows: variable
                    .rows
                    .iter()
                    .map(|row| (row.parents.clone(), row.probabilities.clone()))
                    .collect(),
            })
            .collect();
        assemble(decls, options)
    }

    /// Exports the network as a serializable description.
    pub fn to_spec(&self) -> NetworkSpec {
        let variables = self
            .variables()
            .map(|id| VariableSpec {
                name: self.name(id).to_string(),
                domain: self.domain(id).to_vec(),
                parents: self
                    .parents(id)
                    .iter()
                    .map(|&parent| self.name(parent).to_string())
                    .collect(),
                rows: self
                    .cpt(id)
                    .rows()
                    .map(|(key, row)| CptRowSpec {
                        parents: self
                            .parents(id)
                            .iter()
                            .zip(key.indices())
                            .map(|(&parent, &index)| self.value_label(parent, index).to_string())
                            .collect(),
                        probabilities: row.to_vec(),
                    })
                    .collect(),
            })
            .collect();
        NetworkSpec {
            schema_version: NETWORK_SCHEMA,
            variables,
        }
    }
}
