use std::collections::BTreeMap;

use bayes_core::BayesError;
use serde::{Deserialize, Serialize};

use crate::ids::VariableId;
use crate::network::Network;

/// A `variable = value` pair resolved against a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Binding {
    /// Constrained variable.
    pub variable: VariableId,
    /// Index of the required value within the variable's domain.
    pub value: usize,
}

/// A `variable = value` pair expressed with labels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Variable name.
    pub variable: String,
    /// Value label.
    pub value: String,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(variable: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            value: value.into(),
        }
    }
}

/// Observed values conditioning a query; at most one value per variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Evidence(BTreeMap<String, String>);

impl Evidence {
    /// Creates an empty evidence set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observation, replacing any previous value for the variable.
    pub fn with(mut self, variable: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(variable, value);
        self
    }

    /// Adds an observation, returning the previous value for the variable.
    pub fn insert(
        &mut self,
        variable: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.0.insert(variable.into(), value.into())
    }

    /// Observed value for `variable`.
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.0.get(variable).map(String::as_str)
    }

    /// Number of observed variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether nothing is observed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over observations ordered by variable name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Resolves every observation against the network.
    pub fn resolve(&self, network: &Network) -> Result<ResolvedEvidence, BayesError> {
        let mut values = vec![None; network.len()];
        let mut bindings = Vec::with_capacity(self.0.len());
        for (variable, value) in self.iter() {
            let binding = network.resolve(variable, value)?;
            values[binding.variable.index()] = Some(binding.value);
            bindings.push(binding);
        }
        Ok(ResolvedEvidence { values, bindings })
    }
}

impl<K, V> FromIterator<(K, V)> for Evidence
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Evidence indexed by variable for constant-time lookups inside samplers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEvidence {
    values: Vec<Option<usize>>,
    bindings: Vec<Binding>,
}

impl ResolvedEvidence {
    /// Observed value index for the variable, if it is an evidence variable.
    pub fn get(&self, id: VariableId) -> Option<usize> {
        self.values.get(id.index()).copied().flatten()
    }

    /// All observations as bindings.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Returns whether nothing is observed.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Conjunction of `variable = value` pairs whose joint probability is estimated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(Vec<Assignment>);

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Query consisting of a single pair.
    pub fn single(variable: impl Into<String>, value: impl Into<String>) -> Self {
        Self(vec![Assignment::new(variable, value)])
    }

    /// Adds a pair to the conjunction.
    pub fn with(mut self, variable: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push(Assignment::new(variable, value));
        self
    }

    /// Pairs in insertion order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.0
    }

    /// First pair of the conjunction, used by single-target estimators.
    pub fn first(&self) -> Option<&Assignment> {
        self.0.first()
    }

    /// Returns whether the query has no pairs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves every pair against the network. An empty query is rejected.
    pub fn resolve(&self, network: &Network) -> Result<Vec<Binding>, BayesError> {
        if self.0.is_empty() {
            return Err(
                BayesError::query("empty-query", "query must name at least one variable")
                    .with_hint("add a variable = value pair to the query"),
            );
        }
        self.0
            .iter()
            .map(|pair| network.resolve(&pair.variable, &pair.value))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| Assignment::new(k, v))
                .collect(),
        )
    }
}

/// One value index per network variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sample {
    values: Vec<usize>,
}

impl Sample {
    /// Sample for `network` with every variable at its first domain value.
    pub fn for_network(network: &Network) -> Self {
        Self {
            values: vec![0; network.len()],
        }
    }

    /// Value index of the variable.
    pub fn get(&self, id: VariableId) -> usize {
        self.values[id.index()]
    }

    /// Overwrites the value index of the variable.
    pub fn set(&mut self, id: VariableId, value: usize) {
        self.values[id.index()] = value;
    }

    /// Raw value indices in declaration order.
    pub fn values(&self) -> &[usize] {
        &self.values
    }

    /// Current values of the variable's parents, in parent order.
    pub fn parent_values(&self, network: &Network, id: VariableId) -> Vec<usize> {
        network
            .parents(id)
            .iter()
            .map(|&parent| self.get(parent))
            .collect()
    }

    /// Returns whether every binding holds.
    pub fn satisfies(&self, bindings: &[Binding]) -> bool {
        bindings
            .iter()
            .all(|binding| self.get(binding.variable) == binding.value)
    }

    /// Label currently held by the variable.
    pub fn label<'n>(&self, network: &'n Network, id: VariableId) -> &'n str {
        network.value_label(id, self.get(id))
    }

    /// Converts the sample into a `variable -> label` map.
    pub fn to_labels(&self, network: &Network) -> BTreeMap<String, String> {
        network
            .variables()
            .map(|id| {
                (
                    network.name(id).to_string(),
                    self.label(network, id).to_string(),
                )
            })
            .collect()
    }
}
