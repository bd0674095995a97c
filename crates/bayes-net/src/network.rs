use std::collections::BTreeMap;

use bayes_core::errors::{BayesError, ErrorInfo};

use crate::assignment::Binding;
use crate::cpt::Cpt;
use crate::ids::VariableId;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VariableRecord {
    pub(crate) name: String,
    pub(crate) domain: Vec<String>,
    pub(crate) parents: Vec<VariableId>,
    pub(crate) children: Vec<VariableId>,
    pub(crate) cpt: Cpt,
}

/// Immutable discrete Bayesian network.
///
/// Built once through [`build_network`](crate::build_network),
/// [`NetworkBuilder`](crate::NetworkBuilder) or a
/// [`NetworkSpec`](crate::NetworkSpec) and shared read-only by every sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub(crate) variables: Vec<VariableRecord>,
    pub(crate) names: BTreeMap<String, VariableId>,
    pub(crate) order: Vec<VariableId>,
}

impl Network {
    /// Number of variables in the network.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns whether the network has no variables. Built networks never are.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterates over variable identifiers in declaration order.
    pub fn variables(&self) -> impl ExactSizeIterator<Item = VariableId> + '_ {
        (0..self.variables.len()).map(VariableId::from_raw)
    }

    /// Variables ordered so that every parent precedes its children.
    pub fn topological_order(&self) -> &[VariableId] {
        &self.order
    }

    /// Looks up a variable by name.
    pub fn id(&self, name: &str) -> Result<VariableId, BayesError> {
        self.names.get(name).copied().ok_or_else(|| {
            BayesError::Query(
                ErrorInfo::new("unknown-variable", "variable is not part of the network")
                    .with_context("variable", name),
            )
        })
    }

    /// Name of the variable.
    pub fn name(&self, id: VariableId) -> &str {
        &self.record(id).name
    }

    /// Ordered value labels of the variable.
    pub fn domain(&self, id: VariableId) -> &[String] {
        &self.record(id).domain
    }

    /// Ordered parents of the variable (empty for roots).
    pub fn parents(&self, id: VariableId) -> &[VariableId] {
        &self.record(id).parents
    }

    /// Variables that list `id` as a parent, in declaration order.
    pub fn children(&self, id: VariableId) -> &[VariableId] {
        &self.record(id).children
    }

    /// Returns whether the variable has no parents.
    pub fn is_root(&self, id: VariableId) -> bool {
        self.record(id).parents.is_empty()
    }

    /// Conditional probability table of the variable.
    pub fn cpt(&self, id: VariableId) -> &Cpt {
        &self.record(id).cpt
    }

    /// Row supplied for a root variable, if any.
    ///
    /// Samplers never consult it for generation; roots are drawn uniformly.
    pub fn root_prior(&self, id: VariableId) -> Option<&[f64]> {
        if self.is_root(id) {
            self.record(id).cpt.row(&[])
        } else {
            None
        }
    }

    /// Position of `label` within the variable's domain.
    pub fn value_index(&self, id: VariableId, label: &str) -> Result<usize, BayesError> {
        let record = self.record(id);
        record
            .domain
            .iter()
            .position(|candidate| candidate == label)
            .ok_or_else(|| {
                BayesError::Query(
                    ErrorInfo::new("unknown-value", "value is not in the variable's domain")
                        .with_context("variable", record.name.as_str())
                        .with_context("value", label),
                )
            })
    }

    /// Label at `index` within the variable's domain.
    pub fn value_label(&self, id: VariableId, index: usize) -> &str {
        &self.record(id).domain[index]
    }

    /// Resolves a `variable = value` pair against the network.
    pub fn resolve(&self, variable: &str, value: &str) -> Result<Binding, BayesError> {
        let id = self.id(variable)?;
        let value = self.value_index(id, value)?;
        Ok(Binding {
            variable: id,
            value,
        })
    }

    /// Probability vector of `variable` given the labels of its parents.
    ///
    /// `parent_values` must list one label per parent in parent declaration
    /// order. Fails with a `missing-cpt-row` network error when the
    /// combination has no row, which includes labels outside the parents'
    /// domains and roots without a supplied row.
    pub fn conditional(
        &self,
        variable: &str,
        parent_values: &[&str],
    ) -> Result<&[f64], BayesError> {
        let id = self.id(variable)?;
        let record = self.record(id);
        if parent_values.len() != record.parents.len() {
            return Err(self.missing_row(id, parent_values.iter().copied()));
        }
        let mut key = Vec::with_capacity(parent_values.len());
        for (&parent, &label) in record.parents.iter().zip(parent_values) {
            match self.domain(parent).iter().position(|value| value == label) {
                Some(index) => key.push(index),
                None => return Err(self.missing_row(id, parent_values.iter().copied())),
            }
        }
        self.conditional_by_index(id, &key)
    }

    /// Probability vector of `id` given parent value indices.
    pub fn conditional_by_index(
        &self,
        id: VariableId,
        key: &[usize],
    ) -> Result<&[f64], BayesError> {
        let record = self.record(id);
        record.cpt.row(key).ok_or_else(|| {
            let labels: Vec<&str> = record
                .parents
                .iter()
                .zip(key)
                .map(|(&parent, &index)| {
                    self.domain(parent)
                        .get(index)
                        .map(String::as_str)
                        .unwrap_or("?")
                })
                .collect();
            self.missing_row(id, labels.into_iter())
        })
    }

    fn missing_row<'a>(&self, id: VariableId, labels: impl Iterator<Item = &'a str>) -> BayesError {
        let combination = labels.collect::<Vec<_>>().join(",");
        BayesError::Network(
            ErrorInfo::new(
                "missing-cpt-row",
                "no conditional probability row for parent combination",
            )
            .with_context("variable", self.name(id))
            .with_context("parents", format!("({combination})"))
            .with_hint("every reachable parent combination needs a CPT row"),
        )
    }

    pub(crate) fn record(&self, id: VariableId) -> &VariableRecord {
        &self.variables[id.index()]
    }
}
