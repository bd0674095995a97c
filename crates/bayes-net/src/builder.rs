use std::collections::{BTreeMap, BTreeSet};

use bayes_core::errors::{BayesError, ErrorInfo};
use indexmap::IndexMap;

use crate::cpt::{check_row, Cpt, ParentCombinations, ParentKey, RowDefect};
use crate::ids::VariableId;
use crate::network::{Network, VariableRecord};

/// Ordered variable domains; declaration order seeds the topological order.
pub type VariableDomains = IndexMap<String, Vec<String>>;
/// Parent list per variable. Variables missing from the map have no parents.
pub type ParentMap = BTreeMap<String, Vec<String>>;
/// CPT rows per variable keyed by parent label tuples.
pub type CptMap = BTreeMap<String, BTreeMap<Vec<String>, Vec<f64>>>;

/// Validation switches applied while assembling a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Require a row for every parent value combination of non-root variables.
    ///
    /// When disabled, missing combinations surface as `missing-cpt-row`
    /// errors at the moment a sampler looks them up.
    pub require_complete_cpts: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            require_complete_cpts: true,
        }
    }
}

/// Builds and validates a network from parsed maps with default options.
pub fn build_network(
    domains: &VariableDomains,
    parents: &ParentMap,
    cpts: &CptMap,
) -> Result<Network, BayesError> {
    build_network_with(domains, parents, cpts, BuildOptions::default())
}

/// Builds and validates a network from parsed maps.
pub fn build_network_with(
    domains: &VariableDomains,
    parents: &ParentMap,
    cpts: &CptMap,
    options: BuildOptions,
) -> Result<Network, BayesError> {
    for name in parents.keys().chain(cpts.keys()) {
        if !domains.contains_key(name) {
            return Err(unknown_variable(name));
        }
    }
    let decls = domains
        .iter()
        .map(|(name, domain)| VariableDecl {
            name: name.clone(),
            domain: domain.clone(),
            parents: parents.get(name).cloned().unwrap_or_default(),
            rows: cpts
                .get(name)
                .map(|rows| {
                    rows.iter()
                        .map(|(key, row)| (key.clone(), row.clone()))
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();
    assemble(decls, options)
}

/// Incremental network construction.
///
/// ```
/// use bayes_net::NetworkBuilder;
///
/// let network = NetworkBuilder::new()
///     .variable("A", ["a1", "a2"])
///     .variable("B", ["b1", "b2"])
///     .parents("B", ["A"])
///     .row("B", ["a1"], [1.0, 0.0])
///     .row("B", ["a2"], [0.0, 1.0])
///     .build()
///     .unwrap();
/// assert_eq!(network.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NetworkBuilder {
    decls: Vec<VariableDecl>,
    orphans: Vec<String>,
    options: BuildOptions,
}

impl NetworkBuilder {
    /// Creates an empty builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the validation options.
    pub fn options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Declares a variable with its ordered domain.
    pub fn variable<I, S>(mut self, name: impl Into<String>, domain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.decls.push(VariableDecl {
            name: name.into(),
            domain: domain.into_iter().map(Into::into).collect(),
            parents: Vec::new(),
            rows: Vec::new(),
        });
        self
    }

    /// Sets the ordered parents of a declared variable.
    pub fn parents<I, S>(mut self, name: &str, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parents = parents.into_iter().map(Into::into).collect();
        match self.decl_mut(name) {
            Some(decl) => decl.parents = parents,
            None => self.orphans.push(name.to_string()),
        }
        self
    }

    /// Adds a CPT row for a declared variable.
    pub fn row<K, S, P>(mut self, name: &str, parent_values: K, probabilities: P) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
        P: IntoIterator<Item = f64>,
    {
        let key = parent_values.into_iter().map(Into::into).collect();
        let row = probabilities.into_iter().collect();
        match self.decl_mut(name) {
            Some(decl) => decl.rows.push((key, row)),
            None => self.orphans.push(name.to_string()),
        }
        self
    }

    /// Validates the declarations and produces the network.
    pub fn build(self) -> Result<Network, BayesError> {
        if let Some(name) = self.orphans.first() {
            return Err(unknown_variable(name));
        }
        assemble(self.decls, self.options)
    }

    fn decl_mut(&mut self, name: &str) -> Option<&mut VariableDecl> {
        self.decls.iter_mut().rev().find(|decl| decl.name == name)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct VariableDecl {
    pub(crate) name: String,
    pub(crate) domain: Vec<String>,
    pub(crate) parents: Vec<String>,
    pub(crate) rows: Vec<(Vec<String>, Vec<f64>)>,
}

pub(crate) fn assemble(
    decls: Vec<VariableDecl>,
    options: BuildOptions,
) -> Result<Network, BayesError> {
    if decls.is_empty() {
        return Err(BayesError::network(
            "empty-network",
            "network must declare at least one variable",
        ));
    }

    let mut names = BTreeMap::new();
    for (index, decl) in decls.iter().enumerate() {
        if names.insert(decl.name.clone(), VariableId::from_raw(index)).is_some() {
            return Err(BayesError::network("duplicate-variable", "variable declared twice")
                .with_context("variable", decl.name.as_str()));
        }
        if decl.domain.is_empty() {
            return Err(BayesError::network("empty-domain", "variable has an empty domain")
                .with_context("variable", decl.name.as_str()));
        }
        let mut seen = BTreeSet::new();
        for label in &decl.domain {
            if !seen.insert(label.as_str()) {
                return Err(BayesError::network(
                    "duplicate-label",
                    "domain lists the same value twice",
                )
                .with_context("variable", decl.name.as_str())
                .with_context("value", label.as_str()));
            }
        }
    }

    let mut parent_ids = Vec::with_capacity(decls.len());
    for decl in &decls {
        let mut ids = Vec::with_capacity(decl.parents.len());
        for parent in &decl.parents {
            if parent == &decl.name {
                return Err(
                    BayesError::network("self-parent", "variable lists itself as parent")
                        .with_context("variable", decl.name.as_str()),
                );
            }
            let id = names.get(parent).copied().ok_or_else(|| {
                BayesError::Network(
                    ErrorInfo::new("unknown-parent", "parent is not a declared variable")
                        .with_context("variable", decl.name.as_str())
                        .with_context("parent", parent.as_str()),
                )
            })?;
            if ids.contains(&id) {
                return Err(
                    BayesError::network("duplicate-parent", "parent listed twice")
                        .with_context("variable", decl.name.as_str())
                        .with_context("parent", parent.as_str()),
                );
            }
            ids.push(id);
        }
        parent_ids.push(ids);
    }

    let order = topological_order(&decls, &parent_ids)?;

    let mut variables = Vec::with_capacity(decls.len());
    for (index, decl) in decls.iter().enumerate() {
        let parents = &parent_ids[index];
        let parent_domains: Vec<&[String]> = parents
            .iter()
            .map(|id| decls[id.index()].domain.as_slice())
            .collect();
        let cpt = build_cpt(decl, &parent_domains, options)?;
        variables.push(VariableRecord {
            name: decl.name.clone(),
            domain: decl.domain.clone(),
            parents: parents.clone(),
            children: Vec::new(),
            cpt,
        });
    }
    for (index, parents) in parent_ids.iter().enumerate() {
        for parent in parents {
            variables[parent.index()]
                .children
                .push(VariableId::from_raw(index));
        }
    }

    let network = Network {
        variables,
        names,
        order,
    };
    log::debug!(
        "assembled network: {} variables, {} cpt rows",
        network.len(),
        network
            .variables()
            .map(|id| network.cpt(id).len())
            .sum::<usize>()
    );
    Ok(network)
}

/// Stable Kahn ordering: among ready variables the earliest declared goes first.
fn topological_order(
    decls: &[VariableDecl],
    parent_ids: &[Vec<VariableId>],
) -> Result<Vec<VariableId>, BayesError> {
    let mut pending: Vec<usize> = parent_ids.iter().map(Vec::len).collect();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); decls.len()];
    for (child, parents) in parent_ids.iter().enumerate() {
        for parent in parents {
            children[parent.index()].push(child);
        }
    }
    let mut ready: BTreeSet<usize> = pending
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count == 0)
        .map(|(index, _)| index)
        .collect();
    let mut order = Vec::with_capacity(decls.len());
    while let Some(next) = ready.pop_first() {
        order.push(VariableId::from_raw(next));
        for &child in &children[next] {
            pending[child] -= 1;
            if pending[child] == 0 {
                ready.insert(child);
            }
        }
    }
    if order.len() != decls.len() {
        let stuck: Vec<&str> = pending
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(index, _)| decls[index].name.as_str())
            .collect();
        return Err(BayesError::Network(
            ErrorInfo::new("cycle-detected", "parent relationships contain a cycle")
                .with_context("variables", stuck.join(",")),
        ));
    }
    Ok(order)
}

fn build_cpt(
    decl: &VariableDecl,
    parent_domains: &[&[String]],
    options: BuildOptions,
) -> Result<Cpt, BayesError> {
    let mut cpt = Cpt::new();
    for (labels, row) in &decl.rows {
        let rendered = format!("({})", labels.join(","));
        if labels.len() != parent_domains.len() {
            return Err(BayesError::Network(
                ErrorInfo::new(
                    "cpt-arity-mismatch",
                    "CPT key must list one value per parent",
                )
                .with_context("variable", decl.name.as_str())
                .with_context("parents", rendered)
                .with_context("expected", parent_domains.len().to_string()),
            ));
        }
        let mut key = Vec::with_capacity(labels.len());
        for (label, domain) in labels.iter().zip(parent_domains) {
            let index = domain
                .iter()
                .position(|value| value == label)
                .ok_or_else(|| {
                    BayesError::Network(
                        ErrorInfo::new(
                            "cpt-unknown-label",
                            "CPT key uses a value outside the parent's domain",
                        )
                        .with_context("variable", decl.name.as_str())
                        .with_context("value", label.as_str()),
                    )
                })?;
            key.push(index);
        }
        check_row(row, decl.domain.len())
            .map_err(|defect| row_error(&decl.name, &rendered, defect))?;
        if !cpt.insert(ParentKey::from_indices(key), row.clone()) {
            return Err(
                BayesError::network("duplicate-cpt-row", "CPT row given twice")
                    .with_context("variable", decl.name.as_str())
                    .with_context("parents", rendered),
            );
        }
    }

    if options.require_complete_cpts && !parent_domains.is_empty() {
        let radices: Vec<usize> = parent_domains.iter().map(|domain| domain.len()).collect();
        if cpt.len() != ParentCombinations::count_total(&radices) {
            if let Some(missing) = ParentCombinations::new(&radices).find(|key| !cpt.contains(key))
            {
                let labels: Vec<&str> = missing
                    .iter()
                    .zip(parent_domains)
                    .map(|(&index, domain)| domain[index].as_str())
                    .collect();
                return Err(BayesError::Network(
                    ErrorInfo::new(
                        "missing-cpt-row",
                        "no conditional probability row for parent combination",
                    )
                    .with_context("variable", decl.name.as_str())
                    .with_context("parents", format!("({})", labels.join(",")))
                    .with_hint("every reachable parent combination needs a CPT row"),
                ));
            }
        }
    }
    Ok(cpt)
}

fn row_error(variable: &str, parents: &str, defect: RowDefect) -> BayesError {
    let info = match defect {
        RowDefect::Length { expected, found } => ErrorInfo::new(
            "domain-length-mismatch",
            "probability vector length differs from the domain size",
        )
        .with_context("expected", expected.to_string())
        .with_context("found", found.to_string()),
        RowDefect::InvalidEntry { position, value } => ErrorInfo::new(
            "invalid-probability",
            "probabilities must be finite and non-negative",
        )
        .with_context("position", position.to_string())
        .with_context("value", value.to_string()),
        RowDefect::NotNormalized { sum } => {
            ErrorInfo::new("row-not-normalized", "probability vector does not sum to one")
                .with_context("sum", sum.to_string())
        }
    };
    BayesError::Network(
        info.with_context("variable", variable)
            .with_context("parents", parents),
    )
}

fn unknown_variable(name: &str) -> BayesError {
    BayesError::Network(
        ErrorInfo::new("unknown-variable", "variable has no declared domain")
            .with_context("variable", name),
    )
}
