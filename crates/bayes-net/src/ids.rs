use serde::{Deserialize, Serialize};

/// Identifier for a variable within a [`Network`](crate::Network).
///
/// Identifiers are dense and follow declaration order, so they double as
/// indices into a [`Sample`](crate::Sample).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariableId(usize);

impl VariableId {
    /// Creates a new identifier from its raw index.
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw index of the identifier.
    pub fn index(&self) -> usize {
        self.0
    }
}
