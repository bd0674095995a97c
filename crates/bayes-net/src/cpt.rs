use std::borrow::Borrow;
use std::collections::BTreeMap;

use bayes_core::PROBABILITY_TOLERANCE;

/// Ordered tuple of parent value indices, one per parent in declaration order.
///
/// Equality, hashing and ordering are structural over the index tuple, which is
/// what allows lookups by a plain `&[usize]` slice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParentKey(Box<[usize]>);

impl ParentKey {
    /// Builds a key from parent value indices.
    pub fn from_indices(indices: impl Into<Box<[usize]>>) -> Self {
        Self(indices.into())
    }

    /// Returns the parent value indices.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl Borrow<[usize]> for ParentKey {
    fn borrow(&self) -> &[usize] {
        &self.0
    }
}

/// Conditional probability table of one variable.
///
/// Each row is aligned to the owning variable's domain order. Rows are kept in
/// key order so iteration is canonical.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cpt {
    rows: BTreeMap<ParentKey, Box<[f64]>>,
}

impl Cpt {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a row, returning `false` if the key was already present.
    pub(crate) fn insert(&mut self, key: ParentKey, row: Vec<f64>) -> bool {
        if self.rows.contains_key(&key) {
            return false;
        }
        self.rows.insert(key, row.into_boxed_slice());
        true
    }

    /// Returns the probability vector for the given parent value indices.
    pub fn row(&self, key: &[usize]) -> Option<&[f64]> {
        self.rows.get(key).map(|row| &**row)
    }

    /// Returns whether a row exists for the given parent value indices.
    pub fn contains(&self, key: &[usize]) -> bool {
        self.rows.contains_key(key)
    }

    /// Iterates over all rows in canonical key order.
    pub fn rows(&self) -> impl Iterator<Item = (&ParentKey, &[f64])> + '_ {
        self.rows.iter().map(|(key, row)| (key, &**row))
    }

    /// Number of rows stored in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Iterator over every parent value combination for the given domain sizes.
///
/// Combinations are produced in mixed-radix order with the last parent varying
/// fastest. An empty `radices` slice yields exactly one empty combination.
#[derive(Debug, Clone)]
pub struct ParentCombinations {
    radices: Vec<usize>,
    current: Option<Vec<usize>>,
}

impl ParentCombinations {
    /// Creates the iterator for parents with the given domain sizes.
    pub fn new(radices: &[usize]) -> Self {
        let current = if radices.iter().any(|&radix| radix == 0) {
            None
        } else {
            Some(vec![0; radices.len()])
        };
        Self {
            radices: radices.to_vec(),
            current,
        }
    }

    /// Total number of combinations.
    pub fn count_total(radices: &[usize]) -> usize {
        radices.iter().product()
    }
}

impl Iterator for ParentCombinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        let mut successor = current.clone();
        let mut position = successor.len();
        let mut advanced = false;
        while position > 0 {
            position -= 1;
            successor[position] += 1;
            if successor[position] < self.radices[position] {
                advanced = true;
                break;
            }
            successor[position] = 0;
        }
        if advanced {
            self.current = Some(successor);
        }
        Some(current)
    }
}

/// Reasons a probability vector can be rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RowDefect {
    Length { expected: usize, found: usize },
    InvalidEntry { position: usize, value: f64 },
    NotNormalized { sum: f64 },
}

/// Checks length, entries and normalization of a probability vector.
pub(crate) fn check_row(row: &[f64], domain_size: usize) -> Result<(), RowDefect> {
    if row.len() != domain_size {
        return Err(RowDefect::Length {
            expected: domain_size,
            found: row.len(),
        });
    }
    if let Some((position, &value)) = row
        .iter()
        .enumerate()
        .find(|(_, value)| !value.is_finite() || **value < 0.0)
    {
        return Err(RowDefect::InvalidEntry { position, value });
    }
    let sum: f64 = row.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(RowDefect::NotNormalized { sum });
    }
    Ok(())
}
