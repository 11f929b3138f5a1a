//! Sparse feature vectors.

use crate::ModelError;

/// A feature vector with only its non-zero entries stored.
///
/// Entries are kept sorted by column index and never contain explicit zeros.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Creates an all-zero vector of the given dimensionality.
    pub fn zeros(dim: usize) -> Self {
        Self { dim, entries: Vec::new() }
    }

    /// Builds a vector from `(index, value)` pairs in any order.
    ///
    /// Zero values are dropped and duplicate indices are summed.
    pub fn from_entries(
        dim: usize,
        entries: impl IntoIterator<Item = (usize, f64)>,
    ) -> Result<Self, ModelError> {
        let mut sorted: Vec<(usize, f64)> = entries.into_iter().collect();
        if let Some(&(index, _)) = sorted.iter().find(|(i, _)| *i >= dim) {
            return Err(ModelError::ShapeMismatch { expected: dim, actual: index + 1 });
        }
        sorted.sort_by_key(|(i, _)| *i);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(sorted.len());
        for (index, value) in sorted {
            match merged.last_mut() {
                Some(last) if last.0 == index => last.1 += value,
                _ => merged.push((index, value)),
            }
        }
        merged.retain(|(_, v)| *v != 0.0);

        Ok(Self { dim, entries: merged })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value at `index`, zero when absent.
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Dot product with a dense weight vector of the same dimensionality.
    pub fn dot(&self, weights: &[f64]) -> Result<f64, ModelError> {
        if weights.len() != self.dim {
            return Err(ModelError::ShapeMismatch { expected: weights.len(), actual: self.dim });
        }
        Ok(self.entries.iter().map(|&(i, v)| weights[i] * v).sum())
    }

    /// Rescales every entry in place.
    pub fn scale(&mut self, factor: f64) {
        for (_, v) in &mut self.entries {
            *v *= factor;
        }
    }

    pub fn l1_norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v.abs()).sum()
    }

    pub fn l2_norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }
}
