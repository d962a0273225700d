//! Core type definitions for feature vectors and kernel configuration

use crate::core::{KernelError, Result};
use std::fmt;

/// Sparse vector representation with sorted indices
#[derive(Clone, Debug, PartialEq)]
pub struct SparseVector {
    /// Sorted indices of non-zero elements
    pub indices: Vec<usize>,
    /// Values corresponding to indices
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Create a new sparse vector, ensuring indices are sorted
    pub fn new(indices: Vec<usize>, values: Vec<f64>) -> Self {
        assert_eq!(
            indices.len(),
            values.len(),
            "Indices and values must have same length"
        );

        let mut pairs: Vec<_> = indices.into_iter().zip(values).collect();
        pairs.sort_by_key(|&(idx, _)| idx);

        let (indices, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        Self { indices, values }
    }

    /// Create an empty sparse vector
    pub fn empty() -> Self {
        Self {
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Get the value at a specific index (0 if not present)
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Dot product with another sparse vector
    ///
    /// Both index lists are sorted, so this is a merge in O(nnz(x) + nnz(y)).
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let mut result = 0.0;
        let mut i = 0;
        let mut j = 0;

        while i < self.indices.len() && j < other.indices.len() {
            let a = self.indices[i];
            let b = other.indices[j];

            if a == b {
                result += self.values[i] * other.values[j];
                i += 1;
                j += 1;
            } else if a < b {
                i += 1;
            } else {
                j += 1;
            }
        }

        result
    }

    /// Dot product with a dense slice; indices past the slice contribute nothing
    pub fn dot_dense(&self, dense: &[f64]) -> f64 {
        self.indices
            .iter()
            .zip(self.values.iter())
            .filter_map(|(&idx, &v)| dense.get(idx).map(|&d| d * v))
            .sum()
    }

    /// Compute squared L2 norm
    pub fn norm_squared(&self) -> f64 {
        self.values.iter().map(|&v| v * v).sum()
    }

    /// Number of non-zero elements
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Largest stored index plus one, or 0 for an empty vector
    pub fn dim(&self) -> usize {
        self.indices.last().map_or(0, |&idx| idx + 1)
    }

    /// Check if vector is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Borrowed view of a single feature vector
#[derive(Debug, Clone, Copy)]
pub enum FeatureVector<'a> {
    Dense(&'a [f64]),
    Sparse(&'a SparseVector),
}

impl FeatureVector<'_> {
    /// Inner product between two vectors of any representation
    pub fn dot(&self, other: &FeatureVector<'_>) -> f64 {
        match (self, other) {
            (FeatureVector::Dense(a), FeatureVector::Dense(b)) => {
                a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
            }
            (FeatureVector::Dense(a), FeatureVector::Sparse(b)) => b.dot_dense(a),
            (FeatureVector::Sparse(a), FeatureVector::Dense(b)) => a.dot_dense(b),
            (FeatureVector::Sparse(a), FeatureVector::Sparse(b)) => a.dot(b),
        }
    }
}

/// Storage family of a feature collection
///
/// Two collections can only be bound to the same kernel when their classes match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureClass {
    Dense,
    Sparse,
}

impl fmt::Display for FeatureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureClass::Dense => write!(f, "dense"),
            FeatureClass::Sparse => write!(f, "sparse"),
        }
    }
}

/// Default cache-size hint in megabytes
pub const DEFAULT_CACHE_SIZE_MB: usize = 10;

/// Configuration for the Gaussian kernel
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianConfig {
    /// Kernel width (must be finite and positive)
    pub width: f64,
    /// Use the compact-support evaluation policy
    pub compact: bool,
    /// Kernel value cache size hint in megabytes
    pub cache_size: usize,
}

impl GaussianConfig {
    /// Check that the width is usable as a divisor
    pub fn validate(&self) -> Result<()> {
        validate_width(self.width)
    }
}

impl Default for GaussianConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            compact: false,
            cache_size: DEFAULT_CACHE_SIZE_MB,
        }
    }
}

pub(crate) fn validate_width(width: f64) -> Result<()> {
    if !width.is_finite() || width <= 0.0 {
        return Err(KernelError::InvalidParameter(format!(
            "width must be finite and positive, got {width}"
        )));
    }
    Ok(())
}
