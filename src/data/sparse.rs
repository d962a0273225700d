//! Sparse feature collection

use crate::core::{DotFeatures, FeatureClass, FeatureVector, SparseVector};

/// Collection of sparse vectors with a nominal dimension
#[derive(Debug, Clone, PartialEq)]
pub struct SparseFeatures {
    vectors: Vec<SparseVector>,
    dimensions: usize,
}

impl SparseFeatures {
    /// Wrap a list of sparse vectors; the dimension is the largest index plus one
    pub fn new(vectors: Vec<SparseVector>) -> Self {
        let dimensions = vectors.iter().map(SparseVector::dim).max().unwrap_or(0);
        Self {
            vectors,
            dimensions,
        }
    }

    /// Nominal dimensionality
    pub fn dim(&self) -> usize {
        self.dimensions
    }

    /// Borrow the underlying vectors
    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }
}

impl DotFeatures for SparseFeatures {
    fn num_vectors(&self) -> usize {
        self.vectors.len()
    }

    fn feature_class(&self) -> FeatureClass {
        FeatureClass::Sparse
    }

    fn vector(&self, i: usize) -> FeatureVector<'_> {
        FeatureVector::Sparse(&self.vectors[i])
    }
}
