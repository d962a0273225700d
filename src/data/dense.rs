//! Dense fixed-width feature collection

use crate::core::{
    DenseVectorAccess, DotFeatures, FeatureClass, FeatureVector, KernelError, Result,
};

/// Row-major matrix of feature vectors sharing one width
#[derive(Debug, Clone, PartialEq)]
pub struct DenseFeatures {
    data: Vec<f64>,
    num_vectors: usize,
    num_features: usize,
}

impl DenseFeatures {
    /// Build from rows, rejecting empty input and ragged rows
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let num_features = match rows.first() {
            Some(row) => row.len(),
            None => return Err(KernelError::EmptyDataset),
        };

        let mut data = Vec::with_capacity(rows.len() * num_features);
        for row in &rows {
            if row.len() != num_features {
                return Err(KernelError::DimensionMismatch {
                    expected: num_features,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            data,
            num_vectors: rows.len(),
            num_features,
        })
    }

    /// Borrow row `i`
    ///
    /// # Panics
    /// Panics if `i >= num_vectors()`
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(
            i < self.num_vectors,
            "Vector index {} out of range for {} vectors",
            i,
            self.num_vectors
        );
        let start = i * self.num_features;
        &self.data[start..start + self.num_features]
    }

    /// Iterate over all rows
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.num_vectors).map(move |i| self.row(i))
    }
}

impl DotFeatures for DenseFeatures {
    fn num_vectors(&self) -> usize {
        self.num_vectors
    }

    fn feature_class(&self) -> FeatureClass {
        FeatureClass::Dense
    }

    fn vector(&self, i: usize) -> FeatureVector<'_> {
        FeatureVector::Dense(self.row(i))
    }

    fn as_dense(&self) -> Option<&dyn DenseVectorAccess> {
        Some(self)
    }
}

impl DenseVectorAccess for DenseFeatures {
    fn num_features(&self) -> usize {
        self.num_features
    }
}
