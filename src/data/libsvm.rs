//! LibSVM format dataset implementation
//!
//! Supports loading datasets in the libsvm format:
//! label index:value index:value ...
//!
//! Example:
//! +1 1:0.5 3:1.2 7:0.8
//! -1 2:0.3 5:2.1

use crate::core::{KernelError, Result, SparseVector};
use crate::data::SparseFeatures;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Labelled sparse feature vectors read from a LibSVM file
#[derive(Debug, Clone)]
pub struct LibSVMDataset {
    features: SparseFeatures,
    labels: Vec<f64>,
}

impl LibSVMDataset {
    /// Load a dataset from a LibSVM format file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(KernelError::IoError)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Load a dataset from a reader (for testing and flexibility)
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut vectors = Vec::new();
        let mut labels = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(KernelError::IoError)?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match Self::parse_line(line) {
                Ok((label, vector)) => {
                    labels.push(label);
                    vectors.push(vector);
                }
                Err(e) => {
                    return Err(KernelError::ParseError(format!(
                        "Error parsing line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }

        if vectors.is_empty() {
            return Err(KernelError::EmptyDataset);
        }

        Ok(LibSVMDataset {
            features: SparseFeatures::new(vectors),
            labels,
        })
    }

    /// Parse a single line in libsvm format
    fn parse_line(line: &str) -> Result<(f64, SparseVector)> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        if parts.is_empty() {
            return Err(KernelError::ParseError("Empty line".to_string()));
        }

        let label = parts[0]
            .parse::<f64>()
            .map_err(|_| KernelError::ParseError(format!("Invalid label: {}", parts[0])))?;

        let mut indices = Vec::with_capacity(parts.len() - 1);
        let mut values = Vec::with_capacity(parts.len() - 1);

        for feature_str in &parts[1..] {
            let (index, value) = feature_str.split_once(':').ok_or_else(|| {
                KernelError::ParseError(format!("Invalid feature format: {}", feature_str))
            })?;

            let index = index.parse::<usize>().map_err(|_| {
                KernelError::ParseError(format!("Invalid feature index: {}", index))
            })?;

            let value = value.parse::<f64>().map_err(|_| {
                KernelError::ParseError(format!("Invalid feature value: {}", value))
            })?;

            // libsvm uses 1-based indexing
            if index == 0 {
                return Err(KernelError::ParseError(
                    "Feature index must be positive: 0".to_string(),
                ));
            }

            indices.push(index - 1);
            values.push(value);
        }

        Ok((label, SparseVector::new(indices, values)))
    }

    /// Borrow the feature collection
    pub fn features(&self) -> &SparseFeatures {
        &self.features
    }

    /// Labels in file order
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Split into the feature collection and labels
    pub fn into_parts(self) -> (SparseFeatures, Vec<f64>) {
        (self.features, self.labels)
    }
}
