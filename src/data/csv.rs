//! CSV format dataset implementation
//!
//! Supports loading datasets from CSV files where:
//! - The last column is the label
//! - All other columns are features
//! - First row can be headers (automatically detected)

use crate::core::{KernelError, Result};
use crate::data::DenseFeatures;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Labelled dense feature vectors read from a CSV file
#[derive(Debug, Clone)]
pub struct CSVDataset {
    features: DenseFeatures,
    labels: Vec<f64>,
}

impl CSVDataset {
    /// Load a dataset from a CSV file
    ///
    /// The last column is assumed to be the label.
    /// Headers are automatically detected if present.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(KernelError::IoError)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Load a dataset from a reader with header auto-detection
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, true)
    }

    /// Load a dataset from a reader with explicit header option
    pub fn from_reader_with_options<R: BufRead>(
        reader: R,
        auto_detect_header: bool,
    ) -> Result<Self> {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        let mut seen_first = false;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(KernelError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if !seen_first {
                seen_first = true;
                if auto_detect_header && Self::is_header_line(line) {
                    continue;
                }
            }

            let (row, label) = Self::parse_data_line(line).map_err(|e| {
                KernelError::ParseError(format!("Error parsing line {}: {}", line_num + 1, e))
            })?;
            rows.push(row);
            labels.push(label);
        }

        if rows.is_empty() {
            return Err(KernelError::EmptyDataset);
        }

        Ok(CSVDataset {
            features: DenseFeatures::from_rows(rows)?,
            labels,
        })
    }

    /// Check if a line appears to be a header
    fn is_header_line(line: &str) -> bool {
        let fields: Vec<&str> = line.split(',').collect();

        if fields.len() < 2 {
            return false;
        }

        let non_numeric_count = fields
            .iter()
            .take(fields.len() - 1)
            .filter(|field| field.trim().parse::<f64>().is_err())
            .count();

        non_numeric_count > fields.len() / 2
    }

    /// Parse a CSV data line into a feature row and label
    fn parse_data_line(line: &str) -> Result<(Vec<f64>, f64)> {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();

        if fields.len() < 2 {
            return Err(KernelError::ParseError(format!(
                "Line has too few fields: {}",
                line
            )));
        }

        let (label_str, feature_fields) = match fields.split_last() {
            Some(split) => split,
            None => return Err(KernelError::ParseError("Empty line".to_string())),
        };
        let label = label_str
            .parse::<f64>()
            .map_err(|_| KernelError::ParseError(format!("Invalid label: {}", label_str)))?;

        let row = feature_fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                field.parse::<f64>().map_err(|_| {
                    KernelError::ParseError(format!(
                        "Invalid feature value at column {}: {}",
                        idx + 1,
                        field
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok((row, label))
    }

    /// Borrow the feature collection
    pub fn features(&self) -> &DenseFeatures {
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
    pub fn into_parts(self) -> (DenseFeatures, Vec<f64>) {
        (self.features, self.labels)
    }
}
