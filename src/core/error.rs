//! Error types for the Gaussian kernel

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KernelError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Incompatible features: left is {left}, right is {right}")]
    IncompatibleFeatures { left: String, right: String },

    #[error("Normalizer initialization failed: {0}")]
    Normalization(String),

    #[error("Kernel is not bound to feature collections")]
    NotBound,

    #[error("Compact evaluation requires dense feature access on the {0} collection")]
    DenseAccessRequired(&'static str),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, KernelError>;
