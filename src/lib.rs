//! Gaussian (RBF) kernel with cached squared norms
//!
//! K(x, y) = exp(-||x - y||² / width), evaluated from precomputed squared
//! norms and a live cross dot product, with an optional compact-support
//! policy that tapers values to exactly zero at long range.

pub mod cache;
pub mod core;
pub mod data;
pub mod kernel;
pub mod persistence;

// Re-export main types for convenience
pub use crate::cache::{CacheStats, CachedKernel, KernelCache};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{KernelError, Result};
pub use crate::data::{CSVDataset, DenseFeatures, LibSVMDataset, SparseFeatures};
pub use crate::kernel::{
    DotKernel, GaussianKernel, IdentityNormalizer, Kernel, KernelNormalizer,
    SqrtDiagNormalizer, SquaredNormCache,
};
pub use crate::persistence::SavedKernel;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
