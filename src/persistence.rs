//! Kernel parameter serialization and persistence
//!
//! Only the width is persisted. Feature bindings, the compact flag and the
//! normalizer belong to the running process; after a reload the squared
//! norms are recomputed for whatever collections are still bound.

use crate::core::{validate_width, KernelError, Result};
use crate::kernel::GaussianKernel;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Kernel type identifier written to saved files
pub const GAUSSIAN_KERNEL_TYPE: &str = "gaussian";

/// Serializable Gaussian kernel parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedKernel {
    /// Kernel type identifier
    pub kernel_type: String,
    /// Kernel width
    pub width: f64,
    /// Save metadata
    pub metadata: KernelMetadata,
}

/// Metadata for tracking and validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelMetadata {
    /// Library version used to save the parameters
    pub library_version: String,
    /// Creation timestamp
    pub created_at: String,
}

impl SavedKernel {
    /// Capture the persisted parameters of a kernel
    pub fn from_kernel(kernel: &GaussianKernel<'_>) -> Self {
        Self::with_width(kernel.width())
    }

    /// Parameters for a given width
    pub fn with_width(width: f64) -> Self {
        Self {
            kernel_type: GAUSSIAN_KERNEL_TYPE.to_string(),
            width,
            metadata: KernelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Check kernel type and width
    pub fn validate(&self) -> Result<()> {
        if self.kernel_type != GAUSSIAN_KERNEL_TYPE {
            return Err(KernelError::InvalidParameter(format!(
                "expected kernel type '{}', found '{}'",
                GAUSSIAN_KERNEL_TYPE, self.kernel_type
            )));
        }
        validate_width(self.width)
    }

    /// Save parameters to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(KernelError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| KernelError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load parameters from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(KernelError::IoError)?;
        let reader = BufReader::new(file);
        let saved: Self = serde_json::from_reader(reader)
            .map_err(|e| KernelError::SerializationError(e.to_string()))?;
        saved.validate()?;
        Ok(saved)
    }

    /// Build an unbound kernel from these parameters
    pub fn to_kernel<'a>(&self) -> Result<GaussianKernel<'a>> {
        let mut kernel = GaussianKernel::new();
        kernel.reload(self)?;
        Ok(kernel)
    }

    /// Print parameter summary
    pub fn print_summary(&self) {
        println!("=== Kernel Parameters ===");
        println!("Kernel Type: {}", self.kernel_type);
        println!("Width: {}", self.width);
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
    }
}

impl GaussianKernel<'_> {
    /// Apply saved parameters, then recompute the squared norms
    pub fn reload(&mut self, saved: &SavedKernel) -> Result<()> {
        saved.validate()?;
        self.set_width(saved.width)?;
        self.precompute_squared();

        if self.is_bound() {
            info!("Reloaded Gaussian kernel with width {}", saved.width);
        } else {
            warn!("Reloaded Gaussian kernel without bound features; bind before scoring");
        }
        Ok(())
    }
}
