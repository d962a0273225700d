//! Kernel normalizers
//!
//! A normalizer is initialized from the kernel's self-similarities on both
//! sides once the kernel is bound, and then rescales every kernel value.

use crate::core::{KernelError, Result};
use std::fmt::Debug;

/// Post-processing applied to raw kernel values
pub trait KernelNormalizer: Send + Sync + Debug {
    /// Short name used in logs and the CLI
    fn name(&self) -> &str;

    /// Prepare from the diagonals K(lhs_i, lhs_i) and K(rhs_j, rhs_j)
    fn init(&mut self, lhs_diag: &[f64], rhs_diag: &[f64]) -> Result<()>;

    /// Rescale the raw value for the pair (i, j)
    fn normalize(&self, value: f64, i: usize, j: usize) -> f64;
}

/// Leaves kernel values untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl KernelNormalizer for IdentityNormalizer {
    fn name(&self) -> &str {
        "identity"
    }

    fn init(&mut self, _lhs_diag: &[f64], _rhs_diag: &[f64]) -> Result<()> {
        Ok(())
    }

    fn normalize(&self, value: f64, _i: usize, _j: usize) -> f64 {
        value
    }
}

/// K'(x, y) = K(x, y) / sqrt(K(x, x) * K(y, y))
#[derive(Debug, Clone, Default)]
pub struct SqrtDiagNormalizer {
    sqrt_lhs: Vec<f64>,
    sqrt_rhs: Vec<f64>,
}

impl SqrtDiagNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn sqrt_diag(diag: &[f64], side: &str) -> Result<Vec<f64>> {
        diag.iter()
            .enumerate()
            .map(|(i, &d)| {
                if d.is_finite() && d > 0.0 {
                    Ok(d.sqrt())
                } else {
                    Err(KernelError::Normalization(format!(
                        "{side} diagonal entry {i} is {d}, expected a positive value"
                    )))
                }
            })
            .collect()
    }
}

impl KernelNormalizer for SqrtDiagNormalizer {
    fn name(&self) -> &str {
        "sqrt-diag"
    }

    fn init(&mut self, lhs_diag: &[f64], rhs_diag: &[f64]) -> Result<()> {
        let sqrt_lhs = Self::sqrt_diag(lhs_diag, "left")?;
        let sqrt_rhs = Self::sqrt_diag(rhs_diag, "right")?;
        self.sqrt_lhs = sqrt_lhs;
        self.sqrt_rhs = sqrt_rhs;
        Ok(())
    }

    fn normalize(&self, value: f64, i: usize, j: usize) -> f64 {
        value / (self.sqrt_lhs[i] * self.sqrt_rhs[j])
    }
}
