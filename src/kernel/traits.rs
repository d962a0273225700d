//! Kernel trait definition

use crate::kernel::KernelNormalizer;

/// Kernel bound to a left and a right feature collection
///
/// Indices passed to `compute` and `kernel` address vector `i` of the left
/// collection and vector `j` of the right collection.
pub trait Kernel: Send + Sync {
    /// Short human-readable kernel name
    fn name(&self) -> &str;

    /// Number of vectors on the left side (0 when unbound)
    fn num_lhs(&self) -> usize;

    /// Number of vectors on the right side (0 when unbound)
    fn num_rhs(&self) -> usize;

    /// Raw kernel value K(lhs_i, rhs_j) before normalization
    fn compute(&self, i: usize, j: usize) -> f64;

    /// Installed normalizer
    fn normalizer(&self) -> &dyn KernelNormalizer;

    /// Cache-size hint in megabytes
    fn cache_size(&self) -> usize;

    /// True when both sides are the same collection instance
    fn is_symmetric(&self) -> bool {
        false
    }

    /// Normalized kernel value
    fn kernel(&self, i: usize, j: usize) -> f64 {
        self.normalizer().normalize(self.compute(i, j), i, j)
    }

    /// Full `num_lhs x num_rhs` kernel matrix, row-major
    fn kernel_matrix(&self) -> Vec<Vec<f64>> {
        (0..self.num_lhs())
            .map(|i| (0..self.num_rhs()).map(|j| self.kernel(i, j)).collect())
            .collect()
    }
}
