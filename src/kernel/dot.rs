//! Dot-product kernel base
//!
//! Records the two bound feature collections and supplies cross dot products,
//! vector counts, the cache-size hint and the normalizer to kernels built on
//! inner products.

use crate::core::{same_collection, DotFeatures, KernelError, Result, DEFAULT_CACHE_SIZE_MB};
use crate::kernel::{IdentityNormalizer, KernelNormalizer};
use log::debug;

/// Shared state for kernels computed from inner products
#[derive(Debug)]
pub struct DotKernel<'a> {
    lhs: Option<&'a dyn DotFeatures>,
    rhs: Option<&'a dyn DotFeatures>,
    cache_size: usize,
    normalizer: Box<dyn KernelNormalizer>,
}

impl std::fmt::Debug for dyn DotFeatures + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DotFeatures({}, {} vectors)",
            self.feature_class(),
            self.num_vectors()
        )
    }
}

impl<'a> DotKernel<'a> {
    /// Unbound base with the default cache-size hint
    pub fn new() -> Self {
        Self::with_cache_size(DEFAULT_CACHE_SIZE_MB)
    }

    /// Unbound base with a cache-size hint in megabytes
    pub fn with_cache_size(cache_size: usize) -> Self {
        Self {
            lhs: None,
            rhs: None,
            cache_size,
            normalizer: Box::new(IdentityNormalizer),
        }
    }

    /// Record the two collections
    ///
    /// Fails without touching the current binding when the collections belong
    /// to different feature classes.
    pub fn bind(&mut self, lhs: &'a dyn DotFeatures, rhs: &'a dyn DotFeatures) -> Result<()> {
        if lhs.feature_class() != rhs.feature_class() {
            return Err(KernelError::IncompatibleFeatures {
                left: lhs.feature_class().to_string(),
                right: rhs.feature_class().to_string(),
            });
        }

        self.lhs = Some(lhs);
        self.rhs = Some(rhs);
        debug!(
            "Bound {} x {} {} vectors (symmetric: {})",
            lhs.num_vectors(),
            rhs.num_vectors(),
            lhs.feature_class(),
            self.is_symmetric()
        );
        Ok(())
    }

    /// Forget both collections; safe to call repeatedly
    pub fn unbind(&mut self) {
        self.lhs = None;
        self.rhs = None;
    }

    /// Left collection, when bound
    pub fn lhs(&self) -> Option<&'a dyn DotFeatures> {
        self.lhs
    }

    /// Right collection, when bound
    pub fn rhs(&self) -> Option<&'a dyn DotFeatures> {
        self.rhs
    }

    /// Both collections, when bound
    pub fn features(&self) -> Option<(&'a dyn DotFeatures, &'a dyn DotFeatures)> {
        self.lhs.zip(self.rhs)
    }

    /// Check if both collections are bound
    pub fn is_bound(&self) -> bool {
        self.features().is_some()
    }

    /// True when the same collection instance sits on both sides
    pub fn is_symmetric(&self) -> bool {
        match self.features() {
            Some((lhs, rhs)) => same_collection(lhs, rhs),
            None => false,
        }
    }

    /// Number of left vectors (0 when unbound)
    pub fn num_lhs(&self) -> usize {
        self.lhs.map_or(0, |f| f.num_vectors())
    }

    /// Number of right vectors (0 when unbound)
    pub fn num_rhs(&self) -> usize {
        self.rhs.map_or(0, |f| f.num_vectors())
    }

    /// Inner product of left vector `i` with right vector `j`
    ///
    /// # Panics
    /// Panics if the kernel is unbound
    pub fn dot(&self, i: usize, j: usize) -> f64 {
        match self.features() {
            Some((lhs, rhs)) => lhs.dot(i, rhs, j),
            None => panic!("dot product requested on an unbound kernel"),
        }
    }

    /// Cache-size hint in MB
    pub fn cache_size(&self) -> usize {
        self.cache_size
    }

    pub fn set_cache_size(&mut self, cache_size: usize) {
        self.cache_size = cache_size;
    }

    /// Currently installed normalizer
    pub fn normalizer(&self) -> &dyn KernelNormalizer {
        self.normalizer.as_ref()
    }

    /// Replace the normalizer; it is initialized on the next bind
    pub fn set_normalizer(&mut self, normalizer: Box<dyn KernelNormalizer>) {
        self.normalizer = normalizer;
    }

    /// Initialize the normalizer from both diagonals
    pub fn init_normalizer(&mut self, lhs_diag: &[f64], rhs_diag: &[f64]) -> Result<()> {
        self.normalizer.init(lhs_diag, rhs_diag)?;
        debug!("Initialized {} normalizer", self.normalizer.name());
        Ok(())
    }
}

impl Default for DotKernel<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SparseVector;
    use crate::data::{DenseFeatures, SparseFeatures};

    fn dense() -> DenseFeatures {
        DenseFeatures::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![0.0, 1.0]]).unwrap()
    }

    #[test]
    fn test_unbound_defaults() {
        let base = DotKernel::new();
        assert!(!base.is_bound());
        assert!(!base.is_symmetric());
        assert_eq!(base.num_lhs(), 0);
        assert_eq!(base.num_rhs(), 0);
        assert_eq!(base.cache_size(), DEFAULT_CACHE_SIZE_MB);
        assert_eq!(base.normalizer().name(), "identity");
    }

    #[test]
    fn test_bind_and_dot() {
        let lhs = dense();
        let rhs = DenseFeatures::from_rows(vec![vec![1.0, 1.0]]).unwrap();
        let mut base = DotKernel::with_cache_size(1);

        base.bind(&lhs, &rhs).unwrap();
        assert!(base.is_bound());
        assert!(!base.is_symmetric());
        assert_eq!(base.num_lhs(), 3);
        assert_eq!(base.num_rhs(), 1);
        assert_eq!(base.dot(1, 0), 7.0);
    }

    #[test]
    fn test_symmetric_is_identity_not_equality() {
        let a = dense();
        let b = dense();
        let mut base = DotKernel::new();

        base.bind(&a, &a).unwrap();
        assert!(base.is_symmetric());

        base.bind(&a, &b).unwrap();
        assert!(!base.is_symmetric());
    }

    #[test]
    fn test_incompatible_classes() {
        let lhs = dense();
        let rhs = SparseFeatures::new(vec![SparseVector::new(vec![0], vec![1.0])]);
        let mut base = DotKernel::new();

        let result = base.bind(&lhs, &rhs);
        assert!(matches!(
            result,
            Err(KernelError::IncompatibleFeatures { .. })
        ));
        assert!(!base.is_bound());
    }

    #[test]
    fn test_unbind_is_idempotent() {
        let features = dense();
        let mut base = DotKernel::new();
        base.bind(&features, &features).unwrap();

        base.unbind();
        base.unbind();
        assert!(!base.is_bound());
    }

    #[test]
    #[should_panic(expected = "unbound kernel")]
    fn test_dot_unbound_panics() {
        DotKernel::new().dot(0, 0);
    }
}
