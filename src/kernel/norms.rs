//! Squared-norm cache
//!
//! Holds ||x||² for every vector of the left and right collections. When both
//! sides are the same collection instance a single buffer serves both.

use crate::core::{same_collection, DotFeatures};
use log::debug;

#[derive(Debug, Clone, PartialEq, Default)]
enum NormState {
    #[default]
    Released,
    Distinct {
        lhs: Vec<f64>,
        rhs: Vec<f64>,
    },
    Aliased(Vec<f64>),
}

/// Precomputed self dot products for both bound collections
#[derive(Debug, Clone, Default)]
pub struct SquaredNormCache {
    state: NormState,
}

impl SquaredNormCache {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every buffer; a no-op when already released
    pub fn release(&mut self) {
        self.state = NormState::Released;
    }

    /// Fill the buffers from the given collections
    ///
    /// The right side reuses the left buffer when both arguments are the same
    /// collection instance.
    ///
    /// # Panics
    /// Panics if the buffers have not been released first
    pub fn rebuild(&mut self, lhs: &dyn DotFeatures, rhs: &dyn DotFeatures) {
        assert!(
            !self.is_built(),
            "squared norms must be released before they are rebuilt"
        );

        let lhs_norms = squared_norms(lhs);
        self.state = if same_collection(lhs, rhs) {
            NormState::Aliased(lhs_norms)
        } else {
            NormState::Distinct {
                lhs: lhs_norms,
                rhs: squared_norms(rhs),
            }
        };

        debug!(
            "Precomputed squared norms for {} x {} vectors (aliased: {})",
            lhs.num_vectors(),
            rhs.num_vectors(),
            self.is_aliased()
        );
    }

    /// Check if norms are held for the current binding
    pub fn is_built(&self) -> bool {
        self.state != NormState::Released
    }

    /// True when one buffer serves both sides
    pub fn is_aliased(&self) -> bool {
        matches!(self.state, NormState::Aliased(_))
    }

    /// Number of distinct buffers currently held (0, 1 or 2)
    pub fn buffer_count(&self) -> usize {
        match self.state {
            NormState::Released => 0,
            NormState::Aliased(_) => 1,
            NormState::Distinct { .. } => 2,
        }
    }

    /// Squared norms of the left collection
    pub fn lhs(&self) -> Option<&[f64]> {
        match &self.state {
            NormState::Released => None,
            NormState::Distinct { lhs, .. } => Some(lhs),
            NormState::Aliased(shared) => Some(shared),
        }
    }

    /// Squared norms of the right collection
    pub fn rhs(&self) -> Option<&[f64]> {
        match &self.state {
            NormState::Released => None,
            NormState::Distinct { rhs, .. } => Some(rhs),
            NormState::Aliased(shared) => Some(shared),
        }
    }

    /// Squared norms of left vector `i` and right vector `j`
    ///
    /// # Panics
    /// Panics if the cache is released or an index is out of range
    pub fn pair(&self, i: usize, j: usize) -> (f64, f64) {
        match &self.state {
            NormState::Released => panic!("squared norms requested before precomputation"),
            NormState::Distinct { lhs, rhs } => (lhs[i], rhs[j]),
            NormState::Aliased(shared) => (shared[i], shared[j]),
        }
    }

    #[cfg(test)]
    fn lhs_mut(&mut self) -> Option<&mut [f64]> {
        match &mut self.state {
            NormState::Released => None,
            NormState::Distinct { lhs, .. } => Some(lhs),
            NormState::Aliased(shared) => Some(shared),
        }
    }
}

fn squared_norms(features: &dyn DotFeatures) -> Vec<f64> {
    (0..features.num_vectors())
        .map(|i| features.dot(i, features, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SparseVector;
    use crate::data::{DenseFeatures, SparseFeatures};

    fn features() -> DenseFeatures {
        DenseFeatures::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![0.0, 0.0]]).unwrap()
    }

    #[test]
    fn test_release_on_empty_is_noop() {
        let mut cache = SquaredNormCache::new();
        cache.release();
        cache.release();
        assert!(!cache.is_built());
        assert_eq!(cache.buffer_count(), 0);
        assert!(cache.lhs().is_none());
        assert!(cache.rhs().is_none());
    }

    #[test]
    fn test_rebuild_distinct() {
        let lhs = features();
        let rhs = DenseFeatures::from_rows(vec![vec![2.0, 0.0]]).unwrap();
        let mut cache = SquaredNormCache::new();

        cache.rebuild(&lhs, &rhs);

        assert!(!cache.is_aliased());
        assert_eq!(cache.buffer_count(), 2);
        assert_eq!(cache.lhs(), Some(&[5.0, 25.0, 0.0][..]));
        assert_eq!(cache.rhs(), Some(&[4.0][..]));
        assert_eq!(cache.pair(1, 0), (25.0, 4.0));
    }

    #[test]
    fn test_equal_contents_are_not_aliased() {
        let a = features();
        let b = features();
        let mut cache = SquaredNormCache::new();

        cache.rebuild(&a, &b);
        assert!(!cache.is_aliased());
        assert_eq!(cache.lhs(), cache.rhs());
    }

    #[test]
    fn test_same_collection_is_aliased() {
        let shared = features();
        let mut cache = SquaredNormCache::new();

        cache.rebuild(&shared, &shared);

        assert!(cache.is_aliased());
        assert_eq!(cache.buffer_count(), 1);
        let (lhs, rhs) = (cache.lhs().unwrap(), cache.rhs().unwrap());
        assert!(std::ptr::eq(lhs.as_ptr(), rhs.as_ptr()));
    }

    #[test]
    fn test_aliased_mutation_is_visible_on_both_sides() {
        let shared = features();
        let mut cache = SquaredNormCache::new();
        cache.rebuild(&shared, &shared);

        cache.lhs_mut().unwrap()[0] = 42.0;

        assert_eq!(cache.rhs().unwrap()[0], 42.0);
        assert_eq!(cache.pair(0, 0), (42.0, 42.0));
    }

    #[test]
    fn test_release_rebuild_release_cycle() {
        let shared = features();
        let other = features();
        let mut cache = SquaredNormCache::new();

        for _ in 0..3 {
            cache.rebuild(&shared, &shared);
            assert_eq!(cache.buffer_count(), 1);
            cache.release();
            assert_eq!(cache.buffer_count(), 0);

            cache.rebuild(&shared, &other);
            assert_eq!(cache.buffer_count(), 2);
            cache.release();
            assert_eq!(cache.buffer_count(), 0);
        }
    }

    #[test]
    fn test_sparse_norms() {
        let features = SparseFeatures::new(vec![
            SparseVector::new(vec![0, 3], vec![3.0, 4.0]),
            SparseVector::empty(),
        ]);
        let mut cache = SquaredNormCache::new();
        cache.rebuild(&features, &features);

        assert_eq!(cache.lhs(), Some(&[25.0, 0.0][..]));
    }

    #[test]
    #[should_panic(expected = "released before they are rebuilt")]
    fn test_rebuild_without_release_panics() {
        let shared = features();
        let mut cache = SquaredNormCache::new();
        cache.rebuild(&shared, &shared);
        cache.rebuild(&shared, &shared);
    }

    #[test]
    #[should_panic(expected = "before precomputation")]
    fn test_pair_on_released_panics() {
        SquaredNormCache::new().pair(0, 0);
    }
}
