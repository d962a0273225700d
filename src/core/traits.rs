//! Collaborator traits for feature collections

use crate::core::{FeatureClass, FeatureVector};

/// A collection of feature vectors that can produce inner products
///
/// Kernels hold borrowed `&dyn DotFeatures` references; the collection must
/// outlive every kernel bound to it.
pub trait DotFeatures: Send + Sync {
    /// Number of vectors in the collection
    fn num_vectors(&self) -> usize;

    /// Storage family, used to reject incompatible bindings
    fn feature_class(&self) -> FeatureClass;

    /// Borrow vector `i`
    ///
    /// # Panics
    /// Panics if `i >= num_vectors()`
    fn vector(&self, i: usize) -> FeatureVector<'_>;

    /// Inner product of vector `i` of this collection with vector `j` of `other`
    fn dot(&self, i: usize, other: &dyn DotFeatures, j: usize) -> f64 {
        self.vector(i).dot(&other.vector(j))
    }

    /// Capability query for uniform-width dense access
    fn as_dense(&self) -> Option<&dyn DenseVectorAccess> {
        None
    }

    /// Check if the collection is empty
    fn is_empty(&self) -> bool {
        self.num_vectors() == 0
    }
}

/// Dense collections where every vector has the same number of features
pub trait DenseVectorAccess {
    /// Features per vector
    fn num_features(&self) -> usize;
}

/// Pointer identity of two collections, ignoring vtables
pub fn same_collection(a: &dyn DotFeatures, b: &dyn DotFeatures) -> bool {
    std::ptr::eq(a as *const _ as *const u8, b as *const _ as *const u8)
}
