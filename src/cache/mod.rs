//! Kernel cache implementation
//!
//! Provides an LRU cache of kernel values for repeated lookups against one
//! kernel instance. When the kernel is symmetric (the same collection on both
//! sides) K(i,j) == K(j,i), so only the entry with i <= j is stored.

use crate::kernel::Kernel;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cache key for kernel values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    i: usize,
    j: usize,
}

impl CacheKey {
    /// Create a key, normalized so that i <= j for symmetric kernels
    fn new(i: usize, j: usize, symmetric: bool) -> Self {
        if symmetric && i > j {
            Self { i: j, j: i }
        } else {
            Self { i, j }
        }
    }
}

/// LRU cache for kernel matrix values
pub struct KernelCache {
    cache: LruCache<CacheKey, f64>,
    symmetric: bool,
    hits: u64,
    misses: u64,
}

impl KernelCache {
    /// Create a new kernel cache with specified capacity in number of entries
    pub fn new(capacity: usize, symmetric: bool) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            symmetric,
            hits: 0,
            misses: 0,
        }
    }

    /// Create a kernel cache with capacity based on memory size in bytes
    pub fn with_memory_limit(memory_bytes: usize, symmetric: bool) -> Self {
        // 16 bytes per entry (key + value + overhead)
        let capacity = (memory_bytes / 16).max(1);
        Self::new(capacity, symmetric)
    }

    /// Get a kernel value from cache
    pub fn get(&mut self, i: usize, j: usize) -> Option<f64> {
        let key = CacheKey::new(i, j, self.symmetric);
        if let Some(&value) = self.cache.get(&key) {
            self.hits += 1;
            Some(value)
        } else {
            self.misses += 1;
            None
        }
    }

    /// Put a kernel value into cache
    pub fn put(&mut self, i: usize, j: usize, value: f64) {
        let key = CacheKey::new(i, j, self.symmetric);
        self.cache.put(key, value);
    }

    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            capacity: self.cache.cap().get(),
            size: self.cache.len(),
        }
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub capacity: usize,
    pub size: usize,
}

/// Kernel wrapper that memoizes normalized kernel values
///
/// The cache is sized from the kernel's cache-size hint. It borrows the
/// kernel, so the kernel cannot be rebound or reconfigured while cached.
pub struct CachedKernel<'k, K: Kernel> {
    kernel: &'k K,
    cache: KernelCache,
}

impl<'k, K: Kernel> CachedKernel<'k, K> {
    /// Wrap a kernel, sizing the cache from its hint in megabytes
    pub fn new(kernel: &'k K) -> Self {
        let bytes = kernel.cache_size().saturating_mul(1024 * 1024);
        Self {
            kernel,
            cache: KernelCache::with_memory_limit(bytes, kernel.is_symmetric()),
        }
    }

    /// Normalized kernel value, computed on a miss
    pub fn get(&mut self, i: usize, j: usize) -> f64 {
        if let Some(value) = self.cache.get(i, j) {
            return value;
        }
        let value = self.kernel.kernel(i, j);
        self.cache.put(i, j, value);
        value
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn kernel(&self) -> &K {
        self.kernel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DenseFeatures;
    use crate::kernel::GaussianKernel;

    #[test]
    fn test_cache_key_normalization() {
        assert_eq!(CacheKey::new(1, 5, true), CacheKey::new(5, 1, true));
        assert_ne!(CacheKey::new(1, 5, false), CacheKey::new(5, 1, false));
    }

    #[test]
    fn test_kernel_cache_basic() {
        let mut cache = KernelCache::new(3, true);

        assert_eq!(cache.get(0, 1), None);
        assert_eq!(cache.stats().misses, 1);

        cache.put(0, 1, 5.0);
        assert_eq!(cache.get(0, 1), Some(5.0));
        assert_eq!(cache.get(1, 0), Some(5.0));
        assert_eq!(cache.stats().hits, 2);
    }

    #[test]
    fn test_asymmetric_cache_keeps_orientation() {
        let mut cache = KernelCache::new(3, false);
        cache.put(0, 1, 5.0);

        assert_eq!(cache.get(1, 0), None);
        assert_eq!(cache.get(0, 1), Some(5.0));
    }

    #[test]
    fn test_kernel_cache_lru_eviction() {
        let mut cache = KernelCache::new(2, true);

        cache.put(0, 1, 1.0);
        cache.put(1, 2, 2.0);
        cache.put(2, 3, 3.0); // Should evict (0,1)

        assert_eq!(cache.get(0, 1), None);
        assert_eq!(cache.get(1, 2), Some(2.0));
        assert_eq!(cache.get(2, 3), Some(3.0));
    }

    #[test]
    fn test_hit_rate_calculation() {
        let mut cache = KernelCache::new(10, true);
        assert_eq!(cache.hit_rate(), 0.0);

        cache.get(0, 1);
        cache.get(1, 2);
        cache.put(0, 1, 1.0);
        cache.get(0, 1);
        cache.get(0, 1);

        // 2 hits, 2 misses
        assert_eq!(cache.hit_rate(), 0.5);
    }

    #[test]
    fn test_cache_with_memory_limit() {
        let cache = KernelCache::with_memory_limit(1000, false);
        assert_eq!(cache.stats().capacity, 62);

        let cache = KernelCache::with_memory_limit(0, false);
        assert_eq!(cache.stats().capacity, 1);
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = KernelCache::new(10, true);
        cache.put(0, 1, 1.0);
        cache.get(0, 1);

        cache.clear();

        assert_eq!(cache.get(0, 1), None);
        assert_eq!(cache.stats().hits, 0);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_cached_gaussian_kernel() {
        let features =
            DenseFeatures::from_rows(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 2.0]])
                .unwrap();
        let kernel = GaussianKernel::with_features(&features, &features, 1.0, 1).unwrap();
        let mut cached = CachedKernel::new(&kernel);

        let first = cached.get(0, 2);
        let mirrored = cached.get(2, 0);

        assert_eq!(first, kernel.score(0, 2));
        assert_eq!(first, mirrored);
        assert_eq!(cached.stats().misses, 1);
        assert_eq!(cached.stats().hits, 1);
        assert_eq!(cached.kernel().width(), 1.0);
    }
}
