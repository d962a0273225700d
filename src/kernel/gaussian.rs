//! Gaussian kernel implementation
//!
//! The Gaussian kernel is defined as: K(x, y) = exp(-||x - y||² / width)
//!
//! The squared distance is rebuilt from cached squared norms and a live cross
//! dot product: ||x - y||² = ||x||² + ||y||² - 2<x, y>. The norms are
//! recomputed whenever the kernel is bound to new collections.
//!
//! With the compact policy enabled the value is tapered to exactly zero once
//! sqrt(||x - y||² / width) reaches 3:
//!
//! K(x, y) = max(0, 1 - sqrt(d / width) / 3)^p * exp(-d / width)
//!
//! where `p` is the feature count rounded up to the next odd number.

use crate::core::{validate_width, DotFeatures, GaussianConfig, KernelError, Result};
use crate::kernel::{DotKernel, Kernel, KernelNormalizer, SquaredNormCache};
use log::debug;

/// Gaussian (RBF) kernel over a pair of bound feature collections
///
/// Lifecycle: a new kernel is unbound; `bind` moves it to the bound state and
/// may be called again to rebind, `unbind` returns it to the unbound state.
/// `score` is only valid while bound.
#[derive(Debug)]
pub struct GaussianKernel<'a> {
    width: f64,
    compact: bool,
    base: DotKernel<'a>,
    norms: SquaredNormCache,
}

impl<'a> GaussianKernel<'a> {
    /// Unbound kernel with width 1.0 and the standard policy
    pub fn new() -> Self {
        Self {
            width: 1.0,
            compact: false,
            base: DotKernel::new(),
            norms: SquaredNormCache::new(),
        }
    }

    /// Unbound kernel with a cache-size hint (MB) and width
    pub fn with_cache_size(cache_size: usize, width: f64) -> Result<Self> {
        let mut kernel = Self::new();
        kernel.set_width(width)?;
        kernel.base.set_cache_size(cache_size);
        Ok(kernel)
    }

    /// Kernel bound immediately to `lhs` and `rhs`
    pub fn with_features(
        lhs: &'a dyn DotFeatures,
        rhs: &'a dyn DotFeatures,
        width: f64,
        cache_size: usize,
    ) -> Result<Self> {
        let mut kernel = Self::with_cache_size(cache_size, width)?;
        kernel.bind(lhs, rhs)?;
        Ok(kernel)
    }

    /// Unbound kernel from a validated configuration
    pub fn from_config(config: &GaussianConfig) -> Result<Self> {
        config.validate()?;
        let mut kernel = Self::with_cache_size(config.cache_size, config.width)?;
        kernel.set_compact_enabled(config.compact);
        Ok(kernel)
    }

    /// Bind to two collections and rebuild the squared-norm cache
    ///
    /// Old buffers are released before anything else. On failure the kernel
    /// is left unbound with an empty cache.
    pub fn bind(&mut self, lhs: &'a dyn DotFeatures, rhs: &'a dyn DotFeatures) -> Result<()> {
        self.norms.release();

        if let Err(e) = self.base.bind(lhs, rhs) {
            self.base.unbind();
            return Err(e);
        }

        self.precompute_squared();

        if let Err(e) = self.init_normalizer() {
            self.unbind();
            return Err(e);
        }
        Ok(())
    }

    /// Release the cache and forget both collections; idempotent
    pub fn unbind(&mut self) {
        if self.base.is_bound() {
            debug!("Unbinding Gaussian kernel");
        }
        self.norms.release();
        self.base.unbind();
    }

    /// Release and recompute the squared norms for the current binding
    ///
    /// Leaves the cache empty when the kernel is unbound.
    pub fn precompute_squared(&mut self) {
        self.norms.release();
        if let Some((lhs, rhs)) = self.base.features() {
            self.norms.rebuild(lhs, rhs);
        }
    }

    fn init_normalizer(&mut self) -> Result<()> {
        let (lhs_diag, rhs_diag) = self.diagonals();
        self.base.init_normalizer(&lhs_diag, &rhs_diag)
    }

    fn diagonals(&self) -> (Vec<f64>, Vec<f64>) {
        (
            self.diagonal(self.norms.lhs().unwrap_or_default()),
            self.diagonal(self.norms.rhs().unwrap_or_default()),
        )
    }

    // Self-similarity of each vector; the distance to itself is exactly zero,
    // so the compact exponent does not matter here.
    fn diagonal(&self, norms: &[f64]) -> Vec<f64> {
        norms
            .iter()
            .map(|&sq| self.evaluate(sq + sq - 2.0 * sq, 1))
            .collect()
    }

    /// Current kernel width
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Set the kernel width; rejects zero, negative and non-finite values
    pub fn set_width(&mut self, width: f64) -> Result<()> {
        validate_width(width)?;
        self.width = width;
        Ok(())
    }

    /// Whether the compact taper is applied
    pub fn compact_enabled(&self) -> bool {
        self.compact
    }

    /// Switch between the standard and compact policies
    pub fn set_compact_enabled(&mut self, compact: bool) {
        self.compact = compact;
    }

    /// Current settings as a configuration value
    pub fn config(&self) -> GaussianConfig {
        GaussianConfig {
            width: self.width,
            compact: self.compact,
            cache_size: self.base.cache_size(),
        }
    }

    /// Check if both collections are bound
    pub fn is_bound(&self) -> bool {
        self.base.is_bound()
    }

    /// Squared-norm cache for the current binding
    pub fn norms(&self) -> &SquaredNormCache {
        &self.norms
    }

    /// Underlying dot-product kernel
    pub fn base(&self) -> &DotKernel<'a> {
        &self.base
    }

    /// Install a normalizer, initializing it first when the kernel is bound
    ///
    /// If initialization fails the previous normalizer stays in place.
    pub fn set_normalizer(&mut self, mut normalizer: Box<dyn KernelNormalizer>) -> Result<()> {
        if self.base.is_bound() {
            let (lhs_diag, rhs_diag) = self.diagonals();
            normalizer.init(&lhs_diag, &rhs_diag)?;
            debug!("Initialized {} normalizer", normalizer.name());
        }
        self.base.set_normalizer(normalizer);
        Ok(())
    }

    /// Exponent of the compact taper for the bound collections
    ///
    /// Both sides need dense access with the same feature count. The
    /// exponent is the feature count when odd, otherwise the count plus one.
    pub fn compact_power(&self) -> Result<i32> {
        let (lhs, rhs) = self.base.features().ok_or(KernelError::NotBound)?;
        let alen = lhs
            .as_dense()
            .ok_or(KernelError::DenseAccessRequired("left"))?
            .num_features();
        let blen = rhs
            .as_dense()
            .ok_or(KernelError::DenseAccessRequired("right"))?
            .num_features();

        if alen != blen {
            return Err(KernelError::DimensionMismatch {
                expected: alen,
                actual: blen,
            });
        }
        Ok(compact_power(alen))
    }

    /// Squared distance between left vector `i` and right vector `j`
    ///
    /// Not clamped: cancellation can make it slightly negative.
    pub fn squared_distance(&self, i: usize, j: usize) -> f64 {
        let (sq_lhs, sq_rhs) = self.norms.pair(i, j);
        sq_lhs + sq_rhs - 2.0 * self.base.dot(i, j)
    }

    /// Score for left vector `i` and right vector `j`
    pub fn try_score(&self, i: usize, j: usize) -> Result<f64> {
        if !self.norms.is_built() {
            return Err(KernelError::NotBound);
        }
        let power = if self.compact {
            self.compact_power()?
        } else {
            0
        };
        Ok(self.evaluate(self.squared_distance(i, j), power))
    }

    /// Score for left vector `i` and right vector `j`
    ///
    /// # Panics
    /// Panics if the kernel is unbound, or in compact mode when either side
    /// lacks dense access or the feature counts differ.
    pub fn score(&self, i: usize, j: usize) -> f64 {
        match self.try_score(i, j) {
            Ok(value) => value,
            Err(e) => panic!("Gaussian kernel score({i}, {j}) failed: {e}"),
        }
    }

    fn evaluate(&self, sq_dist: f64, power: i32) -> f64 {
        let gaussian = (-sq_dist / self.width).exp();
        if !self.compact {
            return gaussian;
        }
        compact_multiplier(sq_dist / self.width, power) * gaussian
    }
}

impl Default for GaussianKernel<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for GaussianKernel<'_> {
    fn name(&self) -> &str {
        "Gaussian"
    }

    fn num_lhs(&self) -> usize {
        self.base.num_lhs()
    }

    fn num_rhs(&self) -> usize {
        self.base.num_rhs()
    }

    fn compute(&self, i: usize, j: usize) -> f64 {
        self.score(i, j)
    }

    fn normalizer(&self) -> &dyn KernelNormalizer {
        self.base.normalizer()
    }

    fn cache_size(&self) -> usize {
        self.base.cache_size()
    }

    fn is_symmetric(&self) -> bool {
        self.base.is_symmetric()
    }
}

/// Exponent of the compact taper for `num_features` features
pub fn compact_power(num_features: usize) -> i32 {
    let power = if num_features % 2 == 0 {
        num_features + 1
    } else {
        num_features
    };
    i32::try_from(power).unwrap_or(i32::MAX)
}

/// Taper factor max(0, 1 - sqrt(scaled) / 3)^power
fn compact_multiplier(scaled_sq_dist: f64, power: i32) -> f64 {
    // Clamp only inside the sqrt; cancellation would otherwise yield NaN.
    let multiplier = 1.0 - scaled_sq_dist.max(0.0).sqrt() / 3.0;
    if multiplier <= 0.0 {
        0.0
    } else {
        multiplier.powi(power)
    }
}
