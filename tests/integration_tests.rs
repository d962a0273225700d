//! Integration tests for the gaussian-kernel library
//!
//! These tests verify end-to-end functionality across modules: loading
//! features, binding kernels, scoring, caching and parameter persistence.

use approx::assert_relative_eq;
use gaussian_kernel::{
    CachedKernel, DenseFeatures, DotFeatures, FeatureClass, FeatureVector, GaussianKernel,
    Kernel, KernelError, LibSVMDataset, SavedKernel, SparseFeatures, SparseVector,
    SqrtDiagNormalizer,
};
use std::io::Write;
use tempfile::NamedTempFile;

/// Collection whose every dot product is a fixed value
struct ConstantDots {
    count: usize,
    value: f64,
}

impl DotFeatures for ConstantDots {
    fn num_vectors(&self) -> usize {
        self.count
    }

    fn feature_class(&self) -> FeatureClass {
        FeatureClass::Dense
    }

    fn vector(&self, _i: usize) -> FeatureVector<'_> {
        FeatureVector::Dense(&[])
    }

    fn dot(&self, _i: usize, _other: &dyn DotFeatures, _j: usize) -> f64 {
        self.value
    }
}

/// Two 3-vector collections, width 2.0, dot products of 5.0 everywhere
#[test]
fn test_scripted_dot_products_score_one() {
    let lhs = ConstantDots {
        count: 3,
        value: 5.0,
    };
    let rhs = ConstantDots {
        count: 3,
        value: 5.0,
    };
    let kernel = GaussianKernel::with_features(&lhs, &rhs, 2.0, 10).expect("bind should succeed");

    assert!(!kernel.norms().is_aliased());
    assert_eq!(kernel.norms().lhs(), Some(&[5.0, 5.0, 5.0][..]));
    assert_eq!(kernel.squared_distance(0, 0), 0.0);
    assert_eq!(kernel.score(0, 0), 1.0);
}

#[test]
fn test_dense_end_to_end() {
    let lhs = DenseFeatures::from_rows(vec![vec![1.0, 2.0], vec![0.0, 0.0], vec![3.0, -1.0]])
        .expect("valid rows");
    let rhs = DenseFeatures::from_rows(vec![vec![1.0, 2.0], vec![2.0, 2.0], vec![-3.0, 1.0]])
        .expect("valid rows");
    let width = 2.0;
    let kernel = GaussianKernel::with_features(&lhs, &rhs, width, 10).expect("bind");

    for i in 0..3 {
        for j in 0..3 {
            let (a, b) = (lhs.row(i), rhs.row(j));
            let sq_dist: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
            assert_relative_eq!(
                kernel.score(i, j),
                (-sq_dist / width).exp(),
                epsilon = 1e-12
            );
        }
    }
    assert_eq!(kernel.score(0, 0), 1.0);
}

#[test]
fn test_libsvm_file_end_to_end() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(temp_file, "+1 1:1.0 3:2.0").expect("Failed to write");
    writeln!(temp_file, "-1 2:1.0").expect("Failed to write");
    writeln!(temp_file, "+1 1:1.0 3:2.0").expect("Failed to write");
    temp_file.flush().expect("Failed to flush");

    let (features, labels) = LibSVMDataset::from_file(temp_file.path())
        .expect("load")
        .into_parts();
    assert_eq!(labels, vec![1.0, -1.0, 1.0]);

    let kernel = GaussianKernel::with_features(&features, &features, 1.0, 10).expect("bind");

    assert!(kernel.is_symmetric());
    assert!(kernel.norms().is_aliased());
    assert_eq!(kernel.score(0, 2), 1.0);
    // ||(1,0,2) - (0,1,0)||² = 6
    assert_relative_eq!(kernel.score(0, 1), (-6.0_f64).exp());
}

#[test]
fn test_compact_policy_end_to_end() {
    let features = DenseFeatures::from_rows(vec![
        vec![0.0, 0.0, 0.0, 0.0],
        vec![1.0, 0.0, 0.0, 0.0],
        vec![3.0, 0.0, 0.0, 0.0],
    ])
    .expect("valid rows");
    let mut kernel = GaussianKernel::with_features(&features, &features, 1.0, 10).expect("bind");
    kernel.set_compact_enabled(true);

    // 4 features -> power 5
    assert_eq!(kernel.compact_power().expect("dense"), 5);
    assert_eq!(kernel.score(0, 0), 1.0);
    assert_relative_eq!(
        kernel.score(0, 1),
        (2.0_f64 / 3.0).powi(5) * (-1.0_f64).exp(),
        max_relative = 1e-12
    );
    assert_eq!(kernel.score(0, 2), 0.0);
}

#[test]
fn test_compact_policy_rejects_sparse_features() {
    let features = SparseFeatures::new(vec![SparseVector::new(vec![0], vec![1.0])]);
    let mut kernel = GaussianKernel::with_features(&features, &features, 1.0, 10).expect("bind");
    kernel.set_compact_enabled(true);

    assert!(matches!(
        kernel.try_score(0, 0),
        Err(KernelError::DenseAccessRequired(_))
    ));
}

#[test]
fn test_repeated_rebinds_hold_at_most_two_buffers() {
    let sets: Vec<DenseFeatures> = (0..4)
        .map(|k| {
            DenseFeatures::from_rows(vec![vec![k as f64, 1.0], vec![1.0, k as f64]])
                .expect("valid rows")
        })
        .collect();
    let mut kernel = GaussianKernel::new();

    for round in 0..10 {
        let lhs = &sets[round % 4];
        let rhs = &sets[(round + 1) % 4];
        kernel.bind(lhs, rhs).expect("bind");
        assert_eq!(kernel.norms().buffer_count(), 2);
        assert_eq!(kernel.norms().lhs().map(<[f64]>::len), Some(2));
    }

    kernel.unbind();
    assert_eq!(kernel.norms().buffer_count(), 0);
}

#[test]
fn test_save_and_reload_preserves_scores() {
    let features = DenseFeatures::from_rows(vec![vec![0.5, 1.5], vec![-1.0, 2.0]]).expect("rows");
    let kernel = GaussianKernel::with_features(&features, &features, 1.7, 10).expect("bind");
    let before = kernel.kernel_matrix();

    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    SavedKernel::from_kernel(&kernel)
        .save_to_file(temp_file.path())
        .expect("save");

    let saved = SavedKernel::load_from_file(temp_file.path()).expect("load");
    let mut restored = GaussianKernel::new();
    restored.bind(&features, &features).expect("bind");
    restored.reload(&saved).expect("reload");

    assert_eq!(restored.width(), 1.7);
    assert_eq!(restored.kernel_matrix(), before);
}

#[test]
fn test_cached_kernel_matches_direct_values() {
    let features = DenseFeatures::from_rows(vec![vec![0.0], vec![0.5], vec![2.0]]).expect("rows");
    let mut kernel = GaussianKernel::with_features(&features, &features, 1.0, 1).expect("bind");
    kernel
        .set_normalizer(Box::new(SqrtDiagNormalizer::new()))
        .expect("normalizer");

    let mut cached = CachedKernel::new(&kernel);
    for i in 0..3 {
        for j in 0..3 {
            assert_eq!(cached.get(i, j), kernel.kernel(i, j));
        }
    }

    // Symmetric kernel: 6 distinct pairs out of 9 lookups
    let stats = cached.stats();
    assert_eq!(stats.misses, 6);
    assert_eq!(stats.hits, 3);
}

#[test]
fn test_incompatible_bind_reports_error() {
    let dense = DenseFeatures::from_rows(vec![vec![1.0]]).expect("rows");
    let sparse = SparseFeatures::new(vec![SparseVector::new(vec![0], vec![1.0])]);

    let result = GaussianKernel::with_features(&dense, &sparse, 1.0, 10);
    assert!(matches!(
        result,
        Err(KernelError::IncompatibleFeatures { .. })
    ));
}
