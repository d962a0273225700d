//! Kernel functions
//!
//! `DotKernel` supplies bound collections and cross dot products;
//! `GaussianKernel` layers the squared-norm cache and the Gaussian
//! evaluation policies on top of it.

pub mod dot;
pub mod gaussian;
pub mod normalizer;
pub mod norms;
pub mod traits;

pub use self::dot::*;
pub use self::gaussian::*;
pub use self::normalizer::*;
pub use self::norms::*;
pub use self::traits::*;
