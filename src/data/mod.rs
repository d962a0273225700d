//! Feature collections and file loaders
//!
//! Dense and sparse collections implement `DotFeatures` so kernels can bind
//! to them; the loaders read LibSVM and CSV files into those collections.

pub mod csv;
pub mod dense;
pub mod libsvm;
pub mod sparse;

pub use self::csv::*;
pub use self::dense::*;
pub use self::libsvm::*;
pub use self::sparse::*;
