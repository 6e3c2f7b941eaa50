//! Sample storage and sample file loading.

pub mod loader;
pub mod sample;

pub use loader::{
    load, load_samples, load_sparse, parse_dense, parse_sparse, DenseLoader, SampleLoader,
    SparseLoader,
};
pub use sample::SampleStore;
