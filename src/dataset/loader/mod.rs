//! Sample file loaders.
//!
//! Two line-oriented text formats are understood:
//!
//! - dense: `<label> <v1> <v2> ... <vm>`, every line with the same `m`
//! - sparse (liblinear): `<label> <index>:<value> ...`, 1-based indices
//!
//! Any malformed line aborts the whole load; no partial store is returned.

pub mod dense;
pub mod sparse;

pub use dense::DenseLoader;
pub use sparse::SparseLoader;

use crate::core::error::{DTreeError, Result};
use crate::core::observer::{LogObserver, TrainingObserver};
use crate::core::types::SampleFormat;
use crate::dataset::SampleStore;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A parser for one sample file format.
pub trait SampleLoader {
    /// Parse every line of `reader` into a store.
    fn parse<R: BufRead>(&self, reader: R) -> Result<SampleStore>;

    /// Format handled by this loader.
    fn format(&self) -> SampleFormat;

    /// Open `path` and parse it.
    fn load<P: AsRef<Path>>(&self, path: P) -> Result<SampleStore> {
        let path = path.as_ref();
        log::debug!("loading {} samples from {}", self.format(), path.display());

        let file = File::open(path)?;
        let store = self.parse(BufReader::new(file))?;
        LogObserver.on_event(&store.loaded_event());
        Ok(store)
    }
}

/// Parse dense sample lines from any buffered reader.
pub fn parse_dense<R: BufRead>(reader: R) -> Result<SampleStore> {
    DenseLoader.parse(reader)
}

/// Parse sparse sample lines from any buffered reader.
pub fn parse_sparse<R: BufRead>(reader: R) -> Result<SampleStore> {
    SparseLoader.parse(reader)
}

/// Load a dense sample file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<SampleStore> {
    DenseLoader.load(path)
}

/// Load a sparse (liblinear) sample file.
pub fn load_sparse<P: AsRef<Path>>(path: P) -> Result<SampleStore> {
    SparseLoader.load(path)
}

/// Load a sample file in the given format.
pub fn load_samples<P: AsRef<Path>>(path: P, format: SampleFormat) -> Result<SampleStore> {
    match format {
        SampleFormat::Dense => load(path),
        SampleFormat::Sparse => load_sparse(path),
    }
}

/// Parse a finite numeric token, reporting the 1-based line on failure.
///
/// `inf` and `NaN` are refused: a trained tree stores split thresholds
/// taken from feature values and must stay serializable.
pub(crate) fn parse_number(token: &str, line: usize) -> Result<f64> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(DTreeError::data_format(
            line,
            format!("non-finite number \"{}\"", token),
        )),
        Err(_) => Err(DTreeError::data_format(
            line,
            format!("invalid number \"{}\"", token),
        )),
    }
}
