//! Sparse liblinear sample format.

use super::{parse_number, SampleLoader};
use crate::core::constants::MAX_SPARSE_INDEX;
use crate::core::error::{DTreeError, Result};
use crate::core::types::{Label, SampleFormat};
use crate::dataset::SampleStore;
use std::io::BufRead;

/// Loader for `<label> <index>:<value> ...` lines with 1-based indices.
///
/// Rows are widened to the largest index seen anywhere in the input;
/// indices a row does not mention are 0.0. Indices above
/// [`MAX_SPARSE_INDEX`] are rejected. The format is classification
/// only: `+1`/`1` is positive, every other label is negative.
#[derive(Debug, Default, Clone, Copy)]
pub struct SparseLoader;

impl SampleLoader for SparseLoader {
    fn parse<R: BufRead>(&self, reader: R) -> Result<SampleStore> {
        let mut rows: Vec<(Label, Vec<(usize, f64)>)> = Vec::new();
        let mut max_index = 0usize;

        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line?;
            let mut tokens = line.split_ascii_whitespace();
            let label = match tokens.next() {
                Some("+1") | Some("1") => 1.0,
                Some(_) => 0.0,
                None => continue,
            };

            let mut pairs = Vec::new();
            for token in tokens {
                let (index, value) = match token.split_once(':') {
                    Some((index, value)) if !value.contains(':') => (index, value),
                    _ => continue,
                };
                let index: usize = index.parse().map_err(|_| {
                    DTreeError::data_format(line_no, format!("invalid index \"{}\"", index))
                })?;
                if index == 0 {
                    return Err(DTreeError::data_format(line_no, "indices are 1-based"));
                }
                if index > MAX_SPARSE_INDEX {
                    return Err(DTreeError::data_format(
                        line_no,
                        format!("index {} exceeds {}", index, MAX_SPARSE_INDEX),
                    ));
                }
                let value = parse_number(value, line_no)?;
                max_index = max_index.max(index);
                pairs.push((index, value));
            }
            rows.push((label, pairs));
        }

        let mut store = SampleStore::with_num_features(max_index);
        for (i, (label, pairs)) in rows.into_iter().enumerate() {
            let mut x = Vec::new();
            x.try_reserve_exact(max_index).map_err(|_| {
                DTreeError::data_format(
                    i + 1,
                    format!("cannot allocate a row of {} features", max_index),
                )
            })?;
            x.resize(max_index, 0.0);
            for (index, value) in pairs {
                x[index - 1] = value;
            }
            store.append(x, label)?;
        }

        Ok(store)
    }

    fn format(&self) -> SampleFormat {
        SampleFormat::Sparse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_widened_to_global_max_index() {
        let data = "+1 1:0.5 3:-1\n-1 2:0.25\n0 5:2\n";
        let store = SparseLoader.parse(data.as_bytes()).unwrap();
        assert_eq!(store.num_features(), 5);
        assert_eq!(store.row(0), &[0.5, 0.0, -1.0, 0.0, 0.0]);
        assert_eq!(store.row(1), &[0.0, 0.25, 0.0, 0.0, 0.0]);
        assert_eq!(store.row(2), &[0.0, 0.0, 0.0, 0.0, 2.0]);
        assert_eq!(store.labels(), &[1.0, 0.0, 0.0]);
        assert_eq!(store.positives(), 1);
        assert_eq!(store.negatives(), 2);
    }

    #[test]
    fn test_malformed_pairs_are_skipped() {
        let data = "1 1:0.5 junk 2:1:3 2:0.75\n";
        let store = SparseLoader.parse(data.as_bytes()).unwrap();
        assert_eq!(store.row(0), &[0.5, 0.75]);
    }

    #[test]
    fn test_zero_index_rejected() {
        let err = SparseLoader.parse("1 0:0.5\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DTreeError::DataFormat { line: 1, .. }));
    }

    #[test]
    fn test_huge_index_is_data_format_error() {
        let err = SparseLoader
            .parse("1 1:0.5\n0 1000000000000:1\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, DTreeError::DataFormat { line: 2, .. }));

        let over = format!("1 {}:1\n", MAX_SPARSE_INDEX + 1);
        assert!(SparseLoader.parse(over.as_bytes()).is_err());

        let at_cap = format!("1 {}:1\n", MAX_SPARSE_INDEX);
        let store = SparseLoader.parse(at_cap.as_bytes()).unwrap();
        assert_eq!(store.num_features(), MAX_SPARSE_INDEX);
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let err = SparseLoader.parse("1 1:inf\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DTreeError::DataFormat { line: 1, .. }));
    }

    #[test]
    fn test_bad_value_rejected() {
        let err = SparseLoader.parse("1 1:0.5\n0 2:x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DTreeError::DataFormat { line: 2, .. }));
    }
}
