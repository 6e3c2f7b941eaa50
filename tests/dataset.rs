//! Sample loading integration tests.

use dtree_gbdt::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

mod common;
use common::*;

#[test]
fn test_dense_roundtrip_through_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("regression.txt");
    let store = create_regression_store(25, 4, 17);
    write_dense_file(&path, &store).unwrap();

    let loaded = load(&path).unwrap();
    assert_eq!(loaded.len(), 25);
    assert_eq!(loaded.num_features(), 4);
    assert_eq!(loaded.features(), store.features());
    assert_eq!(loaded.labels(), store.labels());
}

#[test]
fn test_dense_error_aborts_load() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "1 0.5 0.5").unwrap();
    writeln!(file, "0 0.1 0.2").unwrap();
    writeln!(file, "1 0.3").unwrap();

    match load(file.path()) {
        Err(DTreeError::DataFormat { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected a data format error, got {:?}", other),
    }
}

#[test]
fn test_class_counts_after_load() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "+1 1 2").unwrap();
    writeln!(file, "-1 3 4").unwrap();
    writeln!(file, "0 5 6").unwrap();
    writeln!(file, "1 7 8").unwrap();

    let store = load(file.path()).unwrap();
    assert_eq!(store.positives(), 2);
    assert_eq!(store.negatives(), 2);
    assert_eq!(store.positives() + store.negatives(), store.len());

    let event = store.loaded_event();
    assert_eq!(
        event,
        TrainingEvent::SamplesLoaded {
            samples: 4,
            positives: 2,
            negatives: 2,
            features: 2,
        }
    );
}

#[test]
fn test_sparse_missing_indices_default_to_zero() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "+1 2:1.5 4:-2").unwrap();
    writeln!(file, "-1 1:0.5").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "+1 6:3").unwrap();

    let store = load_samples(file.path(), SampleFormat::Sparse).unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.num_features(), 6);
    assert_eq!(store.row(0), &[0.0, 1.5, 0.0, -2.0, 0.0, 0.0]);
    assert_eq!(store.row(1), &[0.5, 0.0, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(store.row(2), &[0.0, 0.0, 0.0, 0.0, 0.0, 3.0]);
    assert_eq!(store.labels(), &[1.0, 0.0, 1.0]);
}

#[test]
fn test_parse_from_memory() {
    let dense = parse_dense("1 0.5\n0 0.25\n".as_bytes()).unwrap();
    assert_eq!(dense.len(), 2);
    let sparse = parse_sparse("1 1:0.5\n0 1:0.25\n".as_bytes()).unwrap();
    assert_eq!(dense.features(), sparse.features());
    assert_eq!(dense.labels(), sparse.labels());
}

#[test]
fn test_store_exports_array() {
    let store = create_binary_store(10, 3, 4);
    let array = store.to_array2().unwrap();
    assert_eq!(array.dim(), (10, 3));
    for (i, row) in store.features().iter().enumerate() {
        for (j, v) in row.iter().enumerate() {
            assert_eq!(array[[i, j]], *v);
        }
    }
}

#[test]
fn test_non_finite_values_abort_load() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "1 0.5 0.5").unwrap();
    writeln!(file, "0 inf 0.2").unwrap();
    let err = load(file.path()).unwrap_err();
    assert!(matches!(err, DTreeError::DataFormat { line: 2, .. }));

    let err = parse_sparse("1 1:NaN\n".as_bytes()).unwrap_err();
    assert!(matches!(err, DTreeError::DataFormat { line: 1, .. }));
}

#[test]
fn test_sparse_index_beyond_cap_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "+1 1:0.5").unwrap();
    writeln!(file, "-1 1000000000000:1").unwrap();
    let err = load_sparse(file.path()).unwrap_err();
    assert!(matches!(err, DTreeError::DataFormat { line: 2, .. }));
    assert_eq!(err.category(), "data_format");
}
