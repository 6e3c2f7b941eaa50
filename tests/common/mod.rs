//! Common test utilities for dtree-gbdt integration tests.

#![allow(dead_code)]

use dtree_gbdt::SampleStore;
use rand::prelude::*;
use std::fs;
use std::path::Path;

/// Random features in [-5, 5) with a noisy linear regression target.
pub fn create_regression_store(num_samples: usize, num_features: usize, seed: u64) -> SampleStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(num_samples);
    let mut labels = Vec::with_capacity(num_samples);

    for _ in 0..num_samples {
        let row: Vec<f64> = (0..num_features).map(|_| rng.gen_range(-5.0..5.0)).collect();
        let label: f64 = row
            .iter()
            .enumerate()
            .map(|(j, v)| v * (j + 1) as f64 * 0.1)
            .sum::<f64>()
            + rng.gen_range(-0.1..0.1);
        rows.push(row);
        labels.push(label);
    }

    SampleStore::from_rows(rows, labels).unwrap()
}

/// Random features in [-3, 3) labelled 1 when the alternating sum is
/// positive.
pub fn create_binary_store(num_samples: usize, num_features: usize, seed: u64) -> SampleStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(num_samples);
    let mut labels = Vec::with_capacity(num_samples);

    for _ in 0..num_samples {
        let row: Vec<f64> = (0..num_features).map(|_| rng.gen_range(-3.0..3.0)).collect();
        let score: f64 = row
            .iter()
            .enumerate()
            .map(|(j, v)| if j % 2 == 0 { *v } else { -*v })
            .sum();
        rows.push(row);
        labels.push(if score > 0.0 { 1.0 } else { 0.0 });
    }

    SampleStore::from_rows(rows, labels).unwrap()
}

/// Rows `(label, value)` of the four-sample single-feature scenario.
pub fn scenario_rows() -> Vec<(f64, f64)> {
    vec![(1.0, 0.1), (1.0, 0.2), (0.0, 0.8), (0.0, 0.9)]
}

/// Write `store` as a dense sample file.
pub fn write_dense_file<P: AsRef<Path>>(path: P, store: &SampleStore) -> std::io::Result<()> {
    let mut content = String::new();
    for (row, label) in store.features().iter().zip(store.labels()) {
        content.push_str(&label.to_string());
        for v in row.iter() {
            content.push(' ');
            content.push_str(&v.to_string());
        }
        content.push('\n');
    }
    fs::write(path, content)
}
