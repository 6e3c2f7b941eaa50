//! Dense whitespace-separated sample format.

use super::{parse_number, SampleLoader};
use crate::core::error::{DTreeError, Result};
use crate::core::types::{Label, SampleFormat};
use crate::dataset::SampleStore;
use std::io::BufRead;

/// Loader for `<label> <v1> ... <vm>` lines.
///
/// The label token `+1`/`1` maps to 1 and `-1`/`0` maps to 0; any other
/// token is read as a float regression target.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenseLoader;

impl DenseLoader {
    fn parse_label(token: &str, line: usize) -> Result<Label> {
        match token {
            "+1" | "1" => Ok(1.0),
            "-1" | "0" => Ok(0.0),
            other => parse_number(other, line),
        }
    }
}

impl SampleLoader for DenseLoader {
    fn parse<R: BufRead>(&self, reader: R) -> Result<SampleStore> {
        let mut store = SampleStore::new();
        let mut width: Option<usize> = None;

        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line?;
            let mut tokens = line.split_ascii_whitespace();
            let label = match tokens.next() {
                Some(token) => Self::parse_label(token, line_no)?,
                None => continue,
            };

            let x = tokens
                .map(|t| parse_number(t, line_no))
                .collect::<Result<Vec<f64>>>()?;

            match width {
                None => width = Some(x.len()),
                Some(m) if m != x.len() => {
                    return Err(DTreeError::data_format(
                        line_no,
                        format!("expected {} features, got {}", m, x.len()),
                    ))
                }
                Some(_) => {}
            }

            store.append(x, label)?;
        }

        Ok(store)
    }

    fn format(&self) -> SampleFormat {
        SampleFormat::Dense
    }
}
