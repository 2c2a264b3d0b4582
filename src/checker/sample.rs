// src/checker/sample.rs
// =============================================================================
// Loads a previously written report and picks the rows to re-check.
//
// - Only the first two columns (title, URL) matter here
// - A header that doesn't start with "Page Title","Page URL" is only a warning
// - Sample size is floor(total * fraction), but at least 1 when rows exist
// - The draw is uniform and without replacement
// =============================================================================

use std::io::Read;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::warn;

use crate::report::REPORT_HEADER;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not find the file '{path}'; run the scan command first")]
    NotFound { path: PathBuf },

    #[error("CSV file '{path}' is empty")]
    Empty { path: PathBuf },

    #[error("failed to read CSV file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Title and URL of one report row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub title: String,
    pub url: String,
}

pub fn load_report(path: &Path) -> Result<Vec<ReportRow>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Read {
                path: path.to_path_buf(),
                source: e.into(),
            }
        }
    })?;

    read_rows(file).map_err(|e| match e {
        ReadFailure::Empty => LoadError::Empty {
            path: path.to_path_buf(),
        },
        ReadFailure::Csv(source) => LoadError::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}

#[derive(Debug)]
enum ReadFailure {
    Empty,
    Csv(csv::Error),
}

impl From<csv::Error> for ReadFailure {
    fn from(e: csv::Error) -> Self {
        ReadFailure::Csv(e)
    }
}

fn read_rows<R: Read>(input: R) -> Result<Vec<ReportRow>, ReadFailure> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut records = reader.records();

    let header = records.next().ok_or(ReadFailure::Empty)??;
    let leading: Vec<&str> = header.iter().take(2).collect();
    if leading != REPORT_HEADER[..2] {
        warn!(header = ?header.iter().collect::<Vec<_>>(), "unexpected CSV headers");
    }

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        match (record.get(0), record.get(1)) {
            (Some(title), Some(url)) => rows.push(ReportRow {
                title: title.to_string(),
                url: url.to_string(),
            }),
            _ => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                warn!(line, "skipping row without a title and URL");
            }
        }
    }

    Ok(rows)
}

/// How many rows to check: floor(total * fraction), at least 1 when
/// there is anything to check, never more than `total`
pub fn sample_size(total: usize, fraction: f64) -> usize {
    if total == 0 {
        return 0;
    }
    let size = (total as f64 * fraction).floor() as usize;
    size.clamp(1, total)
}

/// Picks `size` distinct rows uniformly at random
pub fn draw_sample<R: Rng + ?Sized>(rows: &[ReportRow], size: usize, rng: &mut R) -> Vec<ReportRow> {
    rows.choose_multiple(rng, size).cloned().collect()
}
