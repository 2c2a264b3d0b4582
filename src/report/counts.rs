// src/report/counts.rs
// =============================================================================
// Page title -> view count lookup, built from the merged analytics export.
//
// The export is a CSV with an index column in front, so the title sits in
// column 1 and the view count in column 8. The header row is recognised by
// its count cell reading "Views". Titles not in the index have 0 views.
// =============================================================================

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

const TITLE_COLUMN: usize = 1;
const VIEWS_COLUMN: usize = 8;
const HEADER_MARKER: &str = "Views";

#[derive(Debug, Error)]
pub enum CountsError {
    #[error("could not open page counts file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read page counts: {0}")]
    Read(#[from] csv::Error),

    #[error("malformed page counts row at line {line}: {reason}")]
    Malformed { line: u64, reason: String },
}

/// Read-only map from page title to view count
#[derive(Debug, Clone, Default)]
pub struct PageCountIndex {
    views: HashMap<String, u64>,
}

impl PageCountIndex {
    pub fn from_path(path: &Path) -> Result<Self, CountsError> {
        let file = File::open(path).map_err(|source| CountsError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(input: R) -> Result<Self, CountsError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);
        let mut views = HashMap::new();

        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();

            let count_cell = row.get(VIEWS_COLUMN).ok_or_else(|| CountsError::Malformed {
                line,
                reason: format!("expected at least {} columns, found {}", VIEWS_COLUMN + 1, row.len()),
            })?;

            if count_cell == HEADER_MARKER {
                continue;
            }

            let count: u64 = count_cell.trim().parse().map_err(|_| CountsError::Malformed {
                line,
                reason: format!("view count '{count_cell}' is not a non-negative integer"),
            })?;

            // Duplicate titles: the later row wins
            let title = row.get(TITLE_COLUMN).unwrap_or_default();
            views.insert(title.to_string(), count);
        }

        debug!(titles = views.len(), "loaded page counts");
        Ok(Self { views })
    }

    /// View count for a title, 0 when the title is unknown
    pub fn views(&self, title: &str) -> u64 {
        self.views.get(title).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for PageCountIndex {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self {
            views: iter.into_iter().map(|(t, v)| (t.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXPORT: &str = "\
,Page Title,Space,Type,Created,Updated,Creator,Editor,Views
0,Home,SYS,page,a,b,c,d,120
1,\"Policies, 2019\",SYS,page,a,b,c,d,7
2,Home,SYS,page,a,b,c,d,130
";

    #[test]
    fn test_header_skipped_and_counts_loaded() {
        let index = PageCountIndex::from_reader(EXPORT.as_bytes()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.views("Policies, 2019"), 7);
    }

    #[test]
    fn test_duplicate_title_last_write_wins() {
        let index = PageCountIndex::from_reader(EXPORT.as_bytes()).unwrap();
        assert_eq!(index.views("Home"), 130);
    }

    #[test]
    fn test_unknown_title_has_zero_views() {
        let index = PageCountIndex::from_reader(EXPORT.as_bytes()).unwrap();
        assert_eq!(index.views("Nowhere"), 0);
        assert_eq!(PageCountIndex::default().views("Anything"), 0);
    }

    #[test]
    fn test_non_numeric_count_is_malformed() {
        let input = "0,Home,SYS,page,a,b,c,d,lots\n";
        let err = PageCountIndex::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, CountsError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let input = "0,Home,SYS\n";
        let err = PageCountIndex::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, CountsError::Malformed { .. }));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("PageCountViews.csv");
        let err = PageCountIndex::from_path(&missing).unwrap_err();
        assert!(matches!(err, CountsError::Open { .. }));
        assert!(err.to_string().contains("PageCountViews.csv"));
    }

    #[test]
    fn test_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();
        let index = PageCountIndex::from_path(file.path()).unwrap();
        assert_eq!(index.views("Home"), 130);
    }
}
