// src/report/writer.rs
// =============================================================================
// Ranked CSV report output.
//
// Rows are sorted by view count, highest first, so the most visited pages
// top the archiving review. The sort is stable.
// =============================================================================

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::error;

use super::classify::ClassifiedPage;

/// Header row of the report; the verifier checks the first two cells.
pub const REPORT_HEADER: [&str; 6] = [
    "Page Title",
    "Page URL",
    "Creator",
    "Last Modifier",
    "View Count",
    "Last Modified 6+ Years Ago?",
];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not write to {path}: permission denied")]
    PermissionDenied { path: PathBuf },

    #[error("failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Sorts pages by view count descending; equal counts keep their order
pub fn rank_pages(pages: &mut [ClassifiedPage]) {
    pages.sort_by(|a, b| b.view_count.cmp(&a.view_count));
}

/// Ranks the pages and writes the report file
pub fn write_report(mut pages: Vec<ClassifiedPage>, path: &Path) -> Result<(), ReportError> {
    rank_pages(&mut pages);

    let result = std::fs::File::create(path)
        .map_err(csv::Error::from)
        .and_then(|file| write_rows(&pages, file));

    result.map_err(|source| {
        let permission_denied = matches!(
            source.kind(),
            csv::ErrorKind::Io(e) if e.kind() == io::ErrorKind::PermissionDenied
        );
        if permission_denied {
            error!(
                path = %path.display(),
                "could not write report; is the file open in another program, or is the folder read-only?"
            );
            ReportError::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else {
            error!(path = %path.display(), %source, "unexpected error while writing the report");
            ReportError::Write {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Writes header and rows in the given order
pub fn write_rows<W: Write>(pages: &[ClassifiedPage], out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(REPORT_HEADER)?;

    for page in pages {
        let views = page.view_count.to_string();
        let archive_status = if page.archivable { "Yes" } else { "" };
        writer.write_record([
            page.title.as_str(),
            page.url.as_str(),
            page.creator.as_str(),
            page.last_modifier.as_str(),
            views.as_str(),
            archive_status,
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str, views: u64, archivable: bool) -> ClassifiedPage {
        ClassifiedPage {
            title: title.to_string(),
            url: format!("https://wiki.example.org/{title}"),
            creator: "Ada".to_string(),
            last_modifier: "Grace".to_string(),
            archivable,
            view_count: views,
        }
    }

    #[test]
    fn test_rank_is_descending_and_stable() {
        let mut pages = vec![
            page("low", 1, false),
            page("tie-first", 5, false),
            page("high", 9, false),
            page("tie-second", 5, false),
        ];
        rank_pages(&mut pages);

        let titles: Vec<_> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["high", "tie-first", "tie-second", "low"]);
        assert!(pages.windows(2).all(|w| w[0].view_count >= w[1].view_count));
    }

    #[test]
    fn test_rows_render_archive_flag() {
        let mut out = Vec::new();
        write_rows(&[page("Old", 3, true), page("New", 2, false)], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Page Title,Page URL,Creator,Last Modifier,View Count,Last Modified 6+ Years Ago?"
        );
        assert_eq!(lines[1], "Old,https://wiki.example.org/Old,Ada,Grace,3,Yes");
        assert_eq!(lines[2], "New,https://wiki.example.org/New,Ada,Grace,2,");
    }

    #[test]
    fn test_titles_with_commas_are_quoted() {
        let mut out = Vec::new();
        write_rows(&[page("Budget, 2019", 1, false)], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"Budget, 2019\""));
    }

    #[test]
    fn test_write_report_sorts_into_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        write_report(vec![page("A", 1, false), page("B", 7, true)], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("B,"));
        assert!(lines[2].starts_with("A,"));
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("report.csv");
        assert!(write_report(vec![page("A", 1, false)], &path).is_err());
    }
}
