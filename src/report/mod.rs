// src/report/mod.rs
// =============================================================================
// This module turns crawl output into the ranked archiving report.
//
// Submodules:
// - counts: page title -> view count index from the analytics export
// - classify: filtering, joining and archive flagging of raw records
// - writer: view-count ranking and CSV serialization
// =============================================================================

mod classify;
mod counts;
mod writer;

pub use classify::Classifier;
pub use counts::PageCountIndex;
pub use writer::{write_report, REPORT_HEADER};
