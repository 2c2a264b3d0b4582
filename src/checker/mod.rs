// src/checker/mod.rs
// =============================================================================
// This module re-verifies a random sample of report links.
//
// Submodules:
// - sample: loads the report and draws the rows to check
// - http: anonymous HEAD probes run concurrently behind a counting gate
//
// The scan and the verification are separate runs; the only thing they share
// is the report file on disk.
// =============================================================================

mod http;
mod sample;

pub use http::{verify_links, VerificationSummary};
pub use sample::{draw_sample, load_report, sample_size, LoadError};
