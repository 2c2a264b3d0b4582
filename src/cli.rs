// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Three subcommands:
// - scan: crawl the wiki anonymously and write the ranked report
// - verify: re-check a random sample of the report's links
// - archived-spaces: list archived space keys from a saved space listing
//
// Every default mirrors a constant in config.rs.
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    API_START_ENDPOINT, DEFAULT_ARCHIVE_THRESHOLD_YEAR, DEFAULT_BASE_URL,
    DEFAULT_CRAWL_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENT_PROBES, DEFAULT_PAGE_COUNTS_FILE,
    DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_REPORT_FILE, DEFAULT_SAMPLE_FRACTION,
};

#[derive(Parser, Debug)]
#[command(
    name = "public-page-finder",
    version = "0.1.0",
    about = "Find wiki pages visible to anonymous visitors and flag archive candidates",
    long_about = "public-page-finder lists every page the wiki's content API shows to an \
                  anonymous visitor, ranks them by traffic, and marks pages untouched since \
                  a threshold year. The verify command spot-checks that reported links still \
                  load without logging in."
)]
pub struct Cli {
    /// Log debug output (RUST_LOG overrides this)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the wiki anonymously and write the public page report
    ///
    /// Example: public-page-finder scan --base-url https://wiki.example.org
    Scan(ScanArgs),

    /// Re-check that a random sample of report links is still public
    ///
    /// Example: public-page-finder verify --fraction 0.25
    Verify(VerifyArgs),

    /// Print the keys of archived spaces found in a space listing JSON file
    ArchivedSpaces {
        /// Saved response of the /rest/api/space endpoint
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Full base URL of the wiki, including any context path
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Content-listing endpoint, relative to the base URL
    #[arg(long, default_value = API_START_ENDPOINT)]
    pub endpoint: String,

    /// Where to write the report
    #[arg(long, short, default_value = DEFAULT_REPORT_FILE)]
    pub output: PathBuf,

    /// Merged view-count export (title in column 2, views in column 9)
    #[arg(long, default_value = DEFAULT_PAGE_COUNTS_FILE)]
    pub page_counts: PathBuf,

    /// Pages last modified in or before this year are archive candidates
    #[arg(long, default_value_t = DEFAULT_ARCHIVE_THRESHOLD_YEAR)]
    pub archive_year: i32,

    /// Space key to leave out of the report (repeatable; replaces the defaults)
    #[arg(long = "archived-space", value_name = "KEY")]
    pub archived_spaces: Vec<String>,

    /// Also leave out every space marked archived in this space listing
    #[arg(long, value_name = "FILE")]
    pub spaces_json: Option<PathBuf>,

    /// Give up after this many result pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_CRAWL_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Report written by the scan command
    #[arg(long, short, default_value = DEFAULT_REPORT_FILE)]
    pub input: PathBuf,

    /// Share of links to check, e.g. 0.1 for 10%
    #[arg(long, default_value_t = DEFAULT_SAMPLE_FRACTION)]
    pub fraction: f64,

    /// How many requests may run at the same time
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT_PROBES)]
    pub max_concurrent: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Seed for a reproducible sample
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output results in JSON format instead of a report
    #[arg(long)]
    pub json: bool,
}
