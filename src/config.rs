// src/config.rs
// =============================================================================
// Immutable configuration values handed to each component when it is built.
//
// The CLI layer parses arguments, then this module validates them and turns
// them into plain structs. Nothing here is global: the crawler, classifier
// and verifier each receive the piece they need.
// =============================================================================

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::sync::Semaphore;
use tracing::info;
use url::Url;

use crate::cli::{ScanArgs, VerifyArgs};
use crate::spaces::archived_space_keys_from_file;

/// Wiki site scanned when `--base-url` is not given.
pub const DEFAULT_BASE_URL: &str = "https://usmai.org/portal";

/// Content-listing endpoint, relative to the base URL.
pub const API_START_ENDPOINT: &str = "/rest/api/content";

pub const DEFAULT_REPORT_FILE: &str = "non_archived_public_pages.csv";
pub const DEFAULT_PAGE_COUNTS_FILE: &str = "PageCountViews.csv";

/// Collections already archived on the wiki; their pages never reach the report.
pub const DEFAULT_ARCHIVED_SPACES: &[&str] = &["COV19", "DR", "NEXTILS"];

/// Pages last modified in or before this year are archive candidates.
pub const DEFAULT_ARCHIVE_THRESHOLD_YEAR: i32 = 2019;

pub const DEFAULT_SAMPLE_FRACTION: f64 = 0.1;
pub const DEFAULT_MAX_CONCURRENT_PROBES: usize = 5;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CRAWL_TIMEOUT_SECS: u64 = 30;
pub const PROBE_USER_AGENT: &str = "Public-Page-Verifier/1.0";

// Settings for the paginated crawler
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Base URL without a trailing slash, e.g. "https://wiki.example.org/portal"
    pub base_url: String,
    /// Endpoint appended to the base URL for the first request
    pub start_endpoint: String,
    /// Optional safety bound on the number of pages fetched
    pub max_pages: Option<usize>,
    pub timeout: Duration,
}

impl CrawlConfig {
    pub fn start_url(&self) -> String {
        format!("{}{}", self.base_url, self.start_endpoint)
    }
}

// Settings for the record classifier
#[derive(Debug, Clone)]
pub struct ClassifyRules {
    pub base_url: String,
    pub archive_threshold_year: i32,
    pub archived_spaces: HashSet<String>,
}

// Everything the `scan` command needs
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub crawl: CrawlConfig,
    pub rules: ClassifyRules,
    pub page_counts_path: PathBuf,
    pub output_path: PathBuf,
}

// Settings for the sampling verifier
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    pub input_path: PathBuf,
    /// Share of report rows to probe, in (0, 1]
    pub sample_fraction: f64,
    /// Upper bound on probes in flight at once
    pub max_concurrent: usize,
    pub timeout: Duration,
    pub user_agent: String,
    /// Fixed seed for a reproducible sample
    pub seed: Option<u64>,
}

impl ScanConfig {
    /// Validates `scan` arguments and resolves the archived-space denylist.
    ///
    /// Explicit `--archived-space` keys replace the built-in list; keys from
    /// `--spaces-json` are added on top of whichever list is in effect.
    pub fn from_args(args: ScanArgs) -> Result<Self> {
        let base_url = normalize_base_url(&args.base_url)?;

        let mut archived_spaces: HashSet<String> = if args.archived_spaces.is_empty() {
            DEFAULT_ARCHIVED_SPACES.iter().map(|s| s.to_string()).collect()
        } else {
            args.archived_spaces.into_iter().collect()
        };
        if let Some(path) = &args.spaces_json {
            let keys = archived_space_keys_from_file(path)?;
            info!(count = keys.len(), file = %path.display(), "loaded archived spaces");
            archived_spaces.extend(keys);
        }

        Ok(Self {
            crawl: CrawlConfig {
                base_url: base_url.clone(),
                start_endpoint: args.endpoint,
                max_pages: args.max_pages,
                timeout: Duration::from_secs(args.timeout_secs),
            },
            rules: ClassifyRules {
                base_url,
                archive_threshold_year: args.archive_year,
                archived_spaces,
            },
            page_counts_path: args.page_counts,
            output_path: args.output,
        })
    }
}

impl VerifyConfig {
    pub fn from_args(args: &VerifyArgs) -> Result<Self> {
        Ok(Self {
            input_path: args.input.clone(),
            sample_fraction: validate_fraction(args.fraction)?,
            max_concurrent: validate_concurrency(args.max_concurrent)?,
            timeout: Duration::from_secs(args.timeout_secs),
            user_agent: PROBE_USER_AGENT.to_string(),
            seed: args.seed,
        })
    }
}

/// Checks the base URL and strips any trailing slash so that relative links
/// from the API can be appended without producing `//`.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    if !raw.starts_with("http") {
        bail!(
            "base URL '{}' seems invalid: it must start with 'http://' or 'https://'",
            raw
        );
    }
    if let Err(e) = Url::parse(raw) {
        bail!("base URL '{}' is not a valid URL: {}", raw, e);
    }
    Ok(raw.trim_end_matches('/').to_string())
}

pub fn validate_fraction(fraction: f64) -> Result<f64> {
    if !(fraction > 0.0 && fraction <= 1.0) {
        bail!("sample fraction must be in (0, 1], got {}", fraction);
    }
    Ok(fraction)
}

pub fn validate_concurrency(limit: usize) -> Result<usize> {
    if limit == 0 {
        bail!("max concurrent requests must be at least 1");
    }
    if limit > Semaphore::MAX_PERMITS {
        bail!(
            "max concurrent requests must be at most {}, got {}",
            Semaphore::MAX_PERMITS,
            limit
        );
    }
    Ok(limit)
}
