// src/checker/http.rs
// =============================================================================
// This module re-checks that sampled report links are still public.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - No cookie store and a fixed User-Agent, so we look like an anonymous visitor
// - Exactly 200 is a PASS; any other status or a network error is a FAIL
// - Every sampled link is its own task, but a shared Semaphore caps how many
//   requests are in flight at once
//
// Rust concepts:
// - tokio::sync::Semaphore: a counting gate shared by all tasks
// - JoinSet: spawn many tasks, collect results in completion order
// - RAII permits: dropping the permit releases the gate, even on failure
// =============================================================================

use std::future::Future;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use super::sample::ReportRow;
use crate::config::VerifyConfig;

/// Outcome tag of one probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Pass,
    Fail,
}

/// Result of re-checking a single link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub outcome: Outcome,
    pub title: String,
    pub url: String,
    /// Why the link failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl VerificationResult {
    pub fn pass(row: ReportRow) -> Self {
        Self {
            outcome: Outcome::Pass,
            title: row.title,
            url: row.url,
            reason: None,
        }
    }

    pub fn fail(row: ReportRow, reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail,
            title: row.title,
            url: row.url,
            reason: Some(reason.into()),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.outcome == Outcome::Pass
    }
}

/// Passed and failed probes, each in completion order
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationSummary {
    pub passed: Vec<VerificationResult>,
    pub failed: Vec<VerificationResult>,
}

impl VerificationSummary {
    pub fn record(&mut self, result: VerificationResult) {
        if result.is_pass() {
            self.passed.push(result);
        } else {
            self.failed.push(result);
        }
    }

    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }
}

/// Builds the anonymous probe client
pub fn probe_client(config: &VerifyConfig) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

/// Probes every row, never more than `config.max_concurrent` at once
pub async fn verify_links(
    rows: Vec<ReportRow>,
    config: &VerifyConfig,
) -> reqwest::Result<VerificationSummary> {
    let client = probe_client(config)?;
    info!(
        links = rows.len(),
        workers = config.max_concurrent,
        "starting verification"
    );

    let summary = run_gated(rows, config.max_concurrent, move |row| {
        let client = client.clone();
        async move { probe_link(&client, row).await }
    })
    .await;

    Ok(summary)
}

/// Spawns one task per row and gates `probe` behind a shared semaphore.
///
/// The number of spawned tasks is not limited; only the permits are. A task
/// holds its permit for the duration of the probe and drops it on return.
/// A check that panics is recorded as a FAIL for its row.
pub async fn run_gated<F, Fut>(rows: Vec<ReportRow>, max_in_flight: usize, probe: F) -> VerificationSummary
where
    F: Fn(ReportRow) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = VerificationResult> + Send + 'static,
{
    let gate = Arc::new(Semaphore::new(max_in_flight.clamp(1, Semaphore::MAX_PERMITS)));
    let probe = Arc::new(probe);
    let mut tasks = JoinSet::new();

    for row in rows {
        let gate = Arc::clone(&gate);
        let probe = Arc::clone(&probe);
        tasks.spawn(async move {
            let _permit = match gate.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return VerificationResult::fail(row, "Error: concurrency gate closed"),
            };
            // The row stays here so a crashed check still gets a result
            match tokio::spawn((*probe)(row.clone())).await {
                Ok(result) => result,
                Err(e) => VerificationResult::fail(row, format!("Error: check did not complete: {e}")),
            }
        });
    }

    let mut summary = VerificationSummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => summary.record(result),
            Err(e) => error!(error = %e, "verification task did not complete"),
        }
    }
    summary
}

/// Checks a single link with a HEAD request
pub async fn probe_link(client: &Client, row: ReportRow) -> VerificationResult {
    match client.head(&row.url).send().await {
        Ok(response) => analyze_status(row, response.status()),
        Err(e) => categorize_error(row, e),
    }
}

fn analyze_status(row: ReportRow, status: StatusCode) -> VerificationResult {
    if status == StatusCode::OK {
        info!(title = %row.title, "[PASS]");
        VerificationResult::pass(row)
    } else {
        warn!(title = %row.title, status = status.as_u16(), "[FAIL]");
        VerificationResult::fail(row, format!("Error: Status code {}", status.as_u16()))
    }
}

// Connection errors, timeouts and the like
fn categorize_error(row: ReportRow, error: reqwest::Error) -> VerificationResult {
    let reason = if error.is_timeout() {
        format!("Error: Request timed out: {error}")
    } else if error.is_connect() {
        format!("Error: Connection failed: {error}")
    } else {
        format!("Error: Request error: {error}")
    };

    warn!(title = %row.title, %reason, "[FAIL]");
    VerificationResult::fail(row, reason)
}
