// src/spaces.rs
// =============================================================================
// Finds archived collections in a saved space listing.
//
// The wiki's /rest/api/space endpoint returns
//   { "results": [ { "key": "DR", "status": "archived", ... }, ... ] }
// and pages in archived spaces should be left out of the report. This module
// reads such a document and returns the keys to add to the denylist.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

const ARCHIVED_STATUS: &str = "archived";

#[derive(Debug, Default, Deserialize)]
struct SpaceListing {
    #[serde(default)]
    results: Vec<Space>,
}

#[derive(Debug, Deserialize)]
struct Space {
    key: Option<String>,
    status: Option<String>,
}

/// Keys of archived spaces, in document order
pub fn archived_space_keys(json: &str) -> Result<Vec<String>> {
    let listing: SpaceListing =
        serde_json::from_str(json).context("space listing is not valid JSON")?;

    Ok(listing
        .results
        .into_iter()
        .filter(|space| space.status.as_deref() == Some(ARCHIVED_STATUS))
        .filter_map(|space| space.key)
        .collect())
}

pub fn archived_space_keys_from_file(path: &Path) -> Result<Vec<String>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("could not read space listing {}", path.display()))?;
    archived_space_keys(&json)
}
