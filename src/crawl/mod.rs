// src/crawl/mod.rs
// =============================================================================
// This module discovers every page an anonymous visitor can list.
//
// Submodules:
// - record: serde shapes of the content API's JSON
// - pages: the cursor-following pagination loop
// - error: fatal crawl errors and their diagnostic buckets
//
// Pagination is inherently serial (each page's cursor comes from the previous
// response), so nothing in here runs concurrently.
// =============================================================================

mod error;
mod pages;
mod record;

pub use error::{CrawlError, ErrorKind};
pub use pages::PageCrawler;
pub use record::RawRecord;
