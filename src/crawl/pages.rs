// src/crawl/pages.rs
// =============================================================================
// Anonymous, cursor-following crawl of the content-listing endpoint.
//
// How it works:
// 1. GET the start URL with the type/expand query parameters
// 2. Append the page's `results` to the accumulator
// 3. If the page has a `_links.next`, append it to the base URL and GET that
// 4. Stop when a page has no `next` link
//
// Continuation links already carry every query parameter, so the initial
// parameters are sent on the first request only. Any failure ends the crawl
// with an error and no partial results. There are no retries.
// =============================================================================

use reqwest::Client;
use tracing::{debug, info};

use super::error::CrawlError;
use super::record::{ContentPage, RawRecord};
use crate::config::CrawlConfig;

// Query parameters sent with the first request only
const INITIAL_PARAMS: [(&str, &str); 2] = [
    ("type", "page"),
    ("expand", "history.lastUpdated,history.createdBy"),
];

// Where the pagination loop is
#[derive(Debug, Clone, PartialEq, Eq)]
enum CrawlState {
    Fetching { url: String, first: bool },
    Done,
}

/// Walks every result page an anonymous caller can see
pub struct PageCrawler {
    client: Client,
    config: CrawlConfig,
}

impl PageCrawler {
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        // No cookie store, no credentials: the server sees an anonymous visitor
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(CrawlError::Client)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Fetches all pages in server order and returns their records
    pub async fn fetch_all(&self) -> Result<Vec<RawRecord>, CrawlError> {
        let start_url = self.config.start_url();
        info!(url = %start_url, "starting anonymous scan");

        let mut records = Vec::new();
        let mut pages_fetched = 0usize;
        let mut state = CrawlState::Fetching {
            url: start_url,
            first: true,
        };

        while let CrawlState::Fetching { url, first } = state {
            if let Some(limit) = self.config.max_pages {
                if pages_fetched >= limit {
                    return Err(CrawlError::PageLimit { limit });
                }
            }

            let page = self.fetch_page(&url, first).await?;
            pages_fetched += 1;

            if page.results.is_empty() {
                info!(page = pages_fetched, "no results on this page");
            } else {
                info!(
                    page = pages_fetched,
                    items = page.results.len(),
                    "fetched page"
                );
                records.extend(page.results);
            }

            state = match page.links.next {
                Some(next) => CrawlState::Fetching {
                    url: self.resolve(&next),
                    first: false,
                },
                None => CrawlState::Done,
            };
        }

        info!(
            pages = pages_fetched,
            items = records.len(),
            "finished fetching"
        );
        Ok(records)
    }

    // Issues one GET and decodes the envelope
    async fn fetch_page(&self, url: &str, first: bool) -> Result<ContentPage, CrawlError> {
        debug!(url, first, "requesting page");

        let mut request = self.client.get(url);
        if first {
            request = request.query(&INITIAL_PARAMS);
        }

        let response = request.send().await.map_err(|source| CrawlError::Connect {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<ContentPage>()
            .await
            .map_err(|source| CrawlError::Format {
                url: url.to_string(),
                source,
            })
    }

    // Continuation links are relative to the site root, which may include a
    // context path ("/portal"), so they are appended rather than URL-joined.
    fn resolve(&self, next: &str) -> String {
        format!("{}{}", self.config.base_url, next)
    }
}
