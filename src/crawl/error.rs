// src/crawl/error.rs
// =============================================================================
// Errors that abort a crawl.
//
// Every variant is fatal: the crawler never returns partial results. The
// ErrorKind split only chooses which diagnostic the caller sees.
// =============================================================================

use thiserror::Error;

/// Why a crawl stopped.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The request never produced a response (DNS, refused connection, timeout).
    #[error("could not reach {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not the JSON envelope we expect.
    #[error("unexpected response format from {url}: {source}")]
    Format {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The configured page bound was hit before the cursor ran out.
    #[error("stopped after {limit} pages without reaching the last page")]
    PageLimit { limit: usize },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Diagnostic bucket for a [`CrawlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Server,
    Other,
}

impl CrawlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CrawlError::Status { status: 404, .. } => ErrorKind::NotFound,
            CrawlError::Status { status, .. } if *status >= 500 => ErrorKind::Server,
            _ => ErrorKind::Other,
        }
    }

    /// One line of advice to print next to the error.
    pub fn guidance(&self, endpoint: &str, base_url: &str) -> String {
        match (self, self.kind()) {
            (_, ErrorKind::NotFound) => {
                format!("the API endpoint returned 404; is the endpoint ('{endpoint}') correct?")
            }
            (CrawlError::Status { status, .. }, ErrorKind::Server) => format!(
                "the server returned {status}; the site may be down, try again later"
            ),
            (CrawlError::Connect { .. }, _) => format!(
                "could not connect to {base_url}; check the base URL and your internet connection"
            ),
            (CrawlError::Format { .. }, _) => {
                "the API may have changed or the URL is incorrect".to_string()
            }
            (CrawlError::PageLimit { .. }, _) => {
                "raise --max-pages if the site really has this many pages".to_string()
            }
            _ => "check the endpoint URL".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> CrawlError {
        CrawlError::Status {
            url: "https://wiki.example.org/rest/api/content".to_string(),
            status: code,
        }
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(status(404).kind(), ErrorKind::NotFound);
        assert_eq!(status(500).kind(), ErrorKind::Server);
        assert_eq!(status(503).kind(), ErrorKind::Server);
        assert_eq!(status(403).kind(), ErrorKind::Other);
        assert_eq!(CrawlError::PageLimit { limit: 3 }.kind(), ErrorKind::Other);
    }

    #[test]
    fn test_guidance_mentions_endpoint_on_404() {
        let advice = status(404).guidance("/rest/api/content", "https://wiki.example.org");
        assert!(advice.contains("/rest/api/content"));
    }

    #[test]
    fn test_guidance_mentions_status_on_server_error() {
        let advice = status(502).guidance("/rest/api/content", "https://wiki.example.org");
        assert!(advice.contains("502"));
    }
}
