// src/crawl/record.rs
// =============================================================================
// Shapes of the JSON returned by the content-listing endpoint.
//
// Every nested field is an Option: anonymous listings routinely omit history
// blocks or user details, and the classifier decides per field what a gap
// means. Only the envelope itself must be well formed.
// =============================================================================

use serde::Deserialize;

/// One page of results from `/rest/api/content`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentPage {
    #[serde(default)]
    pub results: Vec<RawRecord>,
    #[serde(rename = "_links", default)]
    pub links: PageLinks,
}

/// Pagination links of a result page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    /// Relative continuation link, absent on the last page
    pub next: Option<String>,
}

/// One content item exactly as the API reported it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    #[serde(rename = "_links", default)]
    pub links: RecordLinks,
    #[serde(rename = "_expandable", default)]
    pub expandable: Expandable,
    pub history: Option<History>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordLinks {
    /// Page path relative to the base URL, e.g. "/display/SYS/Home"
    pub webui: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Expandable {
    /// Collection reference such as "/rest/api/space/SYSTEMS"
    pub space: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    pub created_by: Option<User>,
    pub last_updated: Option<LastUpdated>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LastUpdated {
    pub by: Option<User>,
    /// ISO-8601 timestamp, e.g. "2018-05-15T14:42:15.839Z"
    pub when: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub display_name: Option<String>,
}

impl RawRecord {
    /// Collection key: the last path segment of the collection reference
    pub fn space_key(&self) -> Option<&str> {
        self.expandable
            .space
            .as_deref()
            .and_then(|space| space.rsplit('/').next())
    }

    pub fn creator_name(&self) -> Option<&str> {
        self.history
            .as_ref()?
            .created_by
            .as_ref()?
            .display_name
            .as_deref()
    }

    pub fn last_modifier_name(&self) -> Option<&str> {
        self.history
            .as_ref()?
            .last_updated
            .as_ref()?
            .by
            .as_ref()?
            .display_name
            .as_deref()
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.history
            .as_ref()?
            .last_updated
            .as_ref()?
            .when
            .as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record_parses() {
        let value = json!({
            "title": "Home",
            "type": "page",
            "_links": { "webui": "/display/SYS/Home" },
            "_expandable": { "space": "/rest/api/space/SYS" },
            "history": {
                "createdBy": { "displayName": "Ada" },
                "lastUpdated": { "by": { "displayName": "Grace" }, "when": "2018-05-15T14:42:15.839Z" }
            }
        });
        let record: RawRecord = serde_json::from_value(value).unwrap();

        assert_eq!(record.title.as_deref(), Some("Home"));
        assert_eq!(record.content_type.as_deref(), Some("page"));
        assert_eq!(record.space_key(), Some("SYS"));
        assert_eq!(record.creator_name(), Some("Ada"));
        assert_eq!(record.last_modifier_name(), Some("Grace"));
        assert_eq!(record.last_modified(), Some("2018-05-15T14:42:15.839Z"));
    }

    #[test]
    fn test_sparse_record_parses() {
        let record: RawRecord = serde_json::from_value(json!({ "title": "Lonely" })).unwrap();
        assert_eq!(record.space_key(), None);
        assert_eq!(record.creator_name(), None);
        assert_eq!(record.last_modifier_name(), None);
        assert_eq!(record.last_modified(), None);
    }

    #[test]
    fn test_history_without_user_details() {
        let record: RawRecord = serde_json::from_value(json!({
            "history": { "lastUpdated": { "when": "2020-01-01T00:00:00Z" } }
        }))
        .unwrap();
        assert_eq!(record.last_modifier_name(), None);
        assert_eq!(record.last_modified(), Some("2020-01-01T00:00:00Z"));
    }

    #[test]
    fn test_page_without_next_link() {
        let page: ContentPage = serde_json::from_value(json!({ "results": [] })).unwrap();
        assert!(page.results.is_empty());
        assert!(page.links.next.is_none());
    }
}
