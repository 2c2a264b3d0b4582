// src/report/classify.rs
// =============================================================================
// Turns raw API records into report rows.
//
// For each record:
// 1. Drop it if its collection is archived
// 2. Drop it if the title or web link is missing (warn, keep going)
// 3. Join the view count, defaulting to 0
// 4. Read creator/modifier names, defaulting to "Unknown/Anonymous"
// 5. Flag it archivable when last modified in or before the threshold year
//
// A bad record never aborts the batch; a bad date only clears the flag.
// =============================================================================

use tracing::{info, warn};

use super::counts::PageCountIndex;
use crate::config::ClassifyRules;
use crate::crawl::RawRecord;

/// Shown when a creator or modifier name is unavailable
pub const UNKNOWN_USER: &str = "Unknown/Anonymous";

/// One row of the final report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPage {
    pub title: String,
    pub url: String,
    pub creator: String,
    pub last_modifier: String,
    pub archivable: bool,
    pub view_count: u64,
}

pub struct Classifier<'a> {
    rules: &'a ClassifyRules,
    counts: &'a PageCountIndex,
}

impl<'a> Classifier<'a> {
    pub fn new(rules: &'a ClassifyRules, counts: &'a PageCountIndex) -> Self {
        Self { rules, counts }
    }

    /// Classifies every record, preserving input order
    pub fn classify(&self, records: &[RawRecord]) -> Vec<ClassifiedPage> {
        info!(items = records.len(), "processing items, filtering archived spaces");

        let pages: Vec<_> = records
            .iter()
            .filter_map(|record| self.classify_one(record))
            .collect();

        info!(pages = pages.len(), "found non-archived public pages");
        pages
    }

    fn classify_one(&self, record: &RawRecord) -> Option<ClassifiedPage> {
        let Some(space_key) = record.space_key() else {
            warn!(title = ?record.title, "skipping item without a space reference");
            return None;
        };
        if self.rules.archived_spaces.contains(space_key) {
            warn!(space = space_key, title = ?record.title, "skipping item in archived space");
            return None;
        }

        let Some(title) = record.title.as_deref() else {
            warn!(space = space_key, kind = ?record.content_type, "skipping item without a title");
            return None;
        };
        let Some(webui) = record.links.webui.as_deref() else {
            warn!(title, "skipping item without a web link");
            return None;
        };

        let archivable = match last_modified_year(record) {
            Some(year) => year <= self.rules.archive_threshold_year,
            None => {
                warn!(title, "could not determine last-modified date");
                false
            }
        };

        Some(ClassifiedPage {
            title: title.to_string(),
            url: format!("{}{}", self.rules.base_url, webui),
            creator: record.creator_name().unwrap_or(UNKNOWN_USER).to_string(),
            last_modifier: record
                .last_modifier_name()
                .unwrap_or(UNKNOWN_USER)
                .to_string(),
            archivable,
            view_count: self.counts.views(title),
        })
    }
}

// Year prefix of the ISO-8601 last-modified timestamp ("2018-05-15T..." -> 2018)
fn last_modified_year(record: &RawRecord) -> Option<i32> {
    let when = record.last_modified()?;
    when.split('-').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn rules() -> ClassifyRules {
        ClassifyRules {
            base_url: "https://wiki.example.org".to_string(),
            archive_threshold_year: 2019,
            archived_spaces: HashSet::from(["ARCH".to_string()]),
        }
    }

    fn record(value: serde_json::Value) -> RawRecord {
        serde_json::from_value(value).unwrap()
    }

    fn page(title: &str, space: &str, when: Option<&str>) -> RawRecord {
        let mut value = json!({
            "title": title,
            "type": "page",
            "_links": { "webui": format!("/{}", title.to_lowercase()) },
            "_expandable": { "space": format!("/rest/api/space/{space}") }
        });
        if let Some(when) = when {
            value["history"] = json!({
                "createdBy": { "displayName": "Ada" },
                "lastUpdated": { "by": { "displayName": "Grace" }, "when": when }
            });
        }
        record(value)
    }

    #[test]
    fn test_end_to_end_example() {
        let counts: PageCountIndex = [("A", 10), ("B", 3)].into_iter().collect();
        let records = vec![
            page("A", "SYS", Some("2022-03-01T10:00:00.000Z")),
            page("B", "ARCH", Some("2018-01-01T10:00:00.000Z")),
            page("C", "SYS", None),
        ];

        let rules = rules();
        let pages = Classifier::new(&rules, &counts).classify(&records);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].title, "A");
        assert_eq!(pages[0].url, "https://wiki.example.org/a");
        assert!(!pages[0].archivable);
        assert_eq!(pages[0].view_count, 10);

        assert_eq!(pages[1].title, "C");
        assert!(!pages[1].archivable);
        assert_eq!(pages[1].view_count, 0);
        assert_eq!(pages[1].creator, UNKNOWN_USER);
        assert_eq!(pages[1].last_modifier, UNKNOWN_USER);
    }

    #[test]
    fn test_archivable_threshold_is_inclusive() {
        let counts = PageCountIndex::default();
        let rules = rules();
        let classifier = Classifier::new(&rules, &counts);

        let pages = classifier.classify(&[
            page("Old", "SYS", Some("2018-05-15T14:42:15.839Z")),
            page("Edge", "SYS", Some("2019-12-31T23:59:59.000Z")),
            page("New", "SYS", Some("2020-01-01T00:00:00.000Z")),
        ]);

        let flags: Vec<_> = pages.iter().map(|p| p.archivable).collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn test_malformed_date_keeps_record_unflagged() {
        let counts = PageCountIndex::default();
        let rules = rules();
        let pages = Classifier::new(&rules, &counts)
            .classify(&[page("Odd", "SYS", Some("last tuesday"))]);

        assert_eq!(pages.len(), 1);
        assert!(!pages[0].archivable);
        assert_eq!(pages[0].creator, "Ada");
        assert_eq!(pages[0].last_modifier, "Grace");
    }

    #[test]
    fn test_denylisted_space_dropped_even_when_incomplete() {
        let counts = PageCountIndex::default();
        let rules = rules();
        let pages = Classifier::new(&rules, &counts).classify(&[record(json!({
            "_expandable": { "space": "/rest/api/space/ARCH" }
        }))]);
        assert!(pages.is_empty());
    }

    #[test]
    fn test_missing_fields_skip_only_that_record() {
        let counts = PageCountIndex::default();
        let rules = rules();
        let records = vec![
            record(json!({ "title": "No space", "_links": { "webui": "/x" } })),
            record(json!({ "_links": { "webui": "/y" }, "_expandable": { "space": "/rest/api/space/SYS" } })),
            record(json!({ "title": "No link", "_expandable": { "space": "/rest/api/space/SYS" } })),
            page("Fine", "SYS", None),
        ];

        let pages = Classifier::new(&rules, &counts).classify(&records);
        let titles: Vec<_> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Fine"]);
    }

    #[test]
    fn test_item_type_does_not_filter() {
        let counts = PageCountIndex::default();
        let rules = rules();
        let pages = Classifier::new(&rules, &counts).classify(&[record(json!({
            "title": "Post",
            "type": "blogpost",
            "_links": { "webui": "/post" },
            "_expandable": { "space": "/rest/api/space/SYS" }
        }))]);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].url, "https://wiki.example.org/post");
    }

    #[test]
    fn test_partial_history_falls_back_per_field() {
        let counts = PageCountIndex::default();
        let rules = rules();
        let pages = Classifier::new(&rules, &counts).classify(&[record(json!({
            "title": "Half",
            "_links": { "webui": "/half" },
            "_expandable": { "space": "/rest/api/space/SYS" },
            "history": { "createdBy": { "displayName": "Ada" } }
        }))]);

        assert_eq!(pages[0].creator, "Ada");
        assert_eq!(pages[0].last_modifier, UNKNOWN_USER);
        assert!(!pages[0].archivable);
    }
}
