//! Accumulates one [`IndexRecord`] per rendered entry and produces the two
//! index artifacts: `entries.json` and the `index.html` listing page which
//! renders it in the browser.

use serde::Serialize;

const LISTING_TEMPLATE: &str = include_str!("templates/listing.html");

/// The file name of the JSON index.
pub const INDEX_JSON: &str = "entries.json";

/// The file name of the listing page.
pub const LISTING_HTML: &str = "index.html";

/// The summary of one rendered entry as it appears in `entries.json`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct IndexRecord {
    pub title: String,
    pub category: String,
    pub issue: String,

    /// The site path of the entry page.
    pub path: String,
    pub confidence: String,

    /// The path of the earlier entry this one duplicates, or empty.
    pub dupe_of: String,
}

impl IndexRecord {
    pub fn is_duplicate(&self) -> bool {
        !self.dupe_of.is_empty()
    }
}

/// The ordered list of [`IndexRecord`]s for a run.
#[derive(Default, Debug)]
pub struct Index {
    records: Vec<IndexRecord>,
}

impl Index {
    /// Appends a record. Records keep the order in which they're pushed.
    pub fn push(&mut self, record: IndexRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[IndexRecord] {
        &self.records
    }

    /// Serializes the records as a pretty-printed JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records)
    }

    pub fn into_records(self) -> Vec<IndexRecord> {
        self.records
    }
}

/// Returns the listing page. The page is static: it fetches
/// [`INDEX_JSON`] from its own directory when viewed. Duplicates link to the
/// entry they duplicate rather than to their own page.
pub fn listing_page() -> &'static str {
    LISTING_TEMPLATE
}
