//! Title-based duplicate detection. Two titles are probable duplicates when
//! most of the words of the shorter one also appear in the longer one. Entry
//! bodies are never compared.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// The minimum token overlap for two titles to count as duplicates.
pub const DUPLICATE_THRESHOLD: f64 = 0.75;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Lowercases `title` and collapses every run of characters outside
/// `[a-z0-9]` into a single space.
pub fn normalize(title: &str) -> String {
    NON_ALPHANUMERIC
        .replace_all(&title.to_lowercase(), " ")
        .trim()
        .to_owned()
}

fn tokens(normalized: &str) -> HashSet<&str> {
    normalized.split_whitespace().collect()
}

/// Reports whether `a` and `b` are probably the same entry. The overlap is
/// measured against the smaller token set, so a title which only adds words
/// to an earlier one still matches. Blank titles never match.
pub fn is_probable_duplicate(a: &str, b: &str) -> bool {
    let (a, b) = (normalize(a), normalize(b));
    let (a, b) = (tokens(&a), tokens(&b));
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let shared = a.intersection(&b).count() as f64;
    shared / a.len().min(b.len()) as f64 >= DUPLICATE_THRESHOLD
}

/// A draft which has already been processed in the current run.
#[derive(Clone, Debug)]
pub struct Seen {
    pub title: String,
    pub path: String,
    pub issue: String,
}

/// The ledger of drafts processed so far in a run, in processing order.
#[derive(Default, Debug)]
pub struct SeenTitles {
    seen: Vec<Seen>,
}

impl SeenTitles {
    /// Returns the earliest recorded entry whose title is a probable
    /// duplicate of `title`. The first match wins, not the closest.
    pub fn find_duplicate(&self, title: &str) -> Option<&Seen> {
        self.seen
            .iter()
            .find(|seen| is_probable_duplicate(title, &seen.title))
    }

    /// Records a processed draft. Duplicates are recorded too, so later
    /// drafts can match against them.
    pub fn record(&mut self, title: &str, path: &str, issue: &str) {
        self.seen.push(Seen {
            title: title.to_owned(),
            path: path.to_owned(),
            issue: issue.to_owned(),
        });
    }
}
