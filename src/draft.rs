//! Defines the [`Draft`], [`DraftBuilder`], and [`Error`] types. Also defines
//! the logic for parsing drafts from the file system into memory. A draft
//! looks like this:
//!
//! ```md
//! ---
//! title: "Weekly Digest #12"
//! category: Tools
//! issue: "#12"
//! confidence: high
//! ---
//! # Weekly Digest #12
//!
//! ## Summary
//! - A new release happened.
//!
//! ## Details
//! Longer notes.
//!
//! ## Sources
//! - ![cover](https://example.com/cover.png)
//! ```
//!
//! Parsing is best-effort: every field has a default, so parsing text never
//! fails. Only reading the file from disk can.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

/// The front-matter fence. It must open the document for any front-matter to
/// be recognized.
const FENCE: &str = "---";

/// The text used for a section which is missing from the draft body.
pub const MISSING_SECTION: &str = "- (none provided)";

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_CATEGORY: &str = "Other";
pub const DEFAULT_ISSUE: &str = "0";
pub const DEFAULT_CONFIDENCE: &str = "medium";

/// Matches a level-1 heading line and captures its text.
static TITLE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^#[ \t]+(.*?)[ \t]*$").unwrap());

/// Matches any level-2 heading line and captures its text. `###` and deeper
/// don't match because the third character must be whitespace.
static SECTION_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^##[ \t]+(.*?)[ \t]*$").unwrap());

/// A fully-populated draft. Construct one via [`Draft::parse`] or
/// [`DraftBuilder`]; both guarantee that no field is left blank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draft {
    /// The draft's title, from the front-matter or the first `#` heading.
    pub title: String,

    /// The draft's category, used to group related entries.
    pub category: String,

    /// The issue number as a string of digits, without any `#`.
    pub issue: String,

    /// The author's confidence in the entry, e.g., `low`, `medium`, `high`.
    pub confidence: String,

    /// The body of the `## Summary` section.
    pub summary: String,

    /// The body of the `## Details` section.
    pub details: String,

    /// The body of the `## Sources` section.
    pub sources: String,
}

impl Draft {
    /// Parses a [`Draft`] from the raw text of a draft document. Never fails;
    /// see [`DraftBuilder::build`] for the defaults.
    pub fn parse(input: &str) -> Draft {
        let (frontmatter, body) = split_frontmatter(input);
        let mut fields = parse_frontmatter(frontmatter);
        let mut field = |key: &str| fields.remove(key);

        DraftBuilder::default()
            .title(field("title").or_else(|| first_heading(body)))
            .category(field("category"))
            .issue(field("issue"))
            .confidence(field("confidence"))
            .summary(section(body, "Summary"))
            .details(section(body, "Details"))
            .sources(section(body, "Sources"))
            .build()
    }
}

/// Collects the optional pieces of a [`Draft`] and fills in defaults for the
/// missing ones in [`DraftBuilder::build`]. Blank values count as missing.
#[derive(Default, Debug)]
pub struct DraftBuilder {
    title: Option<String>,
    category: Option<String>,
    issue: Option<String>,
    confidence: Option<String>,
    summary: Option<String>,
    details: Option<String>,
    sources: Option<String>,
}

impl DraftBuilder {
    pub fn title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Sets the issue number. Every `#` is removed, so `#12` and `12` are
    /// equivalent.
    pub fn issue(mut self, issue: Option<String>) -> Self {
        self.issue = issue.map(|issue| issue.replace('#', "").trim().to_owned());
        self
    }

    pub fn confidence(mut self, confidence: Option<String>) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn summary(mut self, summary: Option<String>) -> Self {
        self.summary = summary;
        self
    }

    pub fn details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }

    pub fn sources(mut self, sources: Option<String>) -> Self {
        self.sources = sources;
        self
    }

    /// Builds the [`Draft`], replacing missing or blank fields with their
    /// defaults.
    pub fn build(self) -> Draft {
        fn or(value: Option<String>, default: &str) -> String {
            match value {
                Some(value) if !value.trim().is_empty() => value,
                _ => default.to_owned(),
            }
        }

        Draft {
            title: or(self.title, DEFAULT_TITLE),
            category: or(self.category, DEFAULT_CATEGORY),
            issue: or(self.issue, DEFAULT_ISSUE),
            confidence: or(self.confidence, DEFAULT_CONFIDENCE),
            summary: or(self.summary, MISSING_SECTION),
            details: or(self.details, MISSING_SECTION),
            sources: or(self.sources, MISSING_SECTION),
        }
    }
}

/// Splits `input` into `(frontmatter, body)`. The document must start with
/// [`FENCE`] and contain a second one; otherwise the whole input is the body
/// and the front-matter is empty.
fn split_frontmatter(input: &str) -> (&str, &str) {
    if !input.starts_with(FENCE) {
        return ("", input);
    }
    let rest = &input[FENCE.len()..];
    match rest.find(FENCE) {
        None => ("", input),
        Some(offset) => (
            rest[..offset].trim(),
            rest[offset + FENCE.len()..].trim(),
        ),
    }
}

/// Parses `key: value` lines. Values lose surrounding whitespace and double
/// quotes. Lines without a colon are skipped.
fn parse_frontmatter(frontmatter: &str) -> HashMap<String, String> {
    frontmatter
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| {
            (
                key.trim().to_owned(),
                value.trim().trim_matches('"').to_owned(),
            )
        })
        .collect()
}

fn first_heading(body: &str) -> Option<String> {
    TITLE_HEADING
        .captures(body)
        .map(|captures| captures[1].trim().to_owned())
}

/// Returns the trimmed text between the `## {name}` heading and the next
/// level-2 heading (or the end of `body`). The name must match exactly.
fn section(body: &str, name: &str) -> Option<String> {
    let mut headings = SECTION_HEADING.captures_iter(body);
    let start = headings.by_ref().find_map(|captures| {
        match captures.get(1).map(|m| m.as_str()) {
            Some(heading) if heading == name => {
                captures.get(0).map(|m| m.end())
            }
            _ => None,
        }
    })?;
    let end = headings
        .next()
        .and_then(|captures| captures.get(0))
        .map_or(body.len(), |m| m.start());
    Some(body[start..end].trim().to_owned())
}

/// Reads the file at `path` and parses it into a [`Draft`].
pub fn read(path: &Path) -> Result<Draft> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Draft::parse(&contents)),
        Err(err) => Err(Error::Read {
            path: path.to_owned(),
            err,
        }),
    }
}

/// Represents the result of reading a [`Draft`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading a [`Draft`] from disk.
#[derive(Debug)]
pub enum Error {
    /// Returned when the draft file can't be opened or isn't valid UTF-8.
    Read { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read { path, err } => {
                write!(f, "Reading draft '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { path: _, err } => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_frontmatter_and_sections() {
        let draft = Draft::parse(
            "---\n\
             title: \"Weekly Digest #12\"\n\
             category: Tools\n\
             issue: \"#12\"\n\
             confidence: high\n\
             ---\n\
             # Ignored heading\n\
             \n\
             ## Summary\n\
             - one\n\
             - two\n\
             \n\
             ## Details\n\
             Some details.\n\
             ### Still details\n\
             More.\n\
             \n\
             ## Sources\n\
             - https://example.com/a\n",
        );

        assert_eq!(
            Draft {
                title: String::from("Weekly Digest #12"),
                category: String::from("Tools"),
                issue: String::from("12"),
                confidence: String::from("high"),
                summary: String::from("- one\n- two"),
                details: String::from(
                    "Some details.\n### Still details\nMore."
                ),
                sources: String::from("- https://example.com/a"),
            },
            draft
        );
    }

    #[test]
    fn test_defaults_without_frontmatter() {
        let draft = Draft::parse("# Just a heading\n\nNo sections here.\n");
        assert_eq!("Just a heading", draft.title);
        assert_eq!(DEFAULT_CATEGORY, draft.category);
        assert_eq!(DEFAULT_ISSUE, draft.issue);
        assert_eq!(DEFAULT_CONFIDENCE, draft.confidence);
        assert_eq!(MISSING_SECTION, draft.summary);
        assert_eq!(MISSING_SECTION, draft.details);
        assert_eq!(MISSING_SECTION, draft.sources);
    }

    #[test]
    fn test_untitled_fallback() {
        let draft = Draft::parse("---\ncategory: News\n---\n## Summary\nhi\n");
        assert_eq!(DEFAULT_TITLE, draft.title);
        assert_eq!("News", draft.category);
        assert_eq!("hi", draft.summary);

        assert_eq!(DEFAULT_TITLE, Draft::parse("").title);
    }

    #[test]
    fn test_blank_title_falls_back_to_heading() {
        let draft = Draft::parse("---\ntitle: \"\"\n---\n# From heading\n");
        assert_eq!("From heading", draft.title);
    }

    #[test]
    fn test_malformed_frontmatter_is_body() {
        let input = "---\ntitle: Never closed\n# Real title\n";
        let draft = Draft::parse(input);
        assert_eq!("Real title", draft.title);
        assert_eq!(DEFAULT_CATEGORY, draft.category);
    }

    #[test]
    fn test_section_names_are_case_sensitive_and_exact() {
        let draft = Draft::parse(
            "# T\n## summary\nlowercase\n## Summary notes\nsuffixed\n",
        );
        assert_eq!(MISSING_SECTION, draft.summary);
    }

    #[test]
    fn test_empty_section_uses_placeholder() {
        let draft = Draft::parse("# T\n## Summary\n\n## Details\nx\n");
        assert_eq!(MISSING_SECTION, draft.summary);
        assert_eq!("x", draft.details);
    }

    #[test]
    fn test_crlf_line_endings() {
        let draft = Draft::parse(
            "---\r\ntitle: Windows\r\n---\r\n## Summary  \r\nline\r\n## Sources\r\nsrc\r\n",
        );
        assert_eq!("Windows", draft.title);
        assert_eq!("line", draft.summary);
        assert_eq!("src", draft.sources);
    }

    #[test]
    fn test_frontmatter_lines_without_colon_are_ignored() {
        let draft =
            Draft::parse("---\njust words\nconfidence: low\n---\n# T\n");
        assert_eq!("low", draft.confidence);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read(Path::new("./does/not/exist.md")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
