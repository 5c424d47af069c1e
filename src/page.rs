//! Renders a [`Draft`] into a standalone HTML entry page. Templates use
//! literal `{{name}}` placeholders which are substituted in a single pass, so
//! placeholder-like text inside a draft is never expanded.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::LazyLock;

use pulldown_cmark::escape::escape_html;
use regex::Regex;

use crate::draft::Draft;

const ENTRY_TEMPLATE: &str = include_str!("templates/entry.html");

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// The longest slug allowed in an entry file name.
const MAX_SLUG_LEN: usize = 60;

/// Shown behind the hero slot when the entry has no image.
const HERO_PLACEHOLDER: &str = "linear-gradient(135deg, #1b2a55, #1a3a2a)";
const HERO_BACKGROUND: &str = "#000";

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Slugifies a title for use in a file name: lowercase, runs of
/// non-alphanumeric characters collapsed to `-`, no leading or trailing `-`,
/// at most [`MAX_SLUG_LEN`] characters. Only ASCII letters and digits
/// survive; anything else is a separator. Empty slugs become `entry`.
pub fn slug(title: &str) -> String {
    let slug: String = NON_ALPHANUMERIC
        .replace_all(&title.to_lowercase(), "-")
        .trim_matches('-')
        .chars()
        .take(MAX_SLUG_LEN)
        .collect();
    match slug.is_empty() {
        true => String::from("entry"),
        false => slug,
    }
}

/// Returns the output file name for an entry, e.g.
/// `entry-0012-weekly-digest-12.html`. Depends on nothing but its arguments.
pub fn file_name(issue: &str, title: &str) -> String {
    format!("entry-{:0>4}-{}.html", issue, slug(title))
}

/// Everything needed to render one entry page.
pub struct Entry<'a> {
    /// The parsed draft.
    pub draft: &'a Draft,

    /// The site path of the rendered page, e.g.
    /// `/entries/entry-0012-weekly-digest-12.html`. Used to exclude the page
    /// from its own related entries.
    pub path: &'a str,

    /// The hero image URL, or empty for none.
    pub hero_image: &'a str,

    /// The human-readable publication time.
    pub published: &'a str,

    /// The site path of the entries directory, with a trailing slash. The
    /// JSON index is fetched from `{entries_url}entries.json`.
    pub entries_url: &'a str,
}

impl Entry<'_> {
    /// Renders the entry into a complete HTML document.
    pub fn render(&self) -> Result<String> {
        let draft = self.draft;
        let (hero_display, hero_background) = match self.hero_image.is_empty() {
            true => ("none", HERO_PLACEHOLDER),
            false => ("block", HERO_BACKGROUND),
        };

        let mut values: HashMap<&str, String> = HashMap::new();
        values.insert("title", html(&draft.title)?);
        values.insert("category", html(&draft.category)?);
        values.insert("issue", html(&draft.issue)?);
        values.insert("published", html(self.published)?);
        values.insert("summary", html(&draft.summary)?);
        values.insert("details", html(&draft.details)?);
        values.insert("sources", html(&draft.sources)?);
        values.insert("hero_image", html(self.hero_image)?);
        values.insert("hero_display", hero_display.to_owned());
        values.insert("hero_background", hero_background.to_owned());
        values.insert("entries_url", html(self.entries_url)?);
        values.insert("category_js", js_string(&draft.category));
        values.insert("current_path_js", js_string(self.path));
        values.insert(
            "index_json_js",
            js_string(&format!("{}entries.json", self.entries_url)),
        );

        fill(ENTRY_TEMPLATE, &values)
    }
}

/// Substitutes every `{{name}}` in `template` with its value. An unterminated
/// `{{` is copied through as-is.
fn fill(template: &str, values: &HashMap<&str, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        let end = match after.find(CLOSE) {
            Some(end) => end,
            None => break,
        };
        let name = after[..end].trim();
        let value = values
            .get(name)
            .ok_or_else(|| Error::UnresolvedPlaceholder(name.to_owned()))?;
        out.push_str(&rest[..start]);
        out.push_str(value);
        rest = &after[end + CLOSE.len()..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Escapes `text` for an HTML text or attribute context.
fn html(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    escape_html(&mut out, text)?;
    Ok(out)
}

/// Escapes `text` for the inside of a double-quoted JavaScript string in an
/// inline `<script>`.
fn js_string(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace("</", "<\\/")
}

/// The result of a fallible rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering an entry page.
#[derive(Debug)]
pub enum Error {
    /// The template references a placeholder which has no value.
    UnresolvedPlaceholder(String),

    /// An error escaping a value.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator with [`escape_html`].
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnresolvedPlaceholder(name) => {
                write!(f, "Unresolved template placeholder `{{{{{}}}}}`", name)
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UnresolvedPlaceholder(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}
