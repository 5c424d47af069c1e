//! Picks a hero image for an entry out of its free-text sources.

use std::sync::LazyLock;

use regex::Regex;

/// `![alt](http(s)://...)`
static MARKDOWN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)!\[[^\]]*\]\((https?://[^\s)]+)\)").unwrap()
});

/// A bare image URL. The query string, if any, is matched but not captured.
static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(https?://\S+?\.(?:png|jpg|jpeg|webp|gif))(?:\?\S*)?")
        .unwrap()
});

/// Returns the best-guess hero image URL from a sources block, or an empty
/// string when there is none. A Markdown image wins over a bare image URL
/// anywhere in the text; otherwise the first bare image URL is returned
/// without its query string.
pub fn pick_hero_image(sources: &str) -> String {
    [&*MARKDOWN_IMAGE, &*IMAGE_URL]
        .iter()
        .find_map(|re| re.captures(sources))
        .map(|captures| captures[1].trim().to_owned())
        .unwrap_or_default()
}
