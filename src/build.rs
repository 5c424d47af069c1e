//! Exports the [`build_site`] function which stitches together the high-level
//! steps of a run: discovering drafts, parsing each one ([`crate::draft`]),
//! checking it against the titles seen so far ([`crate::dupe`]), picking its
//! hero image ([`crate::hero`]), rendering its page ([`crate::page`]), and
//! finally writing the JSON index and listing page ([`crate::index`]).

use crate::config::Config;
use crate::draft::{self, Error as DraftError};
use crate::dupe::SeenTitles;
use crate::hero::pick_hero_image;
use crate::index::{listing_page, Index, IndexRecord, INDEX_JSON, LISTING_HTML};
use crate::page::{self, Entry, Error as RenderError};
use crate::write::{Error as WriteError, Writer};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const DRAFT_PREFIX: &str = "draft-";
const MARKDOWN_EXTENSION: &str = ".md";

/// The format of the "Published" timestamp on entry pages.
pub const PUBLISHED_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Builds the site from a [`Config`], stamping every page with the current
/// UTC time. Returns the records written to the JSON index.
pub fn build_site(config: &Config) -> Result<Vec<IndexRecord>> {
    let published = chrono::Utc::now().format(PUBLISHED_FORMAT).to_string();
    build_site_at(config, &published)
}

/// Builds the site from a [`Config`] with a fixed `published` timestamp.
/// Drafts are processed one at a time in file name order; the first draft
/// which can't be read aborts the run.
pub fn build_site_at(config: &Config, published: &str) -> Result<Vec<IndexRecord>> {
    let writer = Writer::create(&config.output_directory)?;
    let drafts = find_drafts(&config.drafts_directory)?;
    info!(
        drafts = drafts.len(),
        source = %config.drafts_directory.display(),
        "building entries"
    );

    let mut seen = SeenTitles::default();
    let mut index = Index::default();
    let mut written: HashSet<String> = HashSet::new();

    for draft_path in &drafts {
        let draft = draft::read(draft_path)?;
        let file_name = page::file_name(&draft.issue, &draft.title);
        let path = format!("{}{}", config.base_url, file_name);

        let dupe_of = match seen.find_duplicate(&draft.title) {
            Some(original) => {
                warn!(
                    title = %draft.title,
                    issue = %draft.issue,
                    original_issue = %original.issue,
                    dupe_of = %original.path,
                    "probable duplicate"
                );
                original.path.clone()
            }
            None => String::new(),
        };

        let hero_image = pick_hero_image(&draft.sources);
        let html = Entry {
            draft: &draft,
            path: &path,
            hero_image: &hero_image,
            published,
            entries_url: &config.base_url,
        }
        .render()?;

        if !written.insert(file_name.clone()) {
            warn!(%file_name, "overwriting an entry written earlier in this run");
        }
        writer.write(&file_name, &html)?;
        info!(
            draft = %draft_path.display(),
            %path,
            hero = !hero_image.is_empty(),
            "rendered entry"
        );

        seen.record(&draft.title, &path, &draft.issue);
        index.push(IndexRecord {
            title: draft.title,
            category: draft.category,
            issue: draft.issue,
            path,
            confidence: draft.confidence,
            dupe_of,
        });
    }

    writer.write(INDEX_JSON, &index.to_json()?)?;
    writer.write(LISTING_HTML, listing_page())?;
    info!(
        entries = index.records().len(),
        output = %config.output_directory.display(),
        "wrote index"
    );

    Ok(index.into_records())
}

/// Returns the `draft-*.md` files directly inside `dir`, sorted by file name.
/// A missing directory has no drafts.
fn find_drafts(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "drafts directory not found");
        return Ok(Vec::new());
    }

    let mut drafts = Vec::new();
    for result in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = result?;
        let file_name = entry.file_name().to_string_lossy();
        // follows symlinks, unlike `entry.file_type()`
        if entry.path().is_file()
            && file_name.starts_with(DRAFT_PREFIX)
            && file_name.ends_with(MARKDOWN_EXTENSION)
        {
            drafts.push(entry.path().to_owned());
        } else {
            debug!(path = %entry.path().display(), "skipping");
        }
    }
    Ok(drafts)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during reading drafts,
/// rendering pages, serializing the index, and writing output.
#[derive(Debug)]
pub enum Error {
    /// Returned when a draft can't be read.
    Draft(DraftError),

    /// Returned for errors rendering an entry page.
    Render(RenderError),

    /// Returned for errors writing output files.
    Write(WriteError),

    /// Returned when the JSON index can't be serialized.
    Json(serde_json::Error),

    /// Returned when the drafts directory can't be listed.
    WalkDir(walkdir::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Draft(err) => err.fmt(f),
            Error::Render(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Json(err) => write!(f, "Serializing index: {}", err),
            Error::WalkDir(err) => write!(f, "Listing drafts: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Draft(err) => Some(err),
            Error::Render(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::WalkDir(err) => Some(err),
        }
    }
}

impl From<DraftError> for Error {
    /// Converts [`DraftError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: DraftError) -> Error {
        Error::Draft(err)
    }
}

impl From<RenderError> for Error {
    /// Converts [`RenderError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: RenderError) -> Error {
        Error::Render(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<serde_json::Error> for Error {
    /// Converts [`serde_json::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts [`walkdir::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PUBLISHED: &str = "2024-01-01 00:00 UTC";

    fn project(drafts: &[(&str, &str)]) -> (TempDir, Config) {
        let scratch = tempfile::tempdir().expect("tempdir");
        let config = Config::rooted_at(scratch.path());
        fs::create_dir_all(&config.drafts_directory).expect("drafts dir");
        for (name, contents) in drafts {
            fs::write(config.drafts_directory.join(name), contents).expect("draft");
        }
        (scratch, config)
    }

    #[test]
    fn test_build_site() -> Result<()> {
        let (_scratch, config) = project(&[
            (
                "draft-0002.md",
                "---\ntitle: Quarterly Report 2024 Draft\ncategory: Finance\nissue: \"#2\"\n---\n\
                 ## Summary\nagain\n",
            ),
            (
                "draft-0001.md",
                "---\ntitle: Quarterly Report 2024\ncategory: Finance\nissue: 1\nconfidence: high\n---\n\
                 ## Summary\nnumbers\n## Sources\n- https://example.com/chart.png?w=600\n",
            ),
            ("draft-0003.md", "# Weekly Digest #12\n\n## Summary\nhi\n"),
            ("notes.md", "# Not a draft\n"),
            ("draft-0004.txt", "# Not a draft either\n"),
        ]);

        let records = build_site_at(&config, PUBLISHED)?;

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            vec![
                "Quarterly Report 2024",
                "Quarterly Report 2024 Draft",
                "Weekly Digest #12"
            ],
            titles
        );
        assert_eq!("/entries/entry-0001-quarterly-report-2024.html", records[0].path);
        assert_eq!("high", records[0].confidence);
        assert_eq!("", records[0].dupe_of);
        assert_eq!(records[0].path, records[1].dupe_of);
        assert_eq!("2", records[1].issue);
        assert_eq!("/entries/entry-0000-weekly-digest-12.html", records[2].path);
        assert_eq!("Other", records[2].category);

        for record in &records {
            let file_name = record.path.trim_start_matches(&config.base_url);
            assert!(
                config.output_directory.join(file_name).is_file(),
                "missing page for {}",
                record.path
            );
        }

        let page = fs::read_to_string(
            config
                .output_directory
                .join("entry-0001-quarterly-report-2024.html"),
        )
        .expect("page");
        assert!(page.contains("<img src=\"https://example.com/chart.png\""));
        assert!(page.contains(PUBLISHED));

        let json = fs::read_to_string(config.output_directory.join(INDEX_JSON)).expect("json");
        let parsed: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(3, parsed.as_array().map_or(0, Vec::len));
        assert_eq!(records[0].path, parsed[1]["dupe_of"]);

        let listing =
            fs::read_to_string(config.output_directory.join(LISTING_HTML)).expect("listing");
        assert_eq!(listing_page(), listing);
        Ok(())
    }

    #[test]
    fn test_missing_drafts_directory_builds_empty_index() -> Result<()> {
        let scratch = tempfile::tempdir().expect("tempdir");
        let config = Config::rooted_at(scratch.path());

        assert!(build_site_at(&config, PUBLISHED)?.is_empty());
        let json = fs::read_to_string(config.output_directory.join(INDEX_JSON)).expect("json");
        assert_eq!("[]", json);
        assert!(config.output_directory.join(LISTING_HTML).is_file());
        Ok(())
    }

    #[test]
    fn test_undecodable_draft_fails_the_run() {
        let (_scratch, config) = project(&[("draft-0001.md", "# Fine\n")]);
        fs::write(config.drafts_directory.join("draft-0002.md"), b"\xff\xfe\x00")
            .expect("draft");

        assert!(matches!(
            build_site_at(&config, PUBLISHED),
            Err(Error::Draft(DraftError::Read { .. }))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_drafts_are_included() -> Result<()> {
        let (scratch, config) = project(&[]);
        let elsewhere = scratch.path().join("shared.md");
        fs::write(&elsewhere, "---\nissue: 3\n---\n# Linked\n").expect("draft");
        std::os::unix::fs::symlink(&elsewhere, config.drafts_directory.join("draft-0003.md"))
            .expect("symlink");

        let records = build_site_at(&config, PUBLISHED)?;
        assert_eq!(1, records.len());
        assert_eq!("/entries/entry-0003-linked.html", records[0].path);
        Ok(())
    }

    #[test]
    fn test_file_names_are_stable_across_runs() -> Result<()> {
        let (_scratch, config) = project(&[("draft-0001.md", "---\nissue: 7\n---\n# Same\n")]);
        let first = build_site_at(&config, PUBLISHED)?;
        let second = build_site_at(&config, "2025-06-01 12:00 UTC")?;
        assert_eq!(first, second);
        Ok(())
    }
}
