//! Locates and loads the optional `gazette.yaml` project file. Every key is
//! optional, and without a project file the generator reads `drafts/` and
//! writes `entries/` relative to the working directory.
//!
//! ```yaml
//! drafts_directory: drafts
//! output_directory: public/entries
//! base_url: /entries/
//! ```

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "gazette.yaml";

pub const DEFAULT_DRAFTS_DIRECTORY: &str = "drafts";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "entries";
pub const DEFAULT_BASE_URL: &str = "/entries/";

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct Project {
    drafts_directory: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    base_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The directory containing `draft-*.md` files.
    pub drafts_directory: PathBuf,

    /// The directory receiving entry pages, `entries.json`, and `index.html`.
    pub output_directory: PathBuf,

    /// The site path under which the output directory is served. Always ends
    /// with `/`. Entry paths in the index are `{base_url}{file_name}`.
    pub base_url: String,
}

impl Config {
    /// The default configuration with its directories resolved against
    /// `root`.
    pub fn rooted_at(root: &Path) -> Config {
        Config {
            drafts_directory: root.join(DEFAULT_DRAFTS_DIRECTORY),
            output_directory: root.join(DEFAULT_OUTPUT_DIRECTORY),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Searches `dir` and then each of its ancestors for [`PROJECT_FILE`]
    /// and loads the first one found. Falls back to the defaults rooted at
    /// `dir` when there is no project file. `dir` is canonicalized first, so
    /// `.` searches the real parents of the working directory.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let dir = dir
            .canonicalize()
            .map_err(|e| anyhow!("Resolving directory `{}`: {}", dir.display(), e))?;
        match dir
            .ancestors()
            .map(|ancestor| ancestor.join(PROJECT_FILE))
            .find(|path| path.is_file())
        {
            Some(path) => match Config::from_project_file(&path) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            },
            None => Ok(Config::rooted_at(&dir)),
        }
    }

    /// Loads a project file. Relative directories are resolved against the
    /// directory containing the project file.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = match File::open(path) {
            Err(e) => Err(anyhow!("Opening project file `{}`: {}", path.display(), e)),
            Ok(file) => Ok(file),
        }?;
        let project: Project = serde_yaml::from_reader(file)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => {
                let defaults = Config::rooted_at(project_root);
                Ok(Config {
                    drafts_directory: match project.drafts_directory {
                        Some(dir) => project_root.join(dir),
                        None => defaults.drafts_directory,
                    },
                    output_directory: match project.output_directory {
                        Some(dir) => project_root.join(dir),
                        None => defaults.output_directory,
                    },
                    base_url: match project.base_url {
                        Some(url) => with_trailing_slash(url),
                        None => defaults.base_url,
                    },
                })
            }
        }
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
