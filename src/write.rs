//! Puts rendered artifacts on disk. Every file lands directly in one output
//! directory, which is created on demand.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Responsible for writing entry pages and index files into the output
/// directory.
pub struct Writer<'a> {
    /// The directory in which every output file is written.
    output_directory: &'a Path,
}

impl<'a> Writer<'a> {
    /// Creates the output directory (and any missing parents) and returns a
    /// [`Writer`] for it. An existing directory is reused as-is.
    pub fn create(output_directory: &'a Path) -> Result<Writer<'a>> {
        std::fs::create_dir_all(output_directory).map_err(|err| {
            Error::CreateDirectory {
                path: output_directory.to_owned(),
                err,
            }
        })?;
        Ok(Writer { output_directory })
    }

    /// Writes `contents` to `{output_directory}/{file_name}`, replacing any
    /// existing file, and returns the written path.
    pub fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.output_directory.join(file_name);
        match std::fs::write(&path, contents) {
            Ok(()) => Ok(path),
            Err(err) => Err(Error::Write { path, err }),
        }
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error creating the output directory.
    CreateDirectory { path: PathBuf, err: io::Error },

    /// An error writing an output file.
    Write { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::CreateDirectory { path, err } => {
                write!(f, "Creating directory '{}': {}", path.display(), err)
            }
            Error::Write { path, err } => {
                write!(f, "Writing '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::CreateDirectory { path: _, err } => Some(err),
            Error::Write { path: _, err } => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_creates_nested_directory_and_overwrites() -> Result<()> {
        let scratch = tempfile::tempdir().expect("tempdir");
        let dir = scratch.path().join("a").join("entries");
        let writer = Writer::create(&dir)?;

        writer.write("x.html", "first")?;
        let path = writer.write("x.html", "second")?;
        assert_eq!(dir.join("x.html"), path);
        assert_eq!("second", std::fs::read_to_string(&path).expect("read"));
        Ok(())
    }

    #[test]
    fn test_create_fails_on_file() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let file = scratch.path().join("file");
        std::fs::write(&file, "").expect("write");
        assert!(matches!(
            Writer::create(&file.join("entries")),
            Err(Error::CreateDirectory { .. })
        ));
    }
}
