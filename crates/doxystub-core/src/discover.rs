//! Recursive header discovery.

use glob::MatchOptions;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while discovering headers.
#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("search root not found: {}", .0.display())]
    SearchRootNotFound(PathBuf),

    #[error("glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("header file name is not valid UTF-8: {}", .0.display())]
    NonUtf8Name(PathBuf),
}

/// A header file found under the search root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct HeaderFile {
    /// Path to the header, prefixed by the search root.
    pub path: PathBuf,

    /// Final path component, extension included.
    pub name: String,
}

impl HeaderFile {
    /// Build a reference from a header path.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, DiscoverError> {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(ToString::to_string)
            .ok_or_else(|| DiscoverError::NonUtf8Name(path.clone()))?;

        Ok(Self { path, name })
    }
}

/// Find every file under `root` whose extension is one of `extensions`.
///
/// The full list is collected before returning and sorted by path, so the
/// order is the same on every run. Hidden files and directories are skipped.
pub fn discover_headers<S: AsRef<str>>(
    root: &Path,
    extensions: &[S],
) -> Result<Vec<HeaderFile>, DiscoverError> {
    if !root.is_dir() {
        return Err(DiscoverError::SearchRootNotFound(root.to_path_buf()));
    }

    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let pattern = format!("{}/**/*", escaped_root.trim_end_matches(['/', '\\']));
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut headers = Vec::new();
    for entry in glob::glob_with(&pattern, options)? {
        let path = entry.map_err(|e| DiscoverError::Io {
            path: e.path().to_path_buf(),
            source: e.into(),
        })?;

        if is_hidden(&path, root) || !path.is_file() || !has_extension(&path, extensions) {
            continue;
        }

        tracing::trace!(path = %path.display(), "matched header");
        headers.push(HeaderFile::from_path(path)?);
    }

    headers.sort();
    tracing::debug!(
        root = %root.display(),
        count = headers.len(),
        "discovered headers"
    );

    Ok(headers)
}

/// True when a component below `root` is a dot-name.
///
/// `glob` drops a leading `./` from the paths it yields, so the root's
/// components are counted without `CurDir` rather than stripped as a prefix.
fn is_hidden(path: &Path, root: &Path) -> bool {
    let depth = root
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .count();

    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .skip(depth)
        .any(|c| match c {
            Component::Normal(name) => name.to_string_lossy().starts_with('.'),
            _ => false,
        })
}

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.as_ref() == ext))
}
