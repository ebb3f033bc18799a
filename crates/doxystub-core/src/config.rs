//! Generator configuration and `doxystub.toml` parsing.
//!
//! Every key is optional; a missing key falls back to the built-in default:
//!
//! ```toml
//! search-root = "../include"
//! output-dir = "api"
//! project = "newton_esp_stopwatch"
//! extensions = ["h", "hpp"]
//! stub-extension = "rst"
//! create-output-dir = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The configuration filename looked up in the working directory.
pub const CONFIG_FILE: &str = "doxystub.toml";

/// Directory searched for headers when none is configured.
pub const DEFAULT_SEARCH_ROOT: &str = "../include";

/// Directory stub pages are written to when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "api";

/// Breathe project identifier used in the `:project:` option.
pub const DEFAULT_PROJECT: &str = "newton_esp_stopwatch";

/// Header extensions matched during discovery.
pub const DEFAULT_EXTENSIONS: &[&str] = &["h", "hpp"];

/// Extension appended to the header's base name to form the page name.
pub const DEFAULT_STUB_EXTENSION: &str = "rst";

/// Errors that can occur when loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid project identifier '{0}': {1}")]
    InvalidProject(String, &'static str),

    #[error("invalid extension '{0}': {1}")]
    InvalidExtension(String, &'static str),

    #[error("no header extensions configured")]
    NoExtensions,
}

/// Configuration for a stub generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct GeneratorConfig {
    /// Root directory searched recursively for headers.
    pub search_root: PathBuf,

    /// Directory the stub pages are written to.
    pub output_dir: PathBuf,

    /// Breathe project identifier.
    pub project: String,

    /// Header file extensions, without the leading dot.
    pub extensions: Vec<String>,

    /// Extension appended to each header's base name, without the leading dot.
    pub stub_extension: String,

    /// Create the output directory if it does not exist.
    pub create_output_dir: bool,

    /// Render pages and print progress without writing anything.
    #[serde(skip)]
    pub dry_run: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            search_root: PathBuf::from(DEFAULT_SEARCH_ROOT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            project: String::from(DEFAULT_PROJECT),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            stub_extension: String::from(DEFAULT_STUB_EXTENSION),
            create_output_dir: false,
            dry_run: false,
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with the default project and extensions.
    #[must_use]
    pub fn new(search_root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            search_root: search_root.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Load a configuration file.
    ///
    /// Relative `search-root` and `output-dir` values are resolved against
    /// the directory containing the file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::parse(&content)?;
        if let Some(base) = path.parent() {
            config.search_root = base.join(&config.search_root);
            config.output_dir = base.join(&config.output_dir);
        }

        tracing::debug!(
            config = %path.display(),
            search_root = %config.search_root.display(),
            output_dir = %config.output_dir.display(),
            "loaded configuration"
        );

        Ok(config)
    }

    /// Parse a configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values that would produce broken pages.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project.is_empty() {
            return Err(ConfigError::InvalidProject(
                self.project.clone(),
                "project cannot be empty",
            ));
        }

        if self.project.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidProject(
                self.project.clone(),
                "project cannot contain whitespace",
            ));
        }

        if self.extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }

        for ext in &self.extensions {
            validate_extension(ext)?;
        }

        validate_extension(&self.stub_extension)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Returns true if `ext` is one of the configured header extensions.
    #[must_use]
    pub fn matches_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext)
    }
}

fn validate_extension(ext: &str) -> Result<(), ConfigError> {
    if ext.is_empty() {
        return Err(ConfigError::InvalidExtension(
            ext.to_string(),
            "extension cannot be empty",
        ));
    }

    if ext.starts_with('.') {
        return Err(ConfigError::InvalidExtension(
            ext.to_string(),
            "extension must not start with a dot",
        ));
    }

    if ext.contains(['.', '/', '\\']) || ext.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidExtension(
            ext.to_string(),
            "extension can only be a single path-safe suffix",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config = GeneratorConfig::parse("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.search_root, PathBuf::from("../include"));
        assert_eq!(config.output_dir, PathBuf::from("api"));
        assert_eq!(config.project, "newton_esp_stopwatch");
        assert_eq!(config.extensions, vec!["h", "hpp"]);
        assert_eq!(config.stub_extension, "rst");
        assert!(!config.create_output_dir);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
search-root = "include"
output-dir = "docs/api"
project = "firmware"
extensions = ["h", "hh", "hpp", "hxx"]
stub-extension = "txt"
create-output-dir = true
"#;
        let config = GeneratorConfig::parse(toml).unwrap();
        assert_eq!(config.search_root, PathBuf::from("include"));
        assert_eq!(config.output_dir, PathBuf::from("docs/api"));
        assert_eq!(config.project, "firmware");
        assert_eq!(config.extensions.len(), 4);
        assert_eq!(config.stub_extension, "txt");
        assert!(config.create_output_dir);
    }

    #[test]
    fn unknown_key_rejected() {
        let err = GeneratorConfig::parse("headers = \"include\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));
    }

    #[test]
    fn dry_run_is_not_a_config_key() {
        let err = GeneratorConfig::parse("dry-run = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));
    }

    #[test]
    fn invalid_project() {
        let err = GeneratorConfig::parse("project = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProject(..)));

        let err = GeneratorConfig::parse("project = \"my project\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProject(..)));
    }

    #[test]
    fn invalid_extensions() {
        let err = GeneratorConfig::parse("extensions = []").unwrap_err();
        assert!(matches!(err, ConfigError::NoExtensions));

        let err = GeneratorConfig::parse("extensions = [\".h\"]").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidExtension(..)));

        let err = GeneratorConfig::parse("extensions = [\"tar.gz\"]").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidExtension(..)));

        let err = GeneratorConfig::parse("stub-extension = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidExtension(..)));
    }

    #[test]
    fn from_path_resolves_relative_to_file() {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path().join("docs");
        fs::create_dir(&docs).unwrap();
        fs::write(
            docs.join(CONFIG_FILE),
            "search-root = \"../include\"\noutput-dir = \"api\"\n",
        )
        .unwrap();

        let config = GeneratorConfig::from_path(docs.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.search_root, docs.join("../include"));
        assert_eq!(config.output_dir, docs.join("api"));
    }

    #[test]
    fn from_path_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = GeneratorConfig::from_path(tmp.path().join(CONFIG_FILE)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn serialized_default_parses_back() {
        let text = GeneratorConfig::default().to_toml_string().unwrap();
        assert!(text.contains("project = \"newton_esp_stopwatch\""));
        assert_eq!(GeneratorConfig::parse(&text).unwrap(), GeneratorConfig::default());
    }

    #[test]
    fn matches_extension_is_exact() {
        let config = GeneratorConfig::default();
        assert!(config.matches_extension("h"));
        assert!(config.matches_extension("hpp"));
        assert!(!config.matches_extension("H"));
        assert!(!config.matches_extension("hh"));
        assert!(!config.matches_extension("c"));
    }
}
