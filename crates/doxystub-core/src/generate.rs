//! Stub page generation.
//!
//! Discovery runs to completion first, then each header is rendered and
//! written in path order. The first I/O failure aborts the run.

use crate::config::{ConfigError, GeneratorConfig};
use crate::discover::{discover_headers, DiscoverError, HeaderFile};
use crate::page::StubPage;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while generating or checking stub pages.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Discover(#[from] DiscoverError),

    #[error("failed to create output directory {}: {source}", .path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to report progress: {0}")]
    Progress(#[source] io::Error),
}

/// Pages produced by a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Page paths in the order they were processed.
    pub pages: Vec<PathBuf>,

    /// Whether the pages were only rendered, not written.
    pub dry_run: bool,
}

impl GenerateReport {
    /// Number of pages processed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns true if no header was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Outcome of comparing rendered pages against the output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Pages whose contents match.
    pub up_to_date: Vec<PathBuf>,

    /// Pages that exist with different contents.
    pub stale: Vec<PathBuf>,

    /// Pages that do not exist.
    pub missing: Vec<PathBuf>,
}

impl CheckReport {
    /// Returns true if every page is present and current.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.stale.is_empty() && self.missing.is_empty()
    }

    /// Print a summary of the check to stdout.
    pub fn print_summary(&self) {
        for path in &self.missing {
            println!("Missing: {}", path.display());
        }
        for path in &self.stale {
            println!("Stale: {}", path.display());
        }

        if self.is_clean() {
            println!("All {} stub page(s) are up to date", self.up_to_date.len());
        } else {
            println!(
                "\n{} missing, {} stale, {} up to date",
                self.missing.len(),
                self.stale.len(),
                self.up_to_date.len()
            );
        }
    }
}

/// Generates one stub page per discovered header.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a generator, validating the configuration.
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this generator runs with.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Find the headers this generator would document.
    pub fn headers(&self) -> Result<Vec<HeaderFile>, DiscoverError> {
        discover_headers(&self.config.search_root, &self.config.extensions)
    }

    /// Generate every stub page, printing one `Generating <name>` line per
    /// header to stdout.
    pub fn generate_pages(&self) -> Result<GenerateReport, GenerateError> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.generate_pages_to(&mut lock)
    }

    /// Generate every stub page, sending progress lines to `progress`.
    ///
    /// Existing pages are overwritten without comparison.
    pub fn generate_pages_to<W: Write>(
        &self,
        progress: &mut W,
    ) -> Result<GenerateReport, GenerateError> {
        let headers = self.headers()?;
        let pages = self.render_all(&headers);

        if self.config.create_output_dir && !self.config.dry_run {
            std::fs::create_dir_all(&self.config.output_dir).map_err(|source| {
                GenerateError::CreateOutputDir {
                    path: self.config.output_dir.clone(),
                    source,
                }
            })?;
        }

        let mut report = GenerateReport {
            pages: Vec::with_capacity(pages.len()),
            dry_run: self.config.dry_run,
        };

        for (header, page) in headers.iter().zip(pages) {
            writeln!(progress, "Generating {}", header.name).map_err(GenerateError::Progress)?;

            if self.config.dry_run {
                tracing::debug!(page = %page.path.display(), "dry run, skipping write");
            } else {
                write_page(&page)?;
            }

            report.pages.push(page.path);
        }

        tracing::info!(
            pages = report.len(),
            output_dir = %self.config.output_dir.display(),
            dry_run = report.dry_run,
            "stub generation finished"
        );

        Ok(report)
    }

    /// Compare the pages that would be generated with those on disk.
    pub fn check_pages(&self) -> Result<CheckReport, GenerateError> {
        let headers = self.headers()?;
        let mut report = CheckReport::default();

        for page in self.render_all(&headers) {
            match std::fs::read(&page.path) {
                Ok(existing) if existing == page.contents.as_bytes() => {
                    report.up_to_date.push(page.path);
                }
                Ok(_) => {
                    tracing::debug!(page = %page.path.display(), "stale stub page");
                    report.stale.push(page.path);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(page = %page.path.display(), "missing stub page");
                    report.missing.push(page.path);
                }
                Err(source) => {
                    return Err(GenerateError::Read {
                        path: page.path,
                        source,
                    })
                }
            }
        }

        Ok(report)
    }

    fn render_all(&self, headers: &[HeaderFile]) -> Vec<StubPage> {
        let mut owners: HashMap<PathBuf, &Path> = HashMap::new();

        headers
            .iter()
            .map(|header| {
                let page = StubPage::render(header, &self.config);
                if let Some(previous) = owners.insert(page.path.clone(), header.path.as_path()) {
                    tracing::warn!(
                        page = %page.path.display(),
                        first = %previous.display(),
                        second = %header.path.display(),
                        "headers share a base name, later one overwrites the page"
                    );
                }
                page
            })
            .collect()
    }
}

fn write_page(page: &StubPage) -> Result<(), GenerateError> {
    std::fs::write(&page.path, &page.contents).map_err(|source| GenerateError::Write {
        path: page.path.clone(),
        source,
    })?;

    tracing::debug!(page = %page.path.display(), bytes = page.contents.len(), "wrote stub page");
    Ok(())
}
