//! Stub page generation for Doxygen-documented C and C++ headers.
//!
//! This crate provides:
//! - Recursive discovery of header files (`.h`, `.hpp`) under a search root
//! - Rendering of reStructuredText stub pages holding a `doxygenfile` directive
//! - Writing (or checking) one stub page per header in an output directory
//! - Parsing and validation of `doxystub.toml` configuration files

mod config;
mod discover;
mod generate;
mod page;

pub use config::{
    ConfigError, GeneratorConfig, CONFIG_FILE, DEFAULT_EXTENSIONS, DEFAULT_OUTPUT_DIR,
    DEFAULT_PROJECT, DEFAULT_SEARCH_ROOT, DEFAULT_STUB_EXTENSION,
};
pub use discover::{discover_headers, DiscoverError, HeaderFile};
pub use generate::{CheckReport, GenerateError, GenerateReport, Generator};
pub use page::{separator, StubPage};
