//! reStructuredText stub page rendering.

use crate::config::GeneratorConfig;
use crate::discover::HeaderFile;
use std::fmt::Write;
use std::path::PathBuf;

/// A rendered stub page and the path it belongs at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubPage {
    /// Where the page is written: `<output-dir>/<header-name>.<stub-extension>`.
    pub path: PathBuf,

    /// Full page text.
    pub contents: String,
}

impl StubPage {
    /// Render the page for a header.
    ///
    /// The stub extension is appended to the header's full name, so `foo.h`
    /// and `foo.hpp` land on distinct pages.
    #[must_use]
    pub fn render(header: &HeaderFile, config: &GeneratorConfig) -> Self {
        let path = config
            .output_dir
            .join(format!("{}.{}", header.name, config.stub_extension));

        Self {
            path,
            contents: render_contents(&header.name, &config.project),
        }
    }
}

/// Title underline for `title`: one `=` per character.
#[must_use]
pub fn separator(title: &str) -> String {
    "=".repeat(title.chars().count())
}

fn render_contents(name: &str, project: &str) -> String {
    let mut output = String::new();

    writeln!(output).unwrap();
    writeln!(output, "{}", name).unwrap();
    writeln!(output, "{}", separator(name)).unwrap();
    writeln!(output).unwrap();
    writeln!(output, ".. doxygenfile:: {}", name).unwrap();
    writeln!(output, "   :project: {}", project).unwrap();

    output
}
