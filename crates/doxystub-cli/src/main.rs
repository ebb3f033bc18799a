//! doxystub - Generate Doxygen/Breathe stub pages for C and C++ headers

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use doxystub_core::{Generator, GeneratorConfig, CONFIG_FILE};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod init;

#[derive(Parser)]
#[command(name = "doxystub")]
#[command(version)]
#[command(about = "Generate reStructuredText stub pages for Doxygen-documented headers", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one stub page per header into the output directory
    Generate {
        #[command(flatten)]
        paths: PathArgs,

        /// Print what would be generated without writing any file
        #[arg(long)]
        dry_run: bool,

        /// Create the output directory if it does not exist
        #[arg(long)]
        create_output_dir: bool,
    },

    /// Verify the stub pages on disk are up to date
    Check {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Write a default doxystub.toml in the current directory
    Init {
        /// Overwrite an existing doxystub.toml
        #[arg(long)]
        force: bool,
    },
}

/// Options shared by the commands that locate headers and pages.
#[derive(Args, Debug, Default)]
struct PathArgs {
    /// Configuration file (defaults to ./doxystub.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory searched recursively for headers
    #[arg(short, long)]
    include: Option<PathBuf>,

    /// Directory stub pages are written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Breathe project identifier
    #[arg(short, long)]
    project: Option<String>,

    /// Header extensions to match (comma-separated, without dots)
    #[arg(long = "ext", value_delimiter = ',')]
    extensions: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    match cli.command {
        Some(Commands::Generate {
            paths,
            dry_run,
            create_output_dir,
        }) => {
            let mut config = resolve_config(&paths, &cwd)?;
            config.dry_run = dry_run;
            config.create_output_dir |= create_output_dir;
            generate(config)?;
        }

        Some(Commands::Check { paths }) => {
            let config = resolve_config(&paths, &cwd)?;
            check(config)?;
        }

        Some(Commands::Init { force }) => {
            init::init_config(force)?;
        }

        None => {
            // Default behavior: generate with the resolved configuration
            let config = resolve_config(&PathArgs::default(), &cwd)?;
            generate(config)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence over flags.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the configuration: defaults, then the config file, then flags.
fn resolve_config(paths: &PathArgs, cwd: &Path) -> Result<GeneratorConfig> {
    let mut config = match &paths.config {
        Some(path) => GeneratorConfig::from_path(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => {
            let default_path = cwd.join(CONFIG_FILE);
            if default_path.is_file() {
                GeneratorConfig::from_path(&default_path)
                    .with_context(|| format!("Failed to load {}", default_path.display()))?
            } else {
                GeneratorConfig::default()
            }
        }
    };

    if let Some(include) = &paths.include {
        config.search_root.clone_from(include);
    }
    if let Some(output) = &paths.output {
        config.output_dir.clone_from(output);
    }
    if let Some(project) = &paths.project {
        config.project.clone_from(project);
    }
    if !paths.extensions.is_empty() {
        config.extensions.clone_from(&paths.extensions);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Generate stub pages for every discovered header
fn generate(config: GeneratorConfig) -> Result<()> {
    let generator = Generator::new(config)?;
    let report = generator.generate_pages().with_context(|| {
        format!(
            "Failed to generate stub pages from {}",
            generator.config().search_root.display()
        )
    })?;

    if report.is_empty() {
        tracing::warn!(
            search_root = %generator.config().search_root.display(),
            "no headers found"
        );
    }

    Ok(())
}

/// Compare the stub pages on disk against freshly rendered ones
fn check(config: GeneratorConfig) -> Result<()> {
    let generator = Generator::new(config)?;
    let report = generator
        .check_pages()
        .context("Failed to check stub pages")?;

    report.print_summary();

    if !report.is_clean() {
        bail!("Stub pages are out of date, run `doxystub generate`");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["doxystub"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "doxystub",
            "generate",
            "--include",
            "../include",
            "-o",
            "api",
            "--project",
            "firmware",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Generate {
                paths,
                dry_run,
                create_output_dir,
            }) => {
                assert_eq!(paths.include, Some(PathBuf::from("../include")));
                assert_eq!(paths.output, Some(PathBuf::from("api")));
                assert_eq!(paths.project.as_deref(), Some("firmware"));
                assert!(dry_run);
                assert!(!create_output_dir);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_extensions_comma_separated() {
        let cli = Cli::try_parse_from(["doxystub", "check", "--ext", "h,hh,hpp"]).unwrap();
        match cli.command {
            Some(Commands::Check { paths }) => {
                assert_eq!(paths.extensions, vec!["h", "hh", "hpp"]);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_global_verbosity() {
        let cli = Cli::try_parse_from(["doxystub", "generate", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_init_force() {
        let cli = Cli::try_parse_from(["doxystub", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Init { force: true })));
    }

    #[test]
    fn test_resolve_defaults_without_config_file() {
        let tmp = TempDir::new().unwrap();
        let config = resolve_config(&PathArgs::default(), tmp.path()).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_resolve_picks_up_config_in_cwd() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "project = \"firmware\"\n").unwrap();

        let config = resolve_config(&PathArgs::default(), tmp.path()).unwrap();
        assert_eq!(config.project, "firmware");
        assert_eq!(config.output_dir, tmp.path().join("api"));
    }

    #[test]
    fn test_resolve_flags_override_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "project = \"firmware\"\nextensions = [\"h\"]\n",
        )
        .unwrap();

        let paths = PathArgs {
            include: Some(PathBuf::from("headers")),
            project: Some(String::from("bootloader")),
            extensions: vec![String::from("hpp")],
            ..PathArgs::default()
        };
        let config = resolve_config(&paths, tmp.path()).unwrap();
        assert_eq!(config.search_root, PathBuf::from("headers"));
        assert_eq!(config.project, "bootloader");
        assert_eq!(config.extensions, vec!["hpp"]);
    }

    #[test]
    fn test_resolve_rejects_invalid_flag_values() {
        let tmp = TempDir::new().unwrap();
        let paths = PathArgs {
            extensions: vec![String::from(".h")],
            ..PathArgs::default()
        };
        assert!(resolve_config(&paths, tmp.path()).is_err());
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let paths = PathArgs {
            config: Some(tmp.path().join("missing.toml")),
            ..PathArgs::default()
        };
        assert!(resolve_config(&paths, tmp.path()).is_err());
    }
}
