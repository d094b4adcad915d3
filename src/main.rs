//! nb2md - convert a tree of Jupyter notebooks into Markdown.
//!
//! With no arguments, converts `./notebooks` into `./markdown`, wiping the
//! output directory first.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nb2md::{Config, TreeConverter};

/// Convert Jupyter notebooks into a mirrored tree of Markdown files
#[derive(Parser)]
#[command(name = "nb2md")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing the notebooks [default: ./notebooks]
    input: Option<PathBuf>,

    /// Directory receiving the Markdown files [default: ./markdown]
    output: Option<PathBuf>,

    /// Keep existing files in the output directory instead of wiping it
    #[arg(short, long)]
    keep_existing: bool,

    /// Notebook file extension
    #[arg(short, long)]
    extension: Option<String>,

    /// Do not write the YAML front matter
    #[arg(long)]
    no_header: bool,

    /// Configuration file (defaults to .nb2md.toml, then the user config dir)
    #[arg(short, long, env = "NB2MD_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Resolve the configuration file and apply command-line overrides.
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::load().context("Failed to load configuration")?,
        };

        if let Some(input) = &self.input {
            config.convert.input_dir.clone_from(input);
        }
        if let Some(output) = &self.output {
            config.convert.output_dir.clone_from(output);
        }
        if let Some(extension) = &self.extension {
            config.convert.extension.clone_from(extension);
        }
        if self.keep_existing {
            config.convert.clean_output = false;
        }
        if self.no_header {
            config.markdown.header = false;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for progress lines
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = cli.resolve_config()?;
    tracing::debug!(?config, "Resolved configuration");

    let converter = TreeConverter::from_config(&config);
    converter.run_with(|conversion| println!("{conversion}")).with_context(|| {
        format!(
            "Failed to convert {} into {}",
            converter.input_root().display(),
            converter.output_root().display()
        )
    })?;

    Ok(())
}
