//! Command-line arguments and file-backed settings.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

mod app;

pub use app::{DatabaseSettings, LoadError, ServerSettings, Settings};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_DOCS_OUTPUT: &str = "api.json";

/// Command-line arguments for the orchest-api binary.
#[derive(Debug, Parser)]
#[command(name = "orchest-api", version, about = "Orchest API server")]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(
        long = "config",
        env = "ORCHEST_API_CONFIG",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone, Default)]
pub enum Command {
    /// Bootstrap the application and serve HTTP.
    #[default]
    Serve,
    /// Write the OpenAPI document to a file.
    Docs(DocsArgs),
}

#[derive(Debug, Args, Clone)]
pub struct DocsArgs {
    /// File the OpenAPI document is written to.
    #[arg(
        long,
        value_name = "FILE",
        value_hint = ValueHint::FilePath,
        default_value = DEFAULT_DOCS_OUTPUT
    )]
    pub output: PathBuf,
}
