//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    calc::CalcArgs,
    completions::CompletionsArgs,
    config::ConfigCommands,
    init::InitArgs,
    link::LinkCommands,
    mat::MatCommands,
    mat_type::MatTypeCommands,
    partner::PartnerCommands,
    prod::ProdCommands,
    prod_type::ProdTypeCommands,
    status::StatusArgs,
};

#[derive(Parser)]
#[command(name = "minv")]
#[command(author, version, about = "Materials and products inventory")]
#[command(long_about = "Keeps materials, products, their types and partners in a per-project SQLite database, and works out how much raw material a production batch needs.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format (auto uses the configured default, else tsv)
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .minv/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Database file, overriding the project's configured one
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new inventory project
    Init(InitArgs),

    /// Material management
    #[command(subcommand)]
    Mat(MatCommands),

    /// Material type management (defect percent per type)
    #[command(subcommand)]
    MatType(MatTypeCommands),

    /// Product management
    #[command(subcommand)]
    Prod(ProdCommands),

    /// Product type management (coefficient per type)
    #[command(subcommand)]
    ProdType(ProdTypeCommands),

    /// Partner company management
    #[command(subcommand)]
    Partner(PartnerCommands),

    /// Bill-of-materials rows linking products to materials
    #[command(subcommand)]
    Link(LinkCommands),

    /// Calculate how much material a production batch still needs
    Calc(CalcArgs),

    /// Check the database connection and show table statistics
    Status(StatusArgs),

    /// Inspect the layered configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Configured default, falling back to tsv
    #[default]
    Auto,
    /// Tab-separated aligned columns
    Tsv,
    /// Comma-separated values
    Csv,
    /// Markdown table
    Md,
    /// JSON
    Json,
    /// YAML
    Yaml,
    /// Keys only, one per line
    Id,
}

impl OutputFormat {
    /// Parse a configured format name (case-insensitive)
    pub fn parse_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name.trim(), true).ok()
    }

    /// Settle `Auto` against the configured default
    pub fn resolve(self, configured: Option<&str>) -> Self {
        match self {
            OutputFormat::Auto => configured
                .and_then(Self::parse_name)
                .filter(|f| *f != OutputFormat::Auto)
                .unwrap_or(OutputFormat::Tsv),
            f => f,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_auto_format_resolution() {
        assert_eq!(OutputFormat::Auto.resolve(None), OutputFormat::Tsv);
        assert_eq!(OutputFormat::Auto.resolve(Some("JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::Auto.resolve(Some("bogus")), OutputFormat::Tsv);
        assert_eq!(OutputFormat::Csv.resolve(Some("json")), OutputFormat::Csv);
    }
}
