//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI parser for `idforge`.
#[derive(Debug, Parser)]
#[command(name = "idforge", version, about = "Generate short, unique random IDs")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate one or more IDs.
    Generate(GenerateArgs),
    /// Check IDs against the validator rules.
    Validate(ValidateArgs),
    /// Estimate the probability that a batch of IDs is collision-free.
    Probability(ProbabilityArgs),
    /// Print a character complexity report for an ID.
    Report(ReportArgs),
    /// Generate a base32 token.
    Token(TokenArgs),
}

/// Arguments for `generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Number of IDs to generate.
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,
    /// ID length in symbols.
    #[arg(short, long)]
    pub size: Option<usize>,
    /// Symbols to draw from.
    #[arg(short, long)]
    pub alphabet: Option<String>,
    /// Per-ID time budget in milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Skip IDs that fail the validator rules.
    #[arg(long)]
    pub validate: bool,
    /// Print Prometheus metrics to stderr when done.
    #[arg(long)]
    pub metrics: bool,
}

/// Arguments for `validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// IDs to check.
    #[arg(required = true)]
    pub ids: Vec<String>,
    /// TOML configuration file with a `[validator]` section.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Extra forbidden regex patterns.
    #[arg(long = "forbid")]
    pub forbidden_patterns: Vec<String>,
}

/// Arguments for `probability`.
#[derive(Debug, Args)]
pub struct ProbabilityArgs {
    /// Number of IDs in the batch.
    pub count: u64,
    /// ID length in symbols.
    #[arg(short, long, default_value_t = idforge::generator::DEFAULT_SIZE)]
    pub size: usize,
    /// Alphabet size.
    #[arg(short = 'k', long, default_value_t = 62)]
    pub alphabet_len: usize,
}

/// Arguments for `report`.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// ID to analyze.
    pub id: String,
    /// Print the report as TOML.
    #[arg(long)]
    pub toml: bool,
}

/// Arguments for `token`.
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token length in characters.
    #[arg(default_value_t = 32)]
    pub length: usize,
}
