//! idforge CLI
//!
//! Command-line front end for generating, validating and inspecting IDs.

mod cli;

use clap::Parser;
use cli::{Cli, Command, GenerateArgs, ProbabilityArgs, ReportArgs, TokenArgs, ValidateArgs};
use idforge::{
    generator::{id_space, max_attempts, uniqueness_probability, DEFAULT_UNIQUENESS_PRESSURE},
    metrics::{MetricsError, MetricsRegistry, MetricsSnapshot},
    ComplexityReport, ConfigError, Context, FileConfig, GenerateError, Generator, IdValidator,
    RandomError, ValidationError,
};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Consecutive validator rejections tolerated before giving up.
const MAX_CONSECUTIVE_REJECTIONS: usize = 100;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Random(#[from] RandomError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),
    #[error("failed to serialize report: {0}")]
    Report(#[from] toml::ser::Error),
    #[error("{rejected} consecutive IDs failed validation, last: {last}")]
    Rejected {
        rejected: usize,
        last: ValidationError,
    },
    #[error("{failed} of {total} IDs failed validation")]
    Invalid { failed: usize, total: usize },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    debug!("idforge v{}", idforge::VERSION);

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Validate(args) => run_validate(args),
        Command::Probability(args) => run_probability(args),
        Command::Report(args) => run_report(args),
        Command::Token(args) => run_token(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            FileConfig::from_file(path)
        }
        None => Ok(FileConfig::default()),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let file = load_config(args.config.as_deref())?;

    let mut section = file.generator;
    if let Some(size) = args.size {
        section.size = size;
    }
    if let Some(alphabet) = args.alphabet {
        section.alphabet = alphabet.into();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        section.max_generation_ms = timeout_ms;
    }

    let generator = Generator::new(section.to_config()?);
    let validator = if args.validate {
        Some(file.validator.to_validator()?)
    } else {
        None
    };

    let ctx = Context::background();
    let handler_ctx = ctx.clone();
    ctrlc::set_handler(move || handler_ctx.cancel())?;

    let mut produced = 0;
    let mut rejected = 0;
    while produced < args.count {
        let id = generator.generate(&ctx)?;

        if let Some(validator) = &validator {
            if let Err(e) = validator.validate(&id) {
                rejected += 1;
                debug!(rejected, "discarding ID that failed validation");
                if rejected >= MAX_CONSECUTIVE_REJECTIONS {
                    return Err(CliError::Rejected { rejected, last: e });
                }
                continue;
            }
        }

        rejected = 0;
        produced += 1;
        println!("{id}");
    }

    let stats = generator.stats();
    info!(
        issued = stats.issued,
        collisions = stats.collisions,
        resets = stats.resets,
        "generation complete"
    );

    if args.metrics {
        let registry = MetricsRegistry::new()?;
        registry.update(&MetricsSnapshot::from_stats(&stats));
        eprint!("{}", registry.encode()?);
    }

    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let file = load_config(args.config.as_deref())?;
    let mut validator: IdValidator = file.validator.to_validator()?;
    for pattern in &args.forbidden_patterns {
        validator = validator
            .with_forbidden_pattern(pattern)
            .map_err(ConfigError::from)?;
    }

    let mut failed = 0;
    for id in &args.ids {
        match validator.validate(id) {
            Ok(()) => println!("{id}: ok"),
            Err(e) => {
                failed += 1;
                println!("{id}: {e}");
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Invalid {
            failed,
            total: args.ids.len(),
        });
    }
    Ok(())
}

fn run_probability(args: ProbabilityArgs) -> Result<(), CliError> {
    if args.alphabet_len < 2 || args.size == 0 {
        warn!(
            alphabet_len = args.alphabet_len,
            size = args.size,
            "degenerate ID space"
        );
    }

    let p = uniqueness_probability(args.alphabet_len, args.size, args.count);
    println!("id space:        {:e}", id_space(args.alphabet_len, args.size));
    println!(
        "max attempts:    {}",
        max_attempts(args.alphabet_len, args.size, DEFAULT_UNIQUENESS_PRESSURE)
    );
    println!("P(no collision): {p:.12}");
    Ok(())
}

fn run_report(args: ReportArgs) -> Result<(), CliError> {
    let report = ComplexityReport::analyze(&args.id);
    if args.toml {
        print!("{}", toml::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn run_token(args: TokenArgs) -> Result<(), CliError> {
    println!("{}", idforge::secure_token(args.length)?);
    Ok(())
}
