mod config;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use matchforge_generate::collision::{max_balanced_count, minimum_universe_for};
use matchforge_generate::{FixtureEngine, GenerationError};
use thiserror::Error;

use config::GenerationArgs;
use logging::{LogFormat, init_logging};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Config(#[from] toml::de::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "matchforge",
    version,
    about = "Generate paired client/watchlist fixtures with one guaranteed match"
)]
struct Cli {
    /// Log output format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,
    /// Append JSON log lines to this file instead of stderr. The file is
    /// always JSON, so this cannot be combined with --log-format.
    #[arg(long, value_name = "PATH", global = true, conflicts_with = "log_format")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the subject and watchlist datasets plus a run report.
    Generate(GenerationArgs),
    /// Print the accidental-match estimate for the configured sizes.
    Estimate(GenerationArgs),
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_file.as_deref())?;

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Estimate(args) => run_estimate(args),
    }
}

fn run_generate(args: GenerationArgs) -> Result<(), CliError> {
    let options = args.resolve()?;
    let engine = FixtureEngine::new(options);
    let result = engine.run()?;
    let report = &result.report;

    println!(
        "generated {} with {} records",
        report.subjects.path.display(),
        report.subjects.rows
    );
    println!(
        "generated {} with {} records",
        report.watchlist.path.display(),
        report.watchlist.rows
    );
    if let Some(seed) = report.seed {
        println!("seed: {seed}");
    }
    if report.anchor_included {
        println!("designed matches: 1 (row 1 of both files)");
    } else {
        println!("designed matches: 0");
    }
    println!(
        "accidental matches: {} (estimated probability {:.4}%)",
        report.accidental_matches(),
        report.collision.probability_any * 100.0
    );
    println!("report: {}", result.report_path.display());

    Ok(())
}

fn run_estimate(args: GenerationArgs) -> Result<(), CliError> {
    let options = args.resolve()?;
    let engine = FixtureEngine::new(options);
    let estimate = engine.estimate()?;
    let max_probability = engine.options().max_collision_probability;

    println!("universe size: {}", estimate.universe_size);
    println!("random pairs: {}", estimate.random_pairs);
    println!("expected collisions: {:.6}", estimate.expected_collisions);
    println!(
        "probability of any collision: {:.4}%",
        estimate.probability_any * 100.0
    );
    println!(
        "largest balanced size under {:.2}%: {}",
        max_probability * 100.0,
        max_balanced_count(estimate.universe_size, max_probability)
    );
    println!(
        "smallest universe for these sizes under {:.2}%: {}",
        max_probability * 100.0,
        minimum_universe_for(estimate.random_pairs, max_probability)
    );

    if estimate.exceeds(max_probability) {
        tracing::warn!(
            probability = estimate.probability_any,
            max_probability,
            "configured sizes exceed the collision threshold"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_args(args: &[&str]) -> GenerationArgs {
        let cli = Cli::try_parse_from(args).expect("parse cli");
        match cli.command {
            Command::Generate(args) | Command::Estimate(args) => args,
        }
    }

    #[test]
    fn log_file_conflicts_with_log_format() {
        let parsed = Cli::try_parse_from([
            "matchforge",
            "--log-format",
            "text",
            "--log-file",
            "run.log",
            "generate",
        ]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from(["matchforge", "--log-file", "run.log", "generate"]);
        assert!(parsed.is_ok());
    }

    #[test]
    fn last_anchor_flag_wins() {
        let args = generate_args(&["matchforge", "generate", "--no-anchor", "--anchor"]);
        assert!(args.anchor && !args.no_anchor);

        let args = generate_args(&["matchforge", "generate", "--anchor", "--no-anchor"]);
        assert!(!args.anchor && args.no_anchor);
    }

    #[test]
    fn negative_count_is_rejected_by_parser() {
        let parsed = Cli::try_parse_from(["matchforge", "generate", "--count", "-5"]);
        assert!(parsed.is_err());
    }
}
