use std::path::{Path, PathBuf};

use clap::Args;
use matchforge_generate::GenerateOptions;

use crate::CliError;

/// Generation settings. Flags override values loaded from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerationArgs {
    /// TOML file with generation options.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Output directory for both datasets and the run report.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
    /// Record count for both datasets (anchor included).
    #[arg(long, value_name = "N")]
    pub count: Option<u64>,
    /// Subject (client) record count; overrides --count.
    #[arg(long, value_name = "N")]
    pub subject_count: Option<u64>,
    /// Watchlist (server) record count; overrides --count.
    #[arg(long, value_name = "N")]
    pub watchlist_count: Option<u64>,
    /// Inject the shared anchor record, overriding the config file.
    #[arg(long, default_value_t = false, overrides_with = "no_anchor")]
    pub anchor: bool,
    /// Do not inject the shared anchor record.
    #[arg(long, default_value_t = false, overrides_with = "anchor")]
    pub no_anchor: bool,
    /// Seed for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Earliest year of birth.
    #[arg(long)]
    pub start_year: Option<i32>,
    /// Latest year of birth.
    #[arg(long)]
    pub end_year: Option<i32>,
    /// Probability that a watchlist record carries an alias.
    #[arg(long)]
    pub alias_probability: Option<f64>,
    /// Accidental-match probability that triggers a sizing warning.
    #[arg(long)]
    pub max_collision_probability: Option<f64>,
    /// Directory with pool overrides (given_names.txt, family_names.txt,
    /// countries.txt, programs.txt).
    #[arg(long)]
    pub assets_dir: Option<PathBuf>,
    /// File name of the subject dataset.
    #[arg(long)]
    pub subject_file: Option<String>,
    /// File name of the watchlist dataset.
    #[arg(long)]
    pub watchlist_file: Option<String>,
}

impl GenerationArgs {
    pub fn resolve(self) -> Result<GenerateOptions, CliError> {
        let mut options = match &self.config {
            Some(path) => load_options(path)?,
            None => GenerateOptions::default(),
        };
        self.apply(&mut options);
        Ok(options)
    }

    fn apply(self, options: &mut GenerateOptions) {
        if let Some(out_dir) = self.out_dir {
            options.out_dir = out_dir;
        }
        if let Some(count) = self.count {
            options.subject_count = count;
            options.watchlist_count = count;
        }
        if let Some(count) = self.subject_count {
            options.subject_count = count;
        }
        if let Some(count) = self.watchlist_count {
            options.watchlist_count = count;
        }
        if self.anchor {
            options.include_anchor = true;
        }
        if self.no_anchor {
            options.include_anchor = false;
        }
        if self.seed.is_some() {
            options.seed = self.seed;
        }
        if let Some(year) = self.start_year {
            options.start_year = year;
        }
        if let Some(year) = self.end_year {
            options.end_year = year;
        }
        if let Some(probability) = self.alias_probability {
            options.alias_probability = probability;
        }
        if let Some(probability) = self.max_collision_probability {
            options.max_collision_probability = probability;
        }
        if self.assets_dir.is_some() {
            options.assets_dir = self.assets_dir;
        }
        if let Some(name) = self.subject_file {
            options.subject_file = name;
        }
        if let Some(name) = self.watchlist_file {
            options.watchlist_file = name;
        }
    }
}

pub fn load_options(path: &Path) -> Result<GenerateOptions, CliError> {
    let content = std::fs::read_to_string(path)?;
    let options: GenerateOptions = toml::from_str(&content)?;
    Ok(options)
}
