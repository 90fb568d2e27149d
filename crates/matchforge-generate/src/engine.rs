use std::path::PathBuf;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::anchor::AnchorInjector;
use crate::collection::{Collection, build_collection};
use crate::collision::{
    CollisionEstimate, count_matches, max_balanced_count, minimum_universe_for,
};
use crate::errors::GenerationError;
use crate::model::{FileReport, GenerateOptions, GenerationPolicy, GenerationReport};
use crate::output::{WrittenFile, write_records};
use crate::pools::AttributePools;
use crate::records::{FixtureRecord, SubjectRecord, Synthesizer, WatchlistRecord};

/// Both datasets of one run, held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Datasets {
    pub subjects: Collection<SubjectRecord>,
    pub watchlist: Collection<WatchlistRecord>,
}

impl Datasets {
    /// Subjects first, then watchlist, from one shared random source.
    pub fn generate<R: Rng + ?Sized>(
        pools: &AttributePools,
        policy: GenerationPolicy,
        subject_count: u64,
        watchlist_count: u64,
        include_anchor: bool,
        rng: &mut R,
    ) -> Result<Self, GenerationError> {
        pools.validate()?;
        let synthesizer = Synthesizer::new(pools, policy);
        let injector = AnchorInjector::new(include_anchor);
        let subjects = build_collection(&synthesizer, subject_count, injector, rng)?;
        let watchlist = build_collection(&synthesizer, watchlist_count, injector, rng)?;
        Ok(Self {
            subjects,
            watchlist,
        })
    }

    pub fn anchored(&self) -> bool {
        self.subjects.anchored() && self.watchlist.anchored()
    }

    pub fn observed_matches(&self) -> u64 {
        count_matches(self.subjects.records(), self.watchlist.records())
    }
}

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub report_path: PathBuf,
    pub report: GenerationReport,
}

/// Entry point for producing a subject/watchlist fixture pair on disk.
#[derive(Debug, Clone)]
pub struct FixtureEngine {
    options: GenerateOptions,
}

impl FixtureEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Pools from `assets_dir` when configured, built-ins otherwise.
    pub fn pools(&self) -> Result<AttributePools, GenerationError> {
        let pools = match &self.options.assets_dir {
            Some(dir) => AttributePools::from_assets(dir)?,
            None => AttributePools::builtin(),
        };
        pools.validate()?;
        Ok(pools)
    }

    /// Estimate accidental-match risk for the configured sizes without
    /// generating anything.
    pub fn estimate(&self) -> Result<CollisionEstimate, GenerationError> {
        self.options.validate()?;
        let pools = self.pools()?;
        let date_range = self.options.date_range()?;
        let anchor = AnchorInjector::new(self.options.include_anchor);
        Ok(CollisionEstimate::compute(
            &pools,
            &date_range,
            self.options.subject_count,
            self.options.watchlist_count,
            anchor.applies_to(self.options.subject_count)
                && anchor.applies_to(self.options.watchlist_count),
        ))
    }

    /// Run with a ChaCha8 source seeded from `options.seed`, or from a fresh
    /// OS-backed seed that is recorded in the report.
    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        let seed = self.options.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.execute(Some(seed), &mut rng)
    }

    /// Run with a caller-owned random source. The report carries no seed.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<GenerationResult, GenerationError> {
        self.execute(None, rng)
    }

    fn execute<R: Rng + ?Sized>(
        &self,
        seed: Option<u64>,
        rng: &mut R,
    ) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let started_at = chrono::Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let options = &self.options;

        options.validate()?;
        let pools = self.pools()?;
        let policy = options.policy()?;

        info!(
            run_id = %run_id,
            seed = ?seed,
            subjects = options.subject_count,
            watchlist = options.watchlist_count,
            include_anchor = options.include_anchor,
            "generation started"
        );

        let datasets = Datasets::generate(
            &pools,
            policy,
            options.subject_count,
            options.watchlist_count,
            options.include_anchor,
            rng,
        )?;

        std::fs::create_dir_all(&options.out_dir)?;
        let subjects = write_dataset(&options.subject_path(), &datasets.subjects)?;
        let watchlist = write_dataset(&options.watchlist_path(), &datasets.watchlist)?;

        let anchor_included = datasets.anchored();
        let collision = CollisionEstimate::compute(
            &pools,
            &policy.date_range,
            subjects.rows,
            watchlist.rows,
            anchor_included,
        );
        if collision.exceeds(options.max_collision_probability) {
            warn!(
                probability = collision.probability_any,
                max_probability = options.max_collision_probability,
                universe_size = collision.universe_size,
                suggested_max_records =
                    max_balanced_count(collision.universe_size, options.max_collision_probability),
                required_universe = minimum_universe_for(
                    collision.random_pairs,
                    options.max_collision_probability
                ),
                "accidental match risk above threshold"
            );
        }

        let observed_matches = datasets.observed_matches();
        let report = GenerationReport {
            run_id: run_id.clone(),
            started_at,
            seed,
            anchor_included,
            subjects: file_report(subjects, datasets.subjects.anchored()),
            watchlist: file_report(watchlist, datasets.watchlist.anchored()),
            collision,
            observed_matches,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        let report_path = options.report_path();
        std::fs::write(&report_path, serde_json::to_vec_pretty(&report)?)?;

        info!(
            run_id = %run_id,
            observed_matches,
            accidental_matches = report.accidental_matches(),
            probability_any = collision.probability_any,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult {
            report_path,
            report,
        })
    }
}

fn write_dataset<T: FixtureRecord>(
    path: &std::path::Path,
    collection: &Collection<T>,
) -> Result<WrittenFile, GenerationError> {
    let written = write_records(path, collection.records(), T::FIELDS)?;
    info!(
        kind = %T::KIND,
        path = %written.path.display(),
        rows = written.rows,
        bytes = written.bytes_written,
        "dataset written"
    );
    Ok(written)
}

fn file_report(written: WrittenFile, anchored: bool) -> FileReport {
    FileReport {
        path: written.path,
        rows: written.rows,
        bytes_written: written.bytes_written,
        sha256: written.sha256,
        anchored,
    }
}
