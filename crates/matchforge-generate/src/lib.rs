//! Synthetic paired fixtures for screening/matching pipelines.
//!
//! Produces a subject (client) dataset and a watchlist (server) dataset whose
//! only designed overlap is a single anchor record at row 0 of both files.
//! Everything else is drawn from fixed attribute pools, sized so accidental
//! matches stay rare.

pub mod anchor;
pub mod assets;
pub mod collection;
pub mod collision;
pub mod engine;
pub mod errors;
pub mod model;
pub mod output;
pub mod pools;
pub mod records;

pub use anchor::AnchorInjector;
pub use collection::{Collection, build_collection};
pub use collision::CollisionEstimate;
pub use engine::{Datasets, FixtureEngine, GenerationResult};
pub use errors::GenerationError;
pub use model::{DateRange, FileReport, GenerateOptions, GenerationPolicy, GenerationReport};
pub use pools::{AttributePools, PoolKind};
pub use records::{FixtureRecord, RecordKind, SubjectRecord, Synthesizer, WatchlistRecord};
