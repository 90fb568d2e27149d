//! Record shapes and the synthesizer that fills them.
//!
//! Subject and watchlist records are distinct types; a subject record cannot
//! carry a program or an alias. Both implement [`FixtureRecord`], which is
//! what the collection builder and the tabular writer are generic over.

use std::fmt;

use chrono::{Days, NaiveDate};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;
use crate::model::GenerationPolicy;
use crate::pools::{AttributePools, PoolKind};

/// Discriminant for the two record shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Subject,
    Watchlist,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Subject => f.write_str("subject"),
            RecordKind::Watchlist => f.write_str("watchlist"),
        }
    }
}

/// One natural person on the client side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub country: String,
}

/// One sanctions/watchlist entry on the server side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatchlistRecord {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub country: String,
    pub program: String,
    /// Empty, or exactly one alternate full name.
    pub aliases: String,
}

impl WatchlistRecord {
    /// The subject-shaped projection used for cross-dataset matching.
    pub fn subject(&self) -> SubjectRecord {
        SubjectRecord {
            name: self.name.clone(),
            date_of_birth: self.date_of_birth,
            country: self.country.clone(),
        }
    }

    pub fn has_alias(&self) -> bool {
        !self.aliases.is_empty()
    }
}

/// The (name, date_of_birth, country) triple two records match on.
pub type MatchKey<'a> = (&'a str, NaiveDate, &'a str);

/// Behavior shared by both record shapes.
pub trait FixtureRecord: Clone + Serialize + DeserializeOwned {
    const KIND: RecordKind;
    /// Column order of the dataset file.
    const FIELDS: &'static [&'static str];

    /// Value of `field` rendered for a delimited file.
    fn field(&self, field: &str) -> Option<String>;

    fn match_key(&self) -> MatchKey<'_>;

    /// The fixed anchor value for this record shape.
    fn anchor() -> Self;

    fn synthesize<R: Rng + ?Sized>(
        synthesizer: &Synthesizer<'_>,
        rng: &mut R,
    ) -> Result<Self, GenerationError>;
}

impl FixtureRecord for SubjectRecord {
    const KIND: RecordKind = RecordKind::Subject;
    const FIELDS: &'static [&'static str] = &["name", "date_of_birth", "country"];

    fn field(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "date_of_birth" => Some(format_date(self.date_of_birth)),
            "country" => Some(self.country.clone()),
            _ => None,
        }
    }

    fn match_key(&self) -> MatchKey<'_> {
        (self.name.as_str(), self.date_of_birth, self.country.as_str())
    }

    fn anchor() -> Self {
        crate::anchor::subject_anchor()
    }

    fn synthesize<R: Rng + ?Sized>(
        synthesizer: &Synthesizer<'_>,
        rng: &mut R,
    ) -> Result<Self, GenerationError> {
        synthesizer.subject(rng)
    }
}

impl FixtureRecord for WatchlistRecord {
    const KIND: RecordKind = RecordKind::Watchlist;
    const FIELDS: &'static [&'static str] =
        &["name", "date_of_birth", "country", "program", "aliases"];

    fn field(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "date_of_birth" => Some(format_date(self.date_of_birth)),
            "country" => Some(self.country.clone()),
            "program" => Some(self.program.clone()),
            "aliases" => Some(self.aliases.clone()),
            _ => None,
        }
    }

    fn match_key(&self) -> MatchKey<'_> {
        (self.name.as_str(), self.date_of_birth, self.country.as_str())
    }

    fn anchor() -> Self {
        crate::anchor::watchlist_anchor()
    }

    fn synthesize<R: Rng + ?Sized>(
        synthesizer: &Synthesizer<'_>,
        rng: &mut R,
    ) -> Result<Self, GenerationError> {
        synthesizer.watchlist(rng)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Composes records by sampling each attribute independently.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'a> {
    pools: &'a AttributePools,
    policy: GenerationPolicy,
}

impl<'a> Synthesizer<'a> {
    pub fn new(pools: &'a AttributePools, policy: GenerationPolicy) -> Self {
        Self { pools, policy }
    }

    pub fn pools(&self) -> &AttributePools {
        self.pools
    }

    pub fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    pub fn subject<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SubjectRecord, GenerationError> {
        let name = self.pools.full_name(rng)?;
        let date_of_birth = self.date_of_birth(rng);
        let country = self.pools.draw(PoolKind::Countries, rng)?.to_string();
        Ok(SubjectRecord {
            name,
            date_of_birth,
            country,
        })
    }

    pub fn watchlist<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<WatchlistRecord, GenerationError> {
        let SubjectRecord {
            name,
            date_of_birth,
            country,
        } = self.subject(rng)?;
        let program = self.pools.draw(PoolKind::Programs, rng)?.to_string();
        let aliases = if rng.random::<f64>() < self.policy.alias_probability {
            self.pools.full_name(rng)?
        } else {
            String::new()
        };
        Ok(WatchlistRecord {
            name,
            date_of_birth,
            country,
            program,
            aliases,
        })
    }

    /// Uniform over calendar days in range, so leap years weigh one day more.
    pub fn date_of_birth<R: Rng + ?Sized>(&self, rng: &mut R) -> NaiveDate {
        let range = self.policy.date_range;
        let offset = rng.random_range(0..=range.span_days());
        range
            .earliest()
            .checked_add_days(Days::new(offset))
            .unwrap_or(range.latest())
    }
}
