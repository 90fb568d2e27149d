//! The one designed match shared by both datasets.
//!
//! Anchor values are literals; they never pass through the pools or the
//! random source.

use chrono::NaiveDate;

use crate::records::{SubjectRecord, WatchlistRecord};

pub const ANCHOR_NAME: &str = "Christina Vargas";
pub const ANCHOR_COUNTRY: &str = "AU";
pub const ANCHOR_PROGRAM: &str = "OFAC SDN";
const ANCHOR_BIRTH: (i32, u32, u32) = (1995, 7, 23);

pub fn anchor_date_of_birth() -> NaiveDate {
    let (year, month, day) = ANCHOR_BIRTH;
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn subject_anchor() -> SubjectRecord {
    SubjectRecord {
        name: ANCHOR_NAME.to_string(),
        date_of_birth: anchor_date_of_birth(),
        country: ANCHOR_COUNTRY.to_string(),
    }
}

pub fn watchlist_anchor() -> WatchlistRecord {
    WatchlistRecord {
        name: ANCHOR_NAME.to_string(),
        date_of_birth: anchor_date_of_birth(),
        country: ANCHOR_COUNTRY.to_string(),
        program: ANCHOR_PROGRAM.to_string(),
        aliases: String::new(),
    }
}

/// Anchor injection decision for one collection.
///
/// An anchor needs a slot: with a requested count of zero it is dropped and
/// the collection stays empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorInjector {
    include: bool,
}

impl AnchorInjector {
    pub fn new(include: bool) -> Self {
        Self { include }
    }

    pub fn requested(&self) -> bool {
        self.include
    }

    /// Whether a collection of `count` records gets the anchor at index 0.
    pub fn applies_to(&self, count: u64) -> bool {
        self.include && count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_triple_is_fixed() {
        let subject = subject_anchor();
        assert_eq!(subject.name, "Christina Vargas");
        assert_eq!(subject.date_of_birth.to_string(), "1995-07-23");
        assert_eq!(subject.country, "AU");
    }

    #[test]
    fn watchlist_anchor_has_program_and_no_alias() {
        let record = watchlist_anchor();
        assert_eq!(record.program, "OFAC SDN");
        assert!(record.aliases.is_empty());
        assert_eq!(record.subject(), subject_anchor());
    }

    #[test]
    fn zero_count_clamps_anchor() {
        let injector = AnchorInjector::new(true);
        assert!(!injector.applies_to(0));
        assert!(injector.applies_to(1));
        assert!(!AnchorInjector::new(false).applies_to(10));
    }
}
