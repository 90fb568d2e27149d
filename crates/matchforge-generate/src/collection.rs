use rand::Rng;
use tracing::{debug, warn};

use crate::anchor::AnchorInjector;
use crate::errors::GenerationError;
use crate::records::{FixtureRecord, Synthesizer};

/// An ordered dataset of one record kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    records: Vec<T>,
    anchored: bool,
}

impl<T: FixtureRecord> Collection<T> {
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    /// Index 0 holds the anchor.
    pub fn anchored(&self) -> bool {
        self.anchored
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Build exactly `count` records. With the anchor applied it takes slot 0 and
/// the remaining `count - 1` are synthesized.
pub fn build_collection<T, R>(
    synthesizer: &Synthesizer<'_>,
    count: u64,
    injector: AnchorInjector,
    rng: &mut R,
) -> Result<Collection<T>, GenerationError>
where
    T: FixtureRecord,
    R: Rng + ?Sized,
{
    let capacity = usize::try_from(count).map_err(|_| {
        GenerationError::InvalidOptions(format!("{} count {count} is too large", T::KIND))
    })?;

    if injector.requested() && count == 0 {
        warn!(kind = %T::KIND, "anchor requested for an empty collection; skipping anchor");
    }
    let anchored = injector.applies_to(count);

    let mut records = Vec::new();
    records.try_reserve_exact(capacity).map_err(|err| {
        GenerationError::InvalidOptions(format!(
            "{} count {count} cannot be allocated: {err}",
            T::KIND
        ))
    })?;
    if anchored {
        records.push(T::anchor());
    }
    while records.len() < capacity {
        records.push(T::synthesize(synthesizer, rng)?);
    }

    debug!(kind = %T::KIND, records = records.len(), anchored, "collection built");
    Ok(Collection { records, anchored })
}
