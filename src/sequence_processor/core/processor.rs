use super::sequence::Sequence;
use crate::error::Result;

/// A stateless per-record transform replicated across the worker pool.
///
/// Implementations are shared by reference between workers, so any
/// configuration they hold must be immutable once built.
pub trait SequenceProcessor: Sync {
    type Output: Send;

    fn process(&self, sequence: Sequence) -> Result<Self::Output>;
}

/// Outcome of a keep/match transform.
///
/// Emitted for every record so downstream consumers see an explicit result
/// even for records that are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Kept(Sequence),
    Dropped,
}

impl Verdict {
    pub fn is_kept(&self) -> bool {
        matches!(self, Verdict::Kept(_))
    }
}
