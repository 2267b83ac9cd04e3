use crate::model::{CanonicalRecord, Ledger};

/// Concatenates normalized record sequences into one `Ledger`. Sequences are taken in the order
/// given and the order of records within each sequence is kept.
///
/// Every `CanonicalRecord` already carries the full schema with zero or empty defaults, so there
/// is nothing to fill in here.
pub fn unify<I>(sources: I) -> Ledger
where
    I: IntoIterator<Item = Vec<CanonicalRecord>>,
{
    Ledger::new(sources.into_iter().flatten().collect())
}
