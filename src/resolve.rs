//! Picks which of several possible column names a source table actually uses.

use crate::model::RawSourceTable;
use tracing::trace;

/// Returns the first name in `candidates` that is a column of `table`, or `None` when none of
/// them are present. Candidates are checked in the order given, so earlier names win when a
/// table happens to carry more than one of them.
pub fn resolve<'a>(table: &RawSourceTable, candidates: &[&'a str]) -> Option<&'a str> {
    let found = candidates.iter().copied().find(|c| table.has_column(c));
    trace!("Resolved {candidates:?} to {found:?}");
    found
}
