//! Types that represent the core data model, such as `RawSourceTable` and `CanonicalRecord`.
mod amount;
mod cell;
mod ledger;
mod period;
mod record;
mod table;

pub(crate) use amount::add_amounts;
pub use amount::{Amount, AmountError, AmountFormat};
pub use cell::Cell;
pub use ledger::Ledger;
pub use period::{Period, PeriodError};
pub use record::{CanonicalRecord, Dimensions, Movement, MovementType, CANONICAL_FIELDS};
pub use table::{Header, RawSourceTable};
