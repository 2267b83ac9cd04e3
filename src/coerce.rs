//! Total conversions from loosely-typed spreadsheet cells into amounts, dates and text.
//!
//! None of these functions fail. A cell that cannot be interpreted becomes zero (amounts), absent
//! (dates) or an empty string (text), and a column that cannot be resolved behaves like a column
//! of such cells. Output always has exactly one value per input row, in row order.

use crate::model::{Amount, Cell, RawSourceTable};
use crate::resolve::resolve;
use chrono::{Days, NaiveDate};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// The largest spreadsheet serial day number, 9999-12-31.
const MAX_SERIAL_DAY: f64 = 2_958_465.0;

/// Converts a column of cells to decimal amounts. Anything that is not a parseable number,
/// including empty cells, becomes `0`.
pub fn coerce<'a>(column: impl IntoIterator<Item = &'a Cell>) -> Vec<Decimal> {
    column.into_iter().map(amount).collect()
}

/// Converts a single cell to a decimal amount, or `0` if it does not hold a number.
pub fn amount(cell: &Cell) -> Decimal {
    match cell {
        Cell::Number(n) => Decimal::from_f64(*n).unwrap_or(Decimal::ZERO),
        Cell::Text(s) => Amount::from_str(s)
            .map(|a| a.value())
            .unwrap_or(Decimal::ZERO),
        Cell::Empty | Cell::Bool(_) | Cell::Date(_) => Decimal::ZERO,
    }
}

/// Coerces the first column of `table` found among `candidates`. When none is found, returns a
/// zero for every row.
pub fn amounts(table: &RawSourceTable, candidates: &[&str]) -> Vec<Decimal> {
    resolve(table, candidates)
        .and_then(|name| table.column(name))
        .map(|column| coerce(column))
        .unwrap_or_else(|| vec![Decimal::ZERO; table.len()])
}

/// Interprets a cell as a calendar date.
///
/// - Date cells are used as they are.
/// - Numbers are spreadsheet serial day numbers (1900 date system).
/// - Text may be `dd/mm/yyyy`, `dd/mm/yy`, `dd-mm-yyyy` or `yyyy-mm-dd`, optionally followed by a
///   time, or `mm/yyyy` for the first day of that month.
pub fn date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(d) => Some(*d),
        Cell::Number(n) => serial_date(*n),
        Cell::Text(s) => parse_date(s),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

/// Dates from the first column of `table` found among `candidates`, or all `None`.
pub fn dates(table: &RawSourceTable, candidates: &[&str]) -> Vec<Option<NaiveDate>> {
    resolve(table, candidates)
        .and_then(|name| table.column(name))
        .map(|column| column.map(date).collect())
        .unwrap_or_else(|| vec![None; table.len()])
}

/// Text values from the first column of `table` found among `candidates`, or all empty.
pub fn texts(table: &RawSourceTable, candidates: &[&str]) -> Vec<String> {
    resolve(table, candidates)
        .and_then(|name| table.column(name))
        .map(|column| column.map(Cell::to_dimension).collect())
        .unwrap_or_else(|| vec![String::new(); table.len()])
}

/// Converts a spreadsheet serial day number (1900 date system) to a date.
pub(crate) fn serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_SERIAL_DAY {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    // Drop any time component: "2025-03-07 00:00:00" or "2025-03-07T00:00:00"
    let day = s.split(|c: char| c.is_whitespace() || c == 'T').next()?;

    if day.contains('/') {
        let parts: Vec<&str> = day.split('/').collect();
        return match parts.as_slice() {
            [_, _, year] if year.len() == 2 => NaiveDate::parse_from_str(day, "%d/%m/%y").ok(),
            [_, _, _] => NaiveDate::parse_from_str(day, "%d/%m/%Y").ok(),
            [month, year] => {
                NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
            }
            _ => None,
        };
    }

    if day.contains('-') {
        let first = day.split('-').next()?;
        let fmt = if first.len() == 4 { "%Y-%m-%d" } else { "%d-%m-%Y" };
        return NaiveDate::parse_from_str(day, fmt).ok();
    }

    None
}
