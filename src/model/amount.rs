//! Amount type for handling monetary values as they appear in payroll spreadsheets.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may or may not include a currency marker, and that may use either Brazilian (`1.234,56`) or
//! English (`1,234.56`) separators.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use tracing::warn;

/// Represents how amounts were (or should be) formatted.
///
/// # Examples
///  - `AmountFormat{ currency: true, grouping: true, decimal_comma: true }` -> `-R$ 60.000,00`
///  - `AmountFormat{ currency: false, grouping: true, decimal_comma: true }` -> `-60.000,00`
///  - `AmountFormat{ currency: false, grouping: true, decimal_comma: false }` -> `-60,000.00`
///  - `AmountFormat{ currency: false, grouping: false, decimal_comma: false }` -> `-60000.00`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AmountFormat {
    /// Whether the `R$` currency marker is present in the formatting.
    currency: bool,
    /// Whether thousands separators are present in the formatting.
    grouping: bool,
    /// Whether the comma is the decimal separator.
    decimal_comma: bool,
}

impl Default for AmountFormat {
    fn default() -> Self {
        DEFAULT_FORMAT
    }
}

/// The default format is Brazilian reais with grouping: e.g. `-R$ 60.000,00`.
const DEFAULT_FORMAT: AmountFormat = AmountFormat {
    currency: true,
    grouping: true,
    decimal_comma: true,
};

/// Represents a monetary amount.
///
/// Formatting is considered significant for the purposes of equality, so for numeric comparisons,
/// you should access the `Decimal` value and use that.
///
/// # Examples
///
/// ```
/// # use hr_ledger::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("R$ 1.234,56").unwrap();
/// let b = Amount::from_str("1234.56").unwrap();
/// assert_ne!(a, b);
/// assert_eq!(a.value(), b.value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    /// The parsed numerical value.
    value: Decimal,
    /// The way the numerical value was parsed from, or should be written to, a `String`.
    format: AmountFormat,
}

impl Amount {
    /// Creates a new Amount from a Decimal value with default `String` formatting.
    pub const fn new(value: Decimal) -> Self {
        Self {
            value,
            format: DEFAULT_FORMAT,
        }
    }

    /// Creates a new Amount from a Decimal value with the specified formatting.
    pub const fn new_with_format(value: Decimal, format: AmountFormat) -> Self {
        Self { value, format }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.value().is_sign_negative() && !self.is_zero()
    }
}

/// Adds two amounts, capping the result at the bounds of `Decimal` instead of overflowing.
pub(crate) fn add_amounts(total: Decimal, amount: Decimal) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        warn!("A total of {total} plus {amount} overflowed and was capped");
        if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Handle empty string
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // A sign may appear on either side of the currency marker: "-R$ 5,00" or "R$ -5,00"
        let (leading, rest) = strip_sign(trimmed);
        let (currency, rest) = strip_currency(rest);
        let (trailing, rest) = strip_sign(rest);
        parse_number(rest, leading || trailing, currency)
    }
}

fn strip_sign(s: &str) -> (bool, &str) {
    match s.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, s),
    }
}

fn strip_currency(s: &str) -> (bool, &str) {
    if s.len() >= 2 && s.is_char_boundary(2) && s[..2].eq_ignore_ascii_case("R$") {
        (true, s[2..].trim_start())
    } else if let Some(rest) = s.strip_prefix('$') {
        (true, rest.trim_start())
    } else {
        (false, s)
    }
}

fn parse_number(s: &str, negative: bool, currency: bool) -> Result<Amount, AmountError> {
    let (digits, grouping, decimal_comma) = normalize_separators(s);
    let value = Decimal::from_str(&digits).map_err(AmountError)?;
    let value = if negative { -value } else { value };
    Ok(Amount::new_with_format(
        value,
        AmountFormat {
            currency,
            grouping,
            decimal_comma,
        },
    ))
}

/// Rewrites `s` with `.` as the only decimal separator and no grouping. Returns the rewritten
/// digits along with whether grouping was present and whether the decimal separator was a comma.
fn normalize_separators(s: &str) -> (String, bool, bool) {
    let commas = s.matches(',').count();
    let dots = s.matches('.').count();
    match (s.rfind(','), s.rfind('.')) {
        // "1.234,56"
        (Some(c), Some(d)) if c > d => (s.replace('.', "").replace(',', "."), true, true),
        // "1,234.56"
        (Some(_), Some(_)) => (s.replace(',', ""), true, false),
        // "1234,56"
        (Some(_), None) if commas == 1 => (s.replace(',', "."), false, true),
        // "1,234,567"
        (Some(_), None) => (s.replace(',', ""), true, false),
        // "1.234.567"
        (None, Some(_)) if dots > 1 => (s.replace('.', ""), true, true),
        _ => (s.to_string(), false, false),
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            ("-", self.value().abs())
        } else {
            ("", self.value())
        };

        let cur = if self.format.currency { "R$ " } else { "" };

        let digits = if self.format.grouping {
            let english = format_num::format_num!(",.2", num.to_f64().unwrap_or_default());
            if self.format.decimal_comma {
                swap_separators(&english)
            } else {
                english
            }
        } else if self.format.decimal_comma {
            num.to_string().replace('.', ",")
        } else {
            num.to_string()
        };

        write!(f, "{sign}{cur}{digits}")
    }
}

fn swap_separators(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ',' => '.',
            '.' => ',',
            other => other,
        })
        .collect()
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
