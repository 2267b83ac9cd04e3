use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month used to bucket events for reporting.
/// Serializes to a string format like "03/2025" for spreadsheet and JSON compatibility.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Returns `None` if `month` is not in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }
}

impl From<NaiveDate> for Period {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

/// An error that can occur when parsing a `Period` from a string.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PeriodError(String);

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for PeriodError {}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Expected format: "MM/YYYY"
        let s = s.trim();
        let (month, year) = s
            .split_once('/')
            .ok_or_else(|| PeriodError(format!("Period must be in format 'MM/YYYY', got: {s}")))?;

        let month = month
            .trim()
            .parse::<u32>()
            .map_err(|e| PeriodError(format!("Invalid month in '{s}': {e}")))?;
        let year = year
            .trim()
            .parse::<i32>()
            .map_err(|e| PeriodError(format!("Invalid year in '{s}': {e}")))?;

        Period::new(year, month)
            .ok_or_else(|| PeriodError(format!("Month must be between 1 and 12, got: {s}")))
    }
}

impl Serialize for Period {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Period::from_str(&s).map_err(serde::de::Error::custom)
    }
}
