//! Tabular export of ledger records.

use crate::model::{CanonicalRecord, CANONICAL_FIELDS};
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// The output format for `export`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma separated, with a header row of field names.
    #[default]
    Csv,
    /// A pretty-printed JSON array of objects.
    Json,
}

serde_plain::derive_display_from_serialize!(ExportFormat);
serde_plain::derive_fromstr_from_deserialize!(ExportFormat);

/// Writes `records` to `writer` in `format`.
pub fn write<'a, W, I>(writer: W, records: I, format: ExportFormat) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    match format {
        ExportFormat::Csv => write_csv(writer, records),
        ExportFormat::Json => write_json(writer, records),
    }
}

/// Writes a header row of canonical field names followed by one row per record. Absent dates and
/// periods are written as empty fields.
pub fn write_csv<'a, W, I>(writer: W, records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    // The header is written explicitly so an empty export still has one.
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(CANONICAL_FIELDS)
        .context("Unable to write the CSV header")?;
    for record in records {
        wtr.serialize(record)
            .context("Unable to write a record as CSV")?;
    }
    wtr.flush().context("Unable to flush the CSV output")?;
    Ok(())
}

pub fn write_json<'a, W, I>(mut writer: W, records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    let records: Vec<&CanonicalRecord> = records.into_iter().collect();
    serde_json::to_writer_pretty(&mut writer, &records)
        .context("Unable to write records as JSON")?;
    writeln!(writer).context("Unable to write the JSON output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dimensions, Movement};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn records() -> Vec<CanonicalRecord> {
        vec![
            CanonicalRecord::new(
                Dimensions {
                    employee: "Ana".to_string(),
                    event_date: NaiveDate::from_ymd_opt(2025, 3, 7),
                    branch: "B1".to_string(),
                    ..Dimensions::default()
                },
                Movement::Exam {
                    cost: Decimal::new(8550, 2),
                },
            )
            .with_producer("Farm X"),
            CanonicalRecord::new(Dimensions::default(), Movement::Admission),
        ]
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        write_csv(&mut out, &records()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CANONICAL_FIELDS.join(","));
        assert_eq!(
            lines[1],
            "Ana,2025-03-07,03/2025,B1,,,Farm X,Exam,,0,0,85.50,0,0,0,0"
        );
        assert_eq!(lines[2], ",,,,,,,Admission,,0,0,0,0,0,0,0");
    }

    #[test]
    fn test_write_csv_empty() {
        let mut out = Vec::new();
        write_csv(&mut out, &Vec::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.trim_end(), CANONICAL_FIELDS.join(","));
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        write(&mut out, &records(), ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Producer"], "Farm X");
        assert_eq!(rows[0]["Period"], "03/2025");
        assert_eq!(rows[0]["MovementType"], "Exam");
        assert!(rows[1]["EventDate"].is_null());
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::Csv.to_string(), "csv");
    }
}
