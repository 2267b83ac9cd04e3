//! Reads source files from disk into `RawSourceTable`s.
//!
//! CSV files are read with the `csv` crate. Workbooks (`xlsx`, `xlsm`, `xls`, `xlsb` and `ods`)
//! are read with `calamine`, from the named sheet or else the first one. In both cases the first
//! non-blank row is the header and blank rows are skipped.

use crate::coerce;
use crate::model::{Cell, RawSourceTable};
use crate::Result;
use anyhow::{bail, Context};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use std::path::Path;
use tracing::{debug, trace};

/// Loads the file at `path`. `sheet` selects a worksheet in a workbook and is ignored for CSV
/// files. `delimiter` is the CSV field separator.
///
/// # Errors
/// - The file does not exist or cannot be read.
/// - The extension is not a supported spreadsheet format.
/// - The requested sheet is not in the workbook.
pub fn load(path: &Path, sheet: Option<&str>, delimiter: u8) -> Result<RawSourceTable> {
    if !path.is_file() {
        bail!("The source file is missing '{}'", path.display());
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "csv" => csv_rows(path, delimiter)?,
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => workbook_rows(path, sheet)?,
        _ => bail!(
            "Unsupported source file type '{}', expected csv, xlsx, xls, xlsb or ods",
            path.display()
        ),
    };

    let table = RawSourceTable::new(
        rows.into_iter()
            .filter(|row| row.iter().any(|cell| !cell.is_empty())),
    );
    debug!(
        "Loaded {} rows and {} columns from {}",
        table.len(),
        table.headers().len(),
        path.display()
    );
    Ok(table)
}

fn csv_rows(path: &Path, delimiter: u8) -> Result<Vec<Vec<Cell>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("Unable to open CSV file {}", path.display()))?;

    let mut rows = Vec::new();
    // Exports are not always UTF-8, so fields are decoded lossily rather than rejected.
    for result in rdr.byte_records() {
        let record =
            result.with_context(|| format!("Unable to read CSV file {}", path.display()))?;
        rows.push(
            record
                .iter()
                .map(|field| Cell::text(String::from_utf8_lossy(field)))
                .collect(),
        );
    }
    Ok(rows)
}

fn workbook_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<Vec<Cell>>> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .with_context(|| format!("Unable to open workbook {}", path.display()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                bail!(
                    "The sheet '{name}' is not in {}, available sheets are {sheet_names:?}",
                    path.display()
                );
            }
            name.to_string()
        }
        None => match sheet_names.first() {
            Some(first) => first.clone(),
            None => bail!("The workbook {} contains no sheets", path.display()),
        },
    };

    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("Unable to read sheet '{name}' of {}", path.display()))?;
    trace!("Sheet '{name}' has size {:?}", range.get_size());

    Ok(range
        .rows()
        .map(|row| row.iter().map(to_cell).collect())
        .collect())
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        // Error cells such as #N/A carry no value
        Data::Error(_) => Cell::Empty,
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            coerce::serial_date(serial)
                .map(Cell::Date)
                .unwrap_or(Cell::Number(serial))
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{AdmissionNormalizer, Normalizer};
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Writes a workbook with a "Resumo" sheet followed by an "Admissoes" sheet whose admission
    /// date is a date-formatted serial.
    fn write_workbook(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("admissoes.xlsx");
        let date_format = rust_xlsxwriter::Format::new().set_num_format("dd/mm/yyyy");
        let mut wb = rust_xlsxwriter::Workbook::new();

        let summary = wb.add_worksheet().set_name("Resumo").unwrap();
        summary.write_string(0, 0, "Total").unwrap();
        summary.write_number(0, 1, 1.0).unwrap();

        let admissions = wb.add_worksheet().set_name("Admissoes").unwrap();
        admissions.write_string(0, 0, "Colaborador").unwrap();
        admissions.write_string(0, 1, "Filial").unwrap();
        admissions.write_string(0, 2, "DataAdmissao").unwrap();
        admissions.write_string(1, 0, "Ana").unwrap();
        admissions.write_number(1, 1, 101.0).unwrap();
        // 2025-02-01
        admissions
            .write_number_with_format(1, 2, 45689.0, &date_format)
            .unwrap();

        wb.save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_workbook_named_sheet() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir);
        let table = load(&path, Some("Admissoes"), b',').unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.has_column("DataAdmissao"));

        let records = AdmissionNormalizer.records(&table);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee(), "Ana");
        assert_eq!(records[0].branch(), "101");
        assert_eq!(records[0].event_date(), NaiveDate::from_ymd_opt(2025, 2, 1));
        assert_eq!(records[0].period().unwrap().to_string(), "02/2025");
    }

    #[test]
    fn test_load_workbook_first_sheet() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir);
        let table = load(&path, None, b',').unwrap();
        assert!(table.has_column("Total"));
        assert!(!table.has_column("DataAdmissao"));
    }

    #[test]
    fn test_load_workbook_missing_sheet() {
        let dir = TempDir::new().unwrap();
        let path = write_workbook(&dir);
        let err = load(&path, Some("Desligamentos"), b',').unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'Desligamentos' is not in"));
        assert!(message.contains("Admissoes"));
    }

    #[test]
    fn test_load_csv() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "admissoes.csv",
            " Colaborador ,Filial,DataAdmissao\nAna, B1 ,02/01/2025\n,,\nBruno,B2\n",
        );
        let table = load(&path, None, b',').unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.has_column("Colaborador"));
        let rows: Vec<&[Cell]> = table.rows().collect();
        assert_eq!(rows[0][1], Cell::text("B1"));
        assert_eq!(rows[1][2], Cell::Empty);
    }

    #[test]
    fn test_load_csv_semicolon() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "exames.csv", "Colaborador;Valor\nAna;85,50\n");
        let table = load(&path, None, b';').unwrap();
        let values: Vec<&Cell> = table.column("Valor").unwrap().collect();
        assert_eq!(values, vec![&Cell::text("85,50")]);
    }

    #[test]
    fn test_load_latin1_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.csv");
        // "Função" in ISO-8859-1
        std::fs::write(&path, b"Colaborador,Fun\xe7\xe3o\nAna,Operador\n").unwrap();
        let table = load(&path, None, b',').unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_load_empty_csv() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "vazio.csv", "");
        let table = load(&path, None, b',').unwrap();
        assert!(table.is_empty());
        assert!(table.headers().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("nope.xlsx"), None, b',').unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "notes.pdf", "x");
        assert!(load(&path, None, b',').is_err());
    }

    #[test]
    fn test_load_txt_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "admissoes.txt", "Colaborador,Filial\nAna,B1\n");
        let err = load(&path, None, b',').unwrap_err();
        assert!(err.to_string().contains("Unsupported source file type"));
    }

    #[test]
    fn test_load_corrupt_workbook() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.xlsx", "this is not a zip file");
        assert!(load(&path, None, b',').is_err());
    }

    #[test]
    fn test_to_cell() {
        assert_eq!(to_cell(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(to_cell(&Data::String("  x ".into())), Cell::text("x"));
        assert_eq!(to_cell(&Data::String("   ".into())), Cell::Empty);
        assert_eq!(to_cell(&Data::Bool(true)), Cell::Bool(true));
        assert_eq!(to_cell(&Data::Float(12.5)), Cell::Number(12.5));
    }

    #[test]
    fn test_to_cell_datetime() {
        let date = ExcelDateTime::new(45689.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            to_cell(&Data::DateTime(date)),
            Cell::Date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())
        );
    }
}
