//! Per-source normalizers that map a raw source table into canonical ledger records.
//!
//! Each source spreadsheet has its own normalizer. They all share the same contract: one
//! `CanonicalRecord` per input row, in input order, and no failure on missing columns or dirty
//! values. Column names are looked up with [`crate::resolve::resolve`] against ordered candidate
//! lists, and amounts go through [`crate::coerce`].

mod admission;
mod exam;
mod extra_payment;
mod safety_equipment;
mod termination;

use crate::coerce;
use crate::model::{CanonicalRecord, Dimensions, RawSourceTable};
use crate::producer::ProducerLookup;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use admission::AdmissionNormalizer;
pub use exam::ExamNormalizer;
pub use extra_payment::{classify, ExtraPaymentKind, ExtraPaymentNormalizer};
pub use safety_equipment::SafetyEquipmentNormalizer;
pub use termination::TerminationNormalizer;

pub(crate) const EMPLOYEE_COLUMNS: &[&str] = &["Colaborador", "Funcionario", "Empregado", "Nome"];
pub(crate) const BRANCH_COLUMNS: &[&str] = &["Filial", "CodFilial", "Branch"];
pub(crate) const UNIT_COLUMNS: &[&str] = &["Unidade", "Unit"];
pub(crate) const DEPARTMENT_COLUMNS: &[&str] = &["Setor", "Departamento", "Department"];

/// The source spreadsheets that produce ledger records, in the order they are unified.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Admission,
    Termination,
    Exam,
    SafetyEquipment,
    ExtraPayment,
}

serde_plain::derive_display_from_serialize!(SourceKind);
serde_plain::derive_fromstr_from_deserialize!(SourceKind);

impl SourceKind {
    /// All source kinds in unification order.
    pub const ALL: [SourceKind; 5] = [
        SourceKind::Admission,
        SourceKind::Termination,
        SourceKind::Exam,
        SourceKind::SafetyEquipment,
        SourceKind::ExtraPayment,
    ];

    /// Returns the normalizer for this kind of source.
    pub fn normalizer(&self) -> Box<dyn Normalizer> {
        match self {
            SourceKind::Admission => Box::new(AdmissionNormalizer),
            SourceKind::Termination => Box::new(TerminationNormalizer),
            SourceKind::Exam => Box::new(ExamNormalizer),
            SourceKind::SafetyEquipment => Box::new(SafetyEquipmentNormalizer),
            SourceKind::ExtraPayment => Box::new(ExtraPaymentNormalizer),
        }
    }
}

/// Maps the rows of one kind of source table into canonical records.
pub trait Normalizer: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Builds one record per row of `table`, in row order, with an empty producer.
    fn records(&self, table: &RawSourceTable) -> Vec<CanonicalRecord>;

    /// Builds the records for `table` and attaches the producer of each record's branch.
    fn normalize(&self, table: &RawSourceTable, lookup: &ProducerLookup) -> Vec<CanonicalRecord> {
        let records = self.records(table);
        debug!(
            "Normalized {} {} rows into {} records",
            table.len(),
            self.kind(),
            records.len()
        );
        lookup.attach(records)
    }
}

/// Reads the descriptive columns shared by every source. The event date comes from the first of
/// `date_columns` present in the table.
pub(crate) fn dimensions(table: &RawSourceTable, date_columns: &[&str]) -> Vec<Dimensions> {
    let employees = coerce::texts(table, EMPLOYEE_COLUMNS);
    let branches = coerce::texts(table, BRANCH_COLUMNS);
    let units = coerce::texts(table, UNIT_COLUMNS);
    let departments = coerce::texts(table, DEPARTMENT_COLUMNS);
    let dates = coerce::dates(table, date_columns);

    employees
        .into_iter()
        .zip(branches)
        .zip(units)
        .zip(departments)
        .zip(dates)
        .map(
            |((((employee, branch), unit), department), event_date)| Dimensions {
                employee,
                event_date,
                branch,
                unit,
                department,
                entry_label: String::new(),
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, MovementType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_dimensions_reads_shared_columns() {
        let t = RawSourceTable::new(vec![
            vec!["Nome", "Filial", "Unidade", "Departamento", "Data"],
            vec!["Ana", "B1", "Sede", "Campo", "15/01/2025"],
        ]);
        let dims = dimensions(&t, &["Data"]);
        assert_eq!(
            dims,
            vec![Dimensions {
                employee: "Ana".to_string(),
                event_date: NaiveDate::from_ymd_opt(2025, 1, 15),
                branch: "B1".to_string(),
                unit: "Sede".to_string(),
                department: "Campo".to_string(),
                entry_label: String::new(),
            }]
        );
    }

    #[test]
    fn test_dimensions_missing_columns_are_empty() {
        let t = RawSourceTable::new(vec![vec![Cell::text("Valor")], vec![Cell::Number(1.0)]]);
        let dims = dimensions(&t, &["Data"]);
        assert_eq!(dims, vec![Dimensions::default()]);
    }

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::SafetyEquipment.to_string(), "safety_equipment");
        assert_eq!(
            "extra_payment".parse::<SourceKind>().unwrap(),
            SourceKind::ExtraPayment
        );
    }

    #[test]
    fn test_every_normalizer_reports_its_kind() {
        for kind in SourceKind::ALL {
            assert_eq!(kind.normalizer().kind(), kind);
        }
    }

    #[test]
    fn test_every_normalizer_handles_empty_tables() {
        let lookup = ProducerLookup::default();
        for kind in SourceKind::ALL {
            let headers_only = RawSourceTable::new(vec![vec!["Filial", "Valor"]]);
            assert!(kind.normalizer().normalize(&headers_only, &lookup).is_empty());
            let nothing = RawSourceTable::default();
            assert!(kind.normalizer().normalize(&nothing, &lookup).is_empty());
        }
    }

    #[test]
    fn test_every_normalizer_preserves_row_count_and_exclusivity() {
        let t = RawSourceTable::new(vec![
            vec![
                "Filial",
                "TipoLancamento",
                "Valor",
                "ValorLiquido",
                "MultaFGTS",
                "Quantidade",
                "ValorUnitario",
            ],
            vec!["B1", "ADT13", "10", "20", "5", "2", "3"],
            vec!["B2", "13", "x", "", "", "", ""],
            vec!["B3", "Bonus", "7", "8", "1", "1", "1"],
        ]);
        let lookup = ProducerLookup::default();
        for kind in SourceKind::ALL {
            let records = kind.normalizer().normalize(&t, &lookup);
            assert_eq!(records.len(), t.len(), "{kind}");
            for record in &records {
                let non_zero = record
                    .amounts()
                    .iter()
                    .filter(|a| **a != Decimal::ZERO)
                    .count();
                let allowed = match record.movement_type() {
                    MovementType::Termination => 2,
                    MovementType::Admission | MovementType::Other => 0,
                    _ => 1,
                };
                assert!(non_zero <= allowed, "{kind}: {record:?}");
            }
        }
    }
}
