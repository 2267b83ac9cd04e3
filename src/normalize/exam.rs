use crate::coerce;
use crate::model::{CanonicalRecord, Movement, RawSourceTable};
use crate::normalize::{dimensions, Normalizer, SourceKind};

const DATE_COLUMNS: &[&str] = &["DataExame", "Data"];
const COST_COLUMNS: &[&str] = &["ValorExame", "Valor"];

/// Occupational medical exams and what they cost.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExamNormalizer;

impl Normalizer for ExamNormalizer {
    fn kind(&self) -> SourceKind {
        SourceKind::Exam
    }

    fn records(&self, table: &RawSourceTable) -> Vec<CanonicalRecord> {
        let costs = coerce::amounts(table, COST_COLUMNS);
        dimensions(table, DATE_COLUMNS)
            .into_iter()
            .zip(costs)
            .map(|(dims, cost)| CanonicalRecord::new(dims, Movement::Exam { cost }))
            .collect()
    }
}
