use crate::model::{CanonicalRecord, Movement, RawSourceTable};
use crate::normalize::{dimensions, Normalizer, SourceKind};

const DATE_COLUMNS: &[&str] = &["DataAdmissao", "Data"];

/// Hiring events. Admissions carry no cost.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdmissionNormalizer;

impl Normalizer for AdmissionNormalizer {
    fn kind(&self) -> SourceKind {
        SourceKind::Admission
    }

    fn records(&self, table: &RawSourceTable) -> Vec<CanonicalRecord> {
        dimensions(table, DATE_COLUMNS)
            .into_iter()
            .map(|dims| CanonicalRecord::new(dims, Movement::Admission))
            .collect()
    }
}
