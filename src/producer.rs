//! The branch to producer reference table and the join that attaches producers to records.

use crate::coerce;
use crate::model::{CanonicalRecord, RawSourceTable};
use crate::resolve::resolve;
use std::collections::HashMap;
use tracing::{debug, warn};

const BRANCH_COLUMNS: &[&str] = crate::normalize::BRANCH_COLUMNS;
const PRODUCER_COLUMNS: &[&str] = &["ProdutorRural", "Produtor", "Producer"];

/// Maps a branch identifier to the rural producer that owns it.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct ProducerLookup {
    producers: HashMap<String, String>,
}

impl ProducerLookup {
    /// Builds the lookup from the producers reference table. Rows with an empty branch are
    /// skipped, and when a branch appears more than once the last row wins.
    ///
    /// If the branch or producer column cannot be found, the lookup is empty and every record
    /// will be joined to an empty producer.
    pub fn build(table: &RawSourceTable) -> Self {
        let (Some(_), Some(_)) = (
            resolve(table, BRANCH_COLUMNS),
            resolve(table, PRODUCER_COLUMNS),
        ) else {
            warn!(
                "The producers table needs one of {BRANCH_COLUMNS:?} and one of \
                {PRODUCER_COLUMNS:?}, no producers will be assigned"
            );
            return Self::default();
        };

        let branches = coerce::texts(table, BRANCH_COLUMNS);
        let names = coerce::texts(table, PRODUCER_COLUMNS);
        let mut producers = HashMap::new();
        for (branch, producer) in branches.into_iter().zip(names) {
            if branch.is_empty() {
                continue;
            }
            if let Some(previous) = producers.insert(branch.clone(), producer) {
                debug!("Branch '{branch}' is listed more than once, replacing '{previous}'");
            }
        }
        debug!("Loaded {} branch to producer mappings", producers.len());
        Self { producers }
    }

    /// The producer for `branch`, if there is one.
    pub fn get(&self, branch: &str) -> Option<&str> {
        self.producers.get(branch.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// Left outer join of `records` against the lookup on branch. Records whose branch is not
    /// known get an empty producer. No record is dropped or reordered.
    pub fn attach(&self, records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
        records
            .into_iter()
            .map(|record| {
                let producer = self.get(record.branch()).unwrap_or_default().to_owned();
                record.with_producer(producer)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, Dimensions, Movement, MovementType};
    use crate::normalize::{AdmissionNormalizer, Normalizer};

    fn record(branch: &str) -> CanonicalRecord {
        CanonicalRecord::new(
            Dimensions {
                branch: branch.to_string(),
                ..Dimensions::default()
            },
            Movement::Admission,
        )
    }

    #[test]
    fn test_build_lookup() {
        let t = RawSourceTable::new(vec![
            vec!["Filial", "ProdutorRural"],
            vec!["B1", "Farm X"],
            vec!["B2", "Farm Y"],
            vec!["", "Nobody"],
            vec!["B1", "Farm Z"],
        ]);
        let lookup = ProducerLookup::build(&t);
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.get("B1"), Some("Farm Z"));
        assert_eq!(lookup.get(" B2 "), Some("Farm Y"));
        assert_eq!(lookup.get(""), None);
    }

    #[test]
    fn test_numeric_branches_match() {
        let producers = RawSourceTable::new(vec![
            vec![Cell::text("CodFilial"), Cell::text("Produtor")],
            vec![Cell::Number(101.0), Cell::text("Farm X")],
        ]);
        let lookup = ProducerLookup::build(&producers);
        assert_eq!(lookup.get("101"), Some("Farm X"));
    }

    #[test]
    fn test_missing_columns_give_empty_lookup() {
        let t = RawSourceTable::new(vec![vec!["Filial", "Dono"], vec!["B1", "Farm X"]]);
        assert!(ProducerLookup::build(&t).is_empty());
    }

    #[test]
    fn test_attach_is_outer_join() {
        let t = RawSourceTable::new(vec![vec!["Filial", "ProdutorRural"], vec!["B1", "Farm X"]]);
        let lookup = ProducerLookup::build(&t);
        let joined = lookup.attach(vec![record("B1"), record("B9"), record(""), record("B1")]);
        let producers: Vec<&str> = joined.iter().map(|r| r.producer()).collect();
        assert_eq!(producers, vec!["Farm X", "", "", "Farm X"]);
        let branches: Vec<&str> = joined.iter().map(|r| r.branch()).collect();
        assert_eq!(branches, vec!["B1", "B9", "", "B1"]);
    }

    #[test]
    fn test_admission_end_to_end() {
        let admissions = RawSourceTable::new(vec![
            vec!["Colaborador", "Filial", "DataAdmissao"],
            vec!["Ana", "B1", "2025-03-05"],
        ]);
        let producers =
            RawSourceTable::new(vec![vec!["Filial", "ProdutorRural"], vec!["B1", "Farm X"]]);
        let lookup = ProducerLookup::build(&producers);
        let records = AdmissionNormalizer.normalize(&admissions, &lookup);

        assert_eq!(records.len(), 1);
        let ana = &records[0];
        assert_eq!(ana.movement_type(), MovementType::Admission);
        assert_eq!(ana.producer(), "Farm X");
        assert_eq!(ana.period().unwrap().to_string(), "03/2025");
        assert!(ana.amounts().iter().all(|a| a.is_zero()));
    }
}
