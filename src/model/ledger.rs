use crate::model::CanonicalRecord;
use serde::Serialize;

/// The unified fact table of HR cost events. A `Ledger` is built once by the unifier and is not
/// modified afterward; reporting works on borrowed views of its records.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    records: Vec<CanonicalRecord>,
}

impl Ledger {
    pub(crate) fn new(records: Vec<CanonicalRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a CanonicalRecord;
    type IntoIter = std::slice::Iter<'a, CanonicalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
