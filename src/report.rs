//! Read-only reporting over the ledger: dimension filters, metric totals and grouped totals.

use crate::model::{add_amounts, Amount, CanonicalRecord, Ledger, MovementType, Period};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Allow-lists for each dimension of a record. An empty list allows everything, and a record must
/// be allowed by every list to match.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Filter {
    pub producers: Vec<String>,
    pub branches: Vec<String>,
    pub units: Vec<String>,
    pub departments: Vec<String>,
    pub periods: Vec<Period>,
    pub movements: Vec<MovementType>,
    pub labels: Vec<String>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
            && self.branches.is_empty()
            && self.units.is_empty()
            && self.departments.is_empty()
            && self.periods.is_empty()
            && self.movements.is_empty()
            && self.labels.is_empty()
    }

    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        allows(&self.producers, record.producer())
            && allows(&self.branches, record.branch())
            && allows(&self.units, record.unit())
            && allows(&self.departments, record.department())
            && allows(&self.labels, record.entry_label())
            && (self.movements.is_empty() || self.movements.contains(&record.movement_type()))
            && (self.periods.is_empty()
                || record
                    .period()
                    .is_some_and(|period| self.periods.contains(&period)))
    }
}

fn allows(list: &[String], value: &str) -> bool {
    list.is_empty() || list.iter().any(|allowed| allowed == value)
}

impl Ledger {
    /// The records that match `filter`, in ledger order.
    pub fn filter(&self, filter: &Filter) -> Vec<&CanonicalRecord> {
        self.iter().filter(|record| filter.matches(record)).collect()
    }
}

/// The headline metrics of a set of records: event counts and the sum of each cost category.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
pub struct Totals {
    pub records: usize,
    pub admissions: usize,
    pub terminations: usize,
    pub termination_net_amount: Decimal,
    pub fgts_fine: Decimal,
    pub exam_cost: Decimal,
    pub safety_equipment_cost: Decimal,
    pub advance_thirteenth_amount: Decimal,
    pub thirteenth_salary_amount: Decimal,
    pub vacation_amount: Decimal,
    pub total_cost: Decimal,
}

impl Totals {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CanonicalRecord>,
    {
        let mut totals = Self::default();
        for record in records {
            totals.add(record);
        }
        totals
    }

    fn add(&mut self, record: &CanonicalRecord) {
        self.records += 1;
        match record.movement_type() {
            MovementType::Admission => self.admissions += 1,
            MovementType::Termination => self.terminations += 1,
            _ => {}
        }
        self.termination_net_amount =
            add_amounts(self.termination_net_amount, record.termination_net_amount());
        self.fgts_fine = add_amounts(self.fgts_fine, record.fgts_fine());
        self.exam_cost = add_amounts(self.exam_cost, record.exam_cost());
        self.safety_equipment_cost =
            add_amounts(self.safety_equipment_cost, record.safety_equipment_cost());
        self.advance_thirteenth_amount =
            add_amounts(self.advance_thirteenth_amount, record.advance_thirteenth_amount());
        self.thirteenth_salary_amount =
            add_amounts(self.thirteenth_salary_amount, record.thirteenth_salary_amount());
        self.vacation_amount = add_amounts(self.vacation_amount, record.vacation_amount());
        self.total_cost = add_amounts(self.total_cost, record.total_cost());
    }
}

impl Display for Totals {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Records: {}", self.records)?;
        writeln!(f, "Admissions: {}", self.admissions)?;
        writeln!(f, "Terminations: {}", self.terminations)?;
        writeln!(
            f,
            "Net rescission: {}",
            Amount::new(self.termination_net_amount)
        )?;
        writeln!(f, "FGTS fine: {}", Amount::new(self.fgts_fine))?;
        writeln!(f, "Exams: {}", Amount::new(self.exam_cost))?;
        writeln!(f, "EPI: {}", Amount::new(self.safety_equipment_cost))?;
        writeln!(
            f,
            "13th salary advance: {}",
            Amount::new(self.advance_thirteenth_amount)
        )?;
        writeln!(
            f,
            "13th salary: {}",
            Amount::new(self.thirteenth_salary_amount)
        )?;
        writeln!(f, "Vacation: {}", Amount::new(self.vacation_amount))?;
        write!(f, "Total cost: {}", Amount::new(self.total_cost))
    }
}

/// A record dimension that totals can be grouped by.
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
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    #[default]
    Producer,
    Branch,
    Unit,
    Department,
    Period,
    Movement,
    Label,
}

serde_plain::derive_display_from_serialize!(Dimension);
serde_plain::derive_fromstr_from_deserialize!(Dimension);

impl Dimension {
    /// The value of this dimension on `record`. Only `Period` can be absent.
    pub fn key(&self, record: &CanonicalRecord) -> Option<String> {
        match self {
            Dimension::Producer => Some(record.producer().to_owned()),
            Dimension::Branch => Some(record.branch().to_owned()),
            Dimension::Unit => Some(record.unit().to_owned()),
            Dimension::Department => Some(record.department().to_owned()),
            Dimension::Period => record.period().map(|p| p.to_string()),
            Dimension::Movement => Some(record.movement_type().to_string()),
            Dimension::Label => Some(record.entry_label().to_owned()),
        }
    }
}

/// Totals for each distinct value of `dimension`, sorted by value. Periods sort
/// chronologically. Records without a period are left out when grouping by period.
pub fn group_totals<'a, I>(records: I, dimension: Dimension) -> Vec<(String, Totals)>
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    if dimension == Dimension::Period {
        let mut groups: BTreeMap<Period, Totals> = BTreeMap::new();
        for record in records {
            if let Some(period) = record.period() {
                groups.entry(period).or_default().add(record);
            }
        }
        return groups
            .into_iter()
            .map(|(period, totals)| (period.to_string(), totals))
            .collect();
    }

    let mut groups: BTreeMap<String, Totals> = BTreeMap::new();
    for record in records {
        if let Some(key) = dimension.key(record) {
            groups.entry(key).or_default().add(record);
        }
    }
    groups.into_iter().collect()
}
