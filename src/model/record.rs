use crate::model::{add_amounts, Period};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The category of HR event that a `CanonicalRecord` represents.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum MovementType {
    Admission,
    Termination,
    Exam,
    SafetyEquipment,
    #[serde(rename = "ExtraPayment-Adt13")]
    AdvanceThirteenth,
    #[serde(rename = "ExtraPayment-ThirteenthSalary")]
    ThirteenthSalary,
    #[serde(rename = "ExtraPayment-Vacation")]
    Vacation,
    Other,
}

serde_plain::derive_display_from_serialize!(MovementType);
serde_plain::derive_fromstr_from_deserialize!(MovementType);

/// One HR event together with the costs it carries. Each variant holds only the monetary fields
/// that its movement type owns, which is what keeps the cost columns of the ledger exclusive.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Movement {
    Admission,
    Termination {
        net_amount: Decimal,
        fgts_fine: Decimal,
    },
    Exam {
        cost: Decimal,
    },
    SafetyEquipment {
        cost: Decimal,
    },
    AdvanceThirteenth {
        amount: Decimal,
    },
    ThirteenthSalary {
        amount: Decimal,
    },
    Vacation {
        amount: Decimal,
    },
    /// An extra payment whose label could not be classified. Its amount is not carried.
    Other,
}

impl Movement {
    pub fn movement_type(&self) -> MovementType {
        match self {
            Movement::Admission => MovementType::Admission,
            Movement::Termination { .. } => MovementType::Termination,
            Movement::Exam { .. } => MovementType::Exam,
            Movement::SafetyEquipment { .. } => MovementType::SafetyEquipment,
            Movement::AdvanceThirteenth { .. } => MovementType::AdvanceThirteenth,
            Movement::ThirteenthSalary { .. } => MovementType::ThirteenthSalary,
            Movement::Vacation { .. } => MovementType::Vacation,
            Movement::Other => MovementType::Other,
        }
    }
}

/// The descriptive fields of a record, as read from a source row.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Dimensions {
    pub employee: String,
    pub event_date: Option<NaiveDate>,
    pub branch: String,
    pub unit: String,
    pub department: String,
    /// The raw type label of an extra payment. Empty for other sources.
    pub entry_label: String,
}

/// Represents a single row of the unified HR cost ledger.
///
/// Every field is always populated: strings default to empty and amounts default to zero. Only
/// `event_date` and `period` may be absent, in which case the record is left out of any
/// period-based aggregation.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CanonicalRecord {
    employee: String,
    event_date: Option<NaiveDate>,
    period: Option<Period>,
    branch: String,
    unit: String,
    department: String,
    producer: String,
    movement_type: MovementType,
    entry_label: String,
    termination_net_amount: Decimal,
    fgts_fine: Decimal,
    exam_cost: Decimal,
    safety_equipment_cost: Decimal,
    advance_thirteenth_amount: Decimal,
    thirteenth_salary_amount: Decimal,
    vacation_amount: Decimal,
}

/// The column names of a serialized `CanonicalRecord`, in order.
pub const CANONICAL_FIELDS: [&str; 16] = [
    "Employee",
    "EventDate",
    "Period",
    "Branch",
    "Unit",
    "Department",
    "Producer",
    "MovementType",
    "EntryLabel",
    "TerminationNetAmount",
    "FgtsFine",
    "ExamCost",
    "SafetyEquipmentCost",
    "AdvanceThirteenthAmount",
    "ThirteenthSalaryAmount",
    "VacationAmount",
];

impl CanonicalRecord {
    /// Creates a record with an empty producer. The period is derived from the event date.
    pub fn new(dimensions: Dimensions, movement: Movement) -> Self {
        let Dimensions {
            employee,
            event_date,
            branch,
            unit,
            department,
            entry_label,
        } = dimensions;

        let mut record = Self {
            employee,
            event_date,
            period: event_date.map(Period::from),
            branch,
            unit,
            department,
            producer: String::new(),
            movement_type: movement.movement_type(),
            entry_label,
            termination_net_amount: Decimal::ZERO,
            fgts_fine: Decimal::ZERO,
            exam_cost: Decimal::ZERO,
            safety_equipment_cost: Decimal::ZERO,
            advance_thirteenth_amount: Decimal::ZERO,
            thirteenth_salary_amount: Decimal::ZERO,
            vacation_amount: Decimal::ZERO,
        };

        match movement {
            Movement::Admission | Movement::Other => {}
            Movement::Termination {
                net_amount,
                fgts_fine,
            } => {
                record.termination_net_amount = net_amount;
                record.fgts_fine = fgts_fine;
            }
            Movement::Exam { cost } => record.exam_cost = cost,
            Movement::SafetyEquipment { cost } => record.safety_equipment_cost = cost,
            Movement::AdvanceThirteenth { amount } => record.advance_thirteenth_amount = amount,
            Movement::ThirteenthSalary { amount } => record.thirteenth_salary_amount = amount,
            Movement::Vacation { amount } => record.vacation_amount = amount,
        }

        record
    }

    /// Returns this record with the producer dimension set.
    pub fn with_producer(self, producer: impl Into<String>) -> Self {
        Self {
            producer: producer.into(),
            ..self
        }
    }

    pub fn employee(&self) -> &str {
        &self.employee
    }

    pub fn event_date(&self) -> Option<NaiveDate> {
        self.event_date
    }

    pub fn period(&self) -> Option<Period> {
        self.period
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn producer(&self) -> &str {
        &self.producer
    }

    pub fn movement_type(&self) -> MovementType {
        self.movement_type
    }

    pub fn entry_label(&self) -> &str {
        &self.entry_label
    }

    pub fn termination_net_amount(&self) -> Decimal {
        self.termination_net_amount
    }

    pub fn fgts_fine(&self) -> Decimal {
        self.fgts_fine
    }

    pub fn exam_cost(&self) -> Decimal {
        self.exam_cost
    }

    pub fn safety_equipment_cost(&self) -> Decimal {
        self.safety_equipment_cost
    }

    pub fn advance_thirteenth_amount(&self) -> Decimal {
        self.advance_thirteenth_amount
    }

    pub fn thirteenth_salary_amount(&self) -> Decimal {
        self.thirteenth_salary_amount
    }

    pub fn vacation_amount(&self) -> Decimal {
        self.vacation_amount
    }

    /// The seven monetary fields in canonical column order.
    pub fn amounts(&self) -> [Decimal; 7] {
        [
            self.termination_net_amount,
            self.fgts_fine,
            self.exam_cost,
            self.safety_equipment_cost,
            self.advance_thirteenth_amount,
            self.thirteenth_salary_amount,
            self.vacation_amount,
        ]
    }

    /// The sum of all seven monetary fields.
    pub fn total_cost(&self) -> Decimal {
        self.amounts()
            .iter()
            .fold(Decimal::ZERO, |total, amount| add_amounts(total, *amount))
    }
}
