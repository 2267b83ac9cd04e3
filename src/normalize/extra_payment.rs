use crate::coerce;
use crate::model::{add_amounts, CanonicalRecord, Movement, RawSourceTable};
use crate::normalize::{dimensions, Normalizer, SourceKind};
use rust_decimal::Decimal;
use tracing::warn;

const DATE_COLUMNS: &[&str] = &["DataPagamento", "Competencia", "Data"];
const LABEL_COLUMNS: &[&str] = &["TipoLancamento", "Lancamento", "Tipo", "TipoExtra"];
const AMOUNT_COLUMNS: &[&str] = &["ValorLiquido", "Valor", "ValorTotal", "Total"];

/// The kinds of extra payment that share one source spreadsheet and are told apart only by a
/// free-text label.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ExtraPaymentKind {
    /// Advance on the 13th salary, e.g. `ADT13`.
    AdvanceThirteenth,
    /// The 13th salary itself, e.g. `13`.
    ThirteenthSalary,
    /// Vacation pay, e.g. `Ferias`.
    Vacation,
    /// Anything else. These amounts are not reported.
    Other,
}

impl ExtraPaymentKind {
    /// Routes `amount` into the movement for this kind of payment.
    pub fn movement(self, amount: Decimal) -> Movement {
        match self {
            ExtraPaymentKind::AdvanceThirteenth => Movement::AdvanceThirteenth { amount },
            ExtraPaymentKind::ThirteenthSalary => Movement::ThirteenthSalary { amount },
            ExtraPaymentKind::Vacation => Movement::Vacation { amount },
            ExtraPaymentKind::Other => Movement::Other,
        }
    }
}

/// Classifies an extra-payment label. Matching is by substring on the trimmed, uppercased label
/// with accents removed, checked in this order:
///
/// 1. `ADT` or `ADIANTAMENTO` -> `AdvanceThirteenth`
/// 2. `13` -> `ThirteenthSalary`
/// 3. `FER` -> `Vacation`
/// 4. otherwise `Other`
///
/// ```
/// # use hr_ledger::normalize::{classify, ExtraPaymentKind};
/// assert_eq!(classify("ADT13"), ExtraPaymentKind::AdvanceThirteenth);
/// assert_eq!(classify("13"), ExtraPaymentKind::ThirteenthSalary);
/// assert_eq!(classify("Férias"), ExtraPaymentKind::Vacation);
/// ```
pub fn classify(label: &str) -> ExtraPaymentKind {
    let label = fold(label);
    if label.contains("ADT") || label.contains("ADIANTAMENTO") {
        ExtraPaymentKind::AdvanceThirteenth
    } else if label.contains("13") {
        ExtraPaymentKind::ThirteenthSalary
    } else if label.contains("FER") {
        ExtraPaymentKind::Vacation
    } else {
        ExtraPaymentKind::Other
    }
}

/// Trims, uppercases and strips the accents used in Portuguese labels.
fn fold(label: &str) -> String {
    label
        .trim()
        .to_uppercase()
        .chars()
        .map(|c| match c {
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'Ç' => 'C',
            other => other,
        })
        .collect()
}

/// Advance 13th salary, 13th salary and vacation payments.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtraPaymentNormalizer;

impl Normalizer for ExtraPaymentNormalizer {
    fn kind(&self) -> SourceKind {
        SourceKind::ExtraPayment
    }

    fn records(&self, table: &RawSourceTable) -> Vec<CanonicalRecord> {
        let labels = coerce::texts(table, LABEL_COLUMNS);
        let amounts = coerce::amounts(table, AMOUNT_COLUMNS);

        let mut unclassified = 0usize;
        let mut discarded = Decimal::ZERO;

        let records: Vec<CanonicalRecord> = dimensions(table, DATE_COLUMNS)
            .into_iter()
            .zip(labels)
            .zip(amounts)
            .map(|((mut dims, label), amount)| {
                let kind = classify(&label);
                if kind == ExtraPaymentKind::Other {
                    unclassified += 1;
                    discarded = add_amounts(discarded, amount);
                }
                dims.entry_label = label;
                CanonicalRecord::new(dims, kind.movement(amount))
            })
            .collect();

        if unclassified > 0 {
            warn!(
                "{unclassified} extra payment rows have an unrecognized type label, \
                their total of {discarded} is left out of the cost totals"
            );
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MovementType;

    #[test]
    fn test_classify_precedence() {
        assert_eq!(classify("ADT13"), ExtraPaymentKind::AdvanceThirteenth);
        assert_eq!(classify("13"), ExtraPaymentKind::ThirteenthSalary);
        assert_eq!(classify("Ferias"), ExtraPaymentKind::Vacation);
        assert_eq!(classify("Bonus"), ExtraPaymentKind::Other);
    }

    #[test]
    fn test_classify_variants() {
        assert_eq!(classify("  adt 13º "), ExtraPaymentKind::AdvanceThirteenth);
        assert_eq!(
            classify("Adiantamento 13 salario"),
            ExtraPaymentKind::AdvanceThirteenth
        );
        assert_eq!(classify("13º Salário"), ExtraPaymentKind::ThirteenthSalary);
        assert_eq!(classify("FERIAS"), ExtraPaymentKind::Vacation);
        assert_eq!(classify("Férias"), ExtraPaymentKind::Vacation);
        assert_eq!(classify(""), ExtraPaymentKind::Other);
    }

    #[test]
    fn test_extra_payment_sums() {
        let t = RawSourceTable::new(vec![
            vec!["TipoLancamento", "ValorLiquido"],
            vec!["ADT13", "100"],
            vec!["13", "200"],
            vec!["Ferias", "50"],
            vec!["XYZ", "9"],
        ]);
        let records = ExtraPaymentNormalizer.records(&t);
        assert_eq!(records.len(), 4);

        let advance: Decimal = records.iter().map(|r| r.advance_thirteenth_amount()).sum();
        let thirteenth: Decimal = records.iter().map(|r| r.thirteenth_salary_amount()).sum();
        let vacation: Decimal = records.iter().map(|r| r.vacation_amount()).sum();
        let total: Decimal = records.iter().map(|r| r.total_cost()).sum();

        assert_eq!(advance, Decimal::from(100));
        assert_eq!(thirteenth, Decimal::from(200));
        assert_eq!(vacation, Decimal::from(50));
        assert_eq!(total, Decimal::from(350));

        let types: Vec<MovementType> = records.iter().map(|r| r.movement_type()).collect();
        assert_eq!(
            types,
            vec![
                MovementType::AdvanceThirteenth,
                MovementType::ThirteenthSalary,
                MovementType::Vacation,
                MovementType::Other,
            ]
        );
        assert_eq!(records[3].entry_label(), "XYZ");
    }

    #[test]
    fn test_bonus_contributes_nothing() {
        let t = RawSourceTable::new(vec![vec!["Tipo", "Valor"], vec!["Bonus", "75"]]);
        let records = ExtraPaymentNormalizer.records(&t);
        assert_eq!(records[0].movement_type(), MovementType::Other);
        assert_eq!(records[0].advance_thirteenth_amount(), Decimal::ZERO);
        assert_eq!(records[0].thirteenth_salary_amount(), Decimal::ZERO);
        assert_eq!(records[0].vacation_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_numeric_label_cells() {
        use crate::model::Cell;
        let t = RawSourceTable::new(vec![
            vec![Cell::text("TipoLancamento"), Cell::text("ValorLiquido")],
            vec![Cell::Number(13.0), Cell::Number(200.0)],
        ]);
        let records = ExtraPaymentNormalizer.records(&t);
        assert_eq!(records[0].movement_type(), MovementType::ThirteenthSalary);
        assert_eq!(records[0].thirteenth_salary_amount(), Decimal::from(200));
    }

    #[test]
    fn test_missing_label_column_is_other() {
        let t = RawSourceTable::new(vec![vec!["Valor"], vec!["10"]]);
        let records = ExtraPaymentNormalizer.records(&t);
        assert_eq!(records[0].movement_type(), MovementType::Other);
        assert!(records[0].total_cost().is_zero());
    }
}
