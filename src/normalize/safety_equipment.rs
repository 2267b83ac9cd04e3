use crate::coerce;
use crate::model::{CanonicalRecord, Movement, RawSourceTable};
use crate::normalize::{dimensions, Normalizer, SourceKind};
use crate::resolve::resolve;
use rust_decimal::Decimal;

const DATE_COLUMNS: &[&str] = &["DataEntrega", "Data"];
const QUANTITY_COLUMNS: &[&str] = &["Quantidade", "Qtd", "Qtde"];
const UNIT_VALUE_COLUMNS: &[&str] = &["ValorUnitario", "VlrUnitario", "ValorUnit"];
const AMOUNT_COLUMNS: &[&str] = &["ValorItem", "Valor", "ValorEPI"];

/// Safety equipment (EPI) and uniforms issued to employees.
///
/// When the table has both a quantity and a unit value column the cost is their product,
/// otherwise it is read from a single amount column.
#[derive(Debug, Default, Clone, Copy)]
pub struct SafetyEquipmentNormalizer;

impl Normalizer for SafetyEquipmentNormalizer {
    fn kind(&self) -> SourceKind {
        SourceKind::SafetyEquipment
    }

    fn records(&self, table: &RawSourceTable) -> Vec<CanonicalRecord> {
        let costs = match (
            resolve(table, QUANTITY_COLUMNS),
            resolve(table, UNIT_VALUE_COLUMNS),
        ) {
            (Some(quantity), Some(unit_value)) => {
                let quantities = coerce::amounts(table, &[quantity]);
                let unit_values = coerce::amounts(table, &[unit_value]);
                quantities
                    .into_iter()
                    .zip(unit_values)
                    .map(|(q, v)| q.checked_mul(v).unwrap_or(Decimal::ZERO))
                    .collect()
            }
            _ => coerce::amounts(table, AMOUNT_COLUMNS),
        };

        dimensions(table, DATE_COLUMNS)
            .into_iter()
            .zip(costs)
            .map(|(dims, cost)| CanonicalRecord::new(dims, Movement::SafetyEquipment { cost }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MovementType;
    use std::str::FromStr;

    #[test]
    fn test_quantity_times_unit_value() {
        let t = RawSourceTable::new(vec![
            vec!["Item", "Qtd", "ValorUnitario", "Valor"],
            vec!["Bota", "2", "89,90", "1"],
            vec!["Luva", "", "10", "1"],
            vec!["Capacete", "3", "", "1"],
        ]);
        let records = SafetyEquipmentNormalizer.records(&t);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].movement_type(), MovementType::SafetyEquipment);
        assert_eq!(
            records[0].safety_equipment_cost(),
            Decimal::from_str("179.80").unwrap()
        );
        // A missing factor counts as zero
        assert_eq!(records[1].safety_equipment_cost(), Decimal::ZERO);
        assert_eq!(records[2].safety_equipment_cost(), Decimal::ZERO);
    }

    #[test]
    fn test_single_amount_column() {
        let t = RawSourceTable::new(vec![
            vec!["Item", "Quantidade", "ValorEPI"],
            vec!["Bota", "2", "150"],
        ]);
        let records = SafetyEquipmentNormalizer.records(&t);
        assert_eq!(records[0].safety_equipment_cost(), Decimal::from(150));
    }

    #[test]
    fn test_amount_candidate_priority() {
        let t = RawSourceTable::new(vec![
            vec!["ValorEPI", "Valor", "ValorItem"],
            vec!["1", "2", "3"],
        ]);
        let records = SafetyEquipmentNormalizer.records(&t);
        assert_eq!(records[0].safety_equipment_cost(), Decimal::from(3));
    }

    #[test]
    fn test_no_amount_columns() {
        let t = RawSourceTable::new(vec![vec!["Item"], vec!["Bota"]]);
        let records = SafetyEquipmentNormalizer.records(&t);
        assert_eq!(records[0].safety_equipment_cost(), Decimal::ZERO);
    }
}
