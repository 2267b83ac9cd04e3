use crate::coerce;
use crate::model::{CanonicalRecord, Movement, RawSourceTable};
use crate::normalize::{dimensions, Normalizer, SourceKind};

const DATE_COLUMNS: &[&str] = &["DataDemissao", "DataRescisao", "DataDesligamento", "Data"];
const NET_AMOUNT_COLUMNS: &[&str] = &[
    "ValorLiquidoRescisao",
    "LiquidoRescisao",
    "ValorLiquido",
    "Rescisao",
];
const FGTS_FINE_COLUMNS: &[&str] = &["MultaFGTS", "ValorMultaFGTS"];

/// Terminations and their rescission costs: the net rescission amount and the FGTS fine.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminationNormalizer;

impl Normalizer for TerminationNormalizer {
    fn kind(&self) -> SourceKind {
        SourceKind::Termination
    }

    fn records(&self, table: &RawSourceTable) -> Vec<CanonicalRecord> {
        let net_amounts = coerce::amounts(table, NET_AMOUNT_COLUMNS);
        let fgts_fines = coerce::amounts(table, FGTS_FINE_COLUMNS);

        dimensions(table, DATE_COLUMNS)
            .into_iter()
            .zip(net_amounts)
            .zip(fgts_fines)
            .map(|((dims, net_amount), fgts_fine)| {
                CanonicalRecord::new(
                    dims,
                    Movement::Termination {
                        net_amount,
                        fgts_fine,
                    },
                )
            })
            .collect()
    }
}
