//! Loads every source and runs the normalize, join and unify passes that produce the `Ledger`.

use crate::load::load;
use crate::model::{Ledger, RawSourceTable};
use crate::normalize::SourceKind;
use crate::producer::ProducerLookup;
use crate::unify::unify;
use crate::{Config, Result};
use anyhow::Context;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// The raw tables for one unification pass.
#[derive(Debug, Default, Clone)]
pub struct SourceTables {
    pub admissions: RawSourceTable,
    pub terminations: RawSourceTable,
    pub exams: RawSourceTable,
    pub safety_equipment: RawSourceTable,
    pub extra_payments: RawSourceTable,
    pub producers: RawSourceTable,
}

impl SourceTables {
    pub fn table(&self, kind: SourceKind) -> &RawSourceTable {
        match kind {
            SourceKind::Admission => &self.admissions,
            SourceKind::Termination => &self.terminations,
            SourceKind::Exam => &self.exams,
            SourceKind::SafetyEquipment => &self.safety_equipment,
            SourceKind::ExtraPayment => &self.extra_payments,
        }
    }
}

/// Loads all six source files named by `config`. Any source that is missing or unreadable fails
/// the whole load.
pub async fn load_sources(config: &Config) -> Result<SourceTables> {
    let delimiter = config.csv_delimiter();
    let location = |kind: Option<SourceKind>| {
        let source = match kind {
            Some(kind) => config.source(kind),
            None => config.producers(),
        };
        (config.resolve_path(source), source.sheet().map(str::to_owned))
    };

    Ok(SourceTables {
        admissions: load_blocking(location(Some(SourceKind::Admission)), delimiter).await?,
        terminations: load_blocking(location(Some(SourceKind::Termination)), delimiter).await?,
        exams: load_blocking(location(Some(SourceKind::Exam)), delimiter).await?,
        safety_equipment: load_blocking(location(Some(SourceKind::SafetyEquipment)), delimiter)
            .await?,
        extra_payments: load_blocking(location(Some(SourceKind::ExtraPayment)), delimiter)
            .await?,
        producers: load_blocking(location(None), delimiter)
            .await
            .context("Unable to load the producers reference table")?,
    })
}

async fn load_blocking(
    (path, sheet): (PathBuf, Option<String>),
    delimiter: u8,
) -> Result<RawSourceTable> {
    debug!("Loading {}", path.display());
    tokio::task::spawn_blocking(move || load(&path, sheet.as_deref(), delimiter))
        .await
        .context("The source loading task failed")?
}

/// Normalizes every source, attaches producers and unifies the results in source order.
pub fn build_ledger(tables: &SourceTables) -> Ledger {
    let lookup = ProducerLookup::build(&tables.producers);

    let normalized: Vec<_> = SourceKind::ALL
        .par_iter()
        .map(|kind| kind.normalizer().normalize(tables.table(*kind), &lookup))
        .collect();

    for (kind, records) in SourceKind::ALL.iter().zip(&normalized) {
        debug!("{kind}: {} records", records.len());
    }

    let ledger = unify(normalized);
    info!(
        "Built a ledger of {} records, with {} branch to producer mappings",
        ledger.len(),
        lookup.len()
    );
    ledger
}

/// Loads the sources named by `config` and builds the ledger.
pub async fn run(config: &Config) -> Result<Ledger> {
    let tables = load_sources(config).await?;
    Ok(build_ledger(&tables))
}
