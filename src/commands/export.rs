use crate::args::ExportArgs;
use crate::commands::Out;
use crate::export::{self, ExportFormat};
use crate::{pipeline, utils, Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// What the `export` command wrote.
#[derive(Debug, Clone, Serialize)]
pub struct Exported {
    pub records: usize,
    pub format: ExportFormat,
    /// `None` when the export went to stdout.
    pub output: Option<PathBuf>,
}

/// Builds the ledger, applies the filters in `args` and writes the matching records to the
/// output file, or to stdout when there is none.
pub async fn export(config: Config, args: ExportArgs) -> Result<Out<Exported>> {
    let ledger = pipeline::run(&config).await?;
    let filter = args.filter();
    let records = ledger.filter(&filter);
    debug!(
        "{} of {} records match the filter",
        records.len(),
        ledger.len()
    );

    let mut data = Vec::new();
    export::write(&mut data, records.iter().copied(), args.format())?;

    let output = args.output().map(|p| p.to_path_buf());
    match &output {
        Some(path) => utils::write(path, &data).await?,
        None => std::io::stdout()
            .write_all(&data)
            .context("Unable to write the export to stdout")?,
    }

    let exported = Exported {
        records: records.len(),
        format: args.format(),
        output,
    };
    let destination = match &exported.output {
        Some(path) => path.display().to_string(),
        None => "stdout".to_string(),
    };
    Ok(Out::new(
        format!(
            "Exported {} records as {} to {destination}",
            exported.records, exported.format
        ),
        exported,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::FilterArgs;
    use crate::model::CANONICAL_FIELDS;
    use crate::test::TestEnv;
    use clap::Parser;

    #[tokio::test]
    async fn test_export_csv() {
        let env = TestEnv::new().await;
        env.write_sample_sources();
        let path = env.config().root().join("ledger.csv");
        let args = ExportArgs::new(ExportFormat::Csv, Some(path.clone()), FilterArgs::default());

        let out = export(env.config(), args).await.unwrap();
        assert_eq!(out.structure().unwrap().records, 7);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], CANONICAL_FIELDS.join(","));
        assert!(lines[1].starts_with("Ana Souza,2025-01-02,01/2025,B1,Sede,Campo,"));
    }

    #[tokio::test]
    async fn test_export_json_filtered() {
        let env = TestEnv::new().await;
        env.write_sample_sources();
        let path = env.config().root().join("ledger.json");
        let filter = FilterArgs::try_parse_from(["filter", "--producer", "Sítio Esperança"])
            .unwrap();
        let args = ExportArgs::new(ExportFormat::Json, Some(path.clone()), filter);

        let out = export(env.config(), args).await.unwrap();
        assert_eq!(out.structure().unwrap().records, 2);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r["Branch"] == "B2"));
    }
}
