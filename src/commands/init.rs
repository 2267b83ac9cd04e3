use crate::commands::Out;
use crate::config::Sources;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory, the data directory and an initial `config.json` that uses the
/// default source file names.
///
/// # Arguments
/// - `home` - The directory that will be the home directory, e.g. `$HOME/hr-ledger`
/// - `data_dir` - Where the source spreadsheets will be placed. Defaults to `home/dados`.
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(home: &Path, data_dir: Option<&Path>) -> Result<Out<()>> {
    let config = Config::create(home, data_dir.map(Path::to_path_buf), Sources::default())
        .await
        .context("Unable to create the home directory and config")?;
    Ok(format!(
        "Successfully created {}, place the source spreadsheets in {}",
        config.config_path().display(),
        config.data_dir().display()
    )
    .into())
}
