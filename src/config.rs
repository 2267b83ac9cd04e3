//! Configuration file handling.
//!
//! The configuration file is stored at `$HR_LEDGER_HOME/config.json`. It names the data
//! directory that holds the source spreadsheets, the file (and optionally the sheet) for each
//! source, and the delimiter used for CSV sources.

use crate::normalize::SourceKind;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "hr-ledger";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const DATA_DIR: &str = "dados";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$HR_LEDGER_HOME` and from there it loads `$HR_LEDGER_HOME/config.json`. It
/// resolves the location of every source file.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    data_dir: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the home directory, e.g. `$HOME/hr-ledger`
    /// - `data_dir` - Where the source spreadsheets live. Relative paths are relative to `dir`.
    ///   Defaults to `dir/dados`, which is created if it does not exist.
    /// - `sources` - The file names of the source spreadsheets within `data_dir`.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        data_dir: Option<PathBuf>,
        sources: Sources,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let data_dir_setting = data_dir.unwrap_or_else(|| PathBuf::from(DATA_DIR));
        let data_dir = resolve(&root, &data_dir_setting);
        utils::make_dir(&data_dir)
            .await
            .context("Unable to create the data directory")?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            data_dir: data_dir_setting,
            sources,
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            data_dir,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory and the config file exist
    /// - load and validate the config file
    /// - return the loaded configuration object
    ///
    /// The data directory and the source files are not checked here, a missing source is
    /// reported when it is loaded.
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        if !maybe_relative.is_dir() {
            bail!(
                "The home directory is missing '{}', run init first",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let data_dir = resolve(&root, &config_file.data_dir);

        Ok(Self {
            root,
            config_path,
            data_dir,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The configured file for one of the normalized sources.
    pub fn source(&self, kind: SourceKind) -> &SourceFile {
        let sources = &self.config_file.sources;
        match kind {
            SourceKind::Admission => &sources.admissions,
            SourceKind::Termination => &sources.terminations,
            SourceKind::Exam => &sources.exams,
            SourceKind::SafetyEquipment => &sources.safety_equipment,
            SourceKind::ExtraPayment => &sources.extra_payments,
        }
    }

    /// The configured file for the branch to producer reference table.
    pub fn producers(&self) -> &SourceFile {
        &self.config_file.sources.producers
    }

    /// Returns the path of `source` if it is absolute, otherwise resolves it against the data
    /// directory.
    pub fn resolve_path(&self, source: &SourceFile) -> PathBuf {
        resolve(&self.data_dir, &source.path)
    }

    /// The field separator for CSV sources.
    pub fn csv_delimiter(&self) -> u8 {
        // Validated as ASCII when the config is loaded.
        self.config_file.csv_delimiter as u8
    }
}

fn resolve(base: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "hr-ledger",
///   "config_version": 1,
///   "data_dir": "dados",
///   "csv_delimiter": ",",
///   "sources": {
///     "admissions": { "path": "admissoes.2025.xlsx" },
///     "terminations": { "path": "demissoes.rescisoes.2025.xlsx" },
///     "exams": { "path": "exames.2025.xlsx" },
///     "safety_equipment": { "path": "epi.uniformes.2025.xlsx" },
///     "extra_payments": { "path": "adt.13.ferias.xlsx", "sheet": "2025" },
///     "producers": { "path": "produtores.2025.xlsx" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "hr-ledger"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Directory holding the source files, relative to config.json or absolute
    data_dir: PathBuf,

    /// Field separator for CSV sources
    #[serde(default = "default_delimiter")]
    csv_delimiter: char,

    sources: Sources,
}

fn default_delimiter() -> char {
    ','
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            data_dir: PathBuf::from(DATA_DIR),
            csv_delimiter: default_delimiter(),
            sources: Sources::default(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it fails validation
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.csv_delimiter.is_ascii(),
            "Invalid csv_delimiter in config file: '{}' is not a single ASCII character",
            config.csv_delimiter
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

/// The source files, one per normalized source plus the producers reference table.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Sources {
    pub admissions: SourceFile,
    pub terminations: SourceFile,
    pub exams: SourceFile,
    pub safety_equipment: SourceFile,
    pub extra_payments: SourceFile,
    pub producers: SourceFile,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            admissions: SourceFile::new("admissoes.2025.xlsx"),
            terminations: SourceFile::new("demissoes.rescisoes.2025.xlsx"),
            exams: SourceFile::new("exames.2025.xlsx"),
            safety_equipment: SourceFile::new("epi.uniformes.2025.xlsx"),
            extra_payments: SourceFile::new("adt.13.ferias.xlsx"),
            producers: SourceFile::new("produtores.2025.xlsx"),
        }
    }
}

impl Sources {
    #[cfg(test)]
    /// The same file names as the default, with a `.csv` extension.
    pub(crate) fn csv() -> Self {
        let csv = |f: &SourceFile| SourceFile::new(f.path.with_extension("csv"));
        let xlsx = Self::default();
        Self {
            admissions: csv(&xlsx.admissions),
            terminations: csv(&xlsx.terminations),
            exams: csv(&xlsx.exams),
            safety_equipment: csv(&xlsx.safety_equipment),
            extra_payments: csv(&xlsx.extra_payments),
            producers: csv(&xlsx.producers),
        }
    }
}

/// One source file. `path` is relative to the data directory unless it is absolute.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct SourceFile {
    pub path: PathBuf,

    /// The worksheet to read. Defaults to the first sheet of the workbook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
        }
    }

    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }
}
