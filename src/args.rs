//! These structs provide the CLI interface for the hr-ledger CLI.

use crate::export::ExportFormat;
use crate::model::{MovementType, Period};
use crate::report::{Dimension, Filter};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// hr-ledger: Unifies HR spreadsheets into one ledger of HR cost events.
///
/// The program reads the admission, termination, medical exam, safety equipment (EPI) and extra
/// payment (13th salary and vacation) spreadsheets of a set of branches, joins each branch to its
/// rural producer, and produces a single table of cost events that can be filtered, totalled and
/// exported.
///
/// Run `hr-ledger init` first, then place the source spreadsheets in the data directory.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and initialize the configuration file.
    ///
    /// This is the first command you should run. It writes `config.json` to --home with the
    /// default source file names:
    ///
    /// - admissoes.2025.xlsx
    /// - demissoes.rescisoes.2025.xlsx
    /// - exames.2025.xlsx
    /// - epi.uniformes.2025.xlsx
    /// - adt.13.ferias.xlsx
    /// - produtores.2025.xlsx
    ///
    /// Edit `config.json` if your files are named differently or you want to read a specific
    /// sheet.
    Init(InitArgs),
    /// Write the ledger rows, optionally filtered, as CSV or JSON.
    Export(ExportArgs),
    /// Print the headline totals of the ledger, optionally filtered and grouped.
    Summary(SummaryArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the configuration is held. Defaults to ~/hr-ledger
    #[arg(long, env = "HR_LEDGER_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `hr-ledger init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The directory holding the source spreadsheets. Relative paths are relative to --home.
    /// Defaults to $HR_LEDGER_HOME/dados
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl InitArgs {
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }
}

/// Args for the `hr-ledger export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// The output format.
    #[arg(long, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Where to write the export. Writes to stdout when omitted.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    #[clap(flatten)]
    filter: FilterArgs,
}

impl ExportArgs {
    pub fn new(format: ExportFormat, output: Option<PathBuf>, filter: FilterArgs) -> Self {
        Self {
            format,
            output,
            filter,
        }
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn filter(&self) -> Filter {
        self.filter.filter()
    }
}

/// Args for the `hr-ledger summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// Also print totals for each value of this dimension.
    #[arg(long)]
    by: Option<Dimension>,

    #[clap(flatten)]
    filter: FilterArgs,
}

impl SummaryArgs {
    pub fn new(by: Option<Dimension>, filter: FilterArgs) -> Self {
        Self { by, filter }
    }

    pub fn by(&self) -> Option<Dimension> {
        self.by
    }

    pub fn filter(&self) -> Filter {
        self.filter.filter()
    }
}

/// Dimension filters. Each may be given more than once, in which case any of the values matches.
#[derive(Debug, Default, Parser, Clone)]
pub struct FilterArgs {
    /// Only include records of this rural producer.
    #[arg(long)]
    producer: Vec<String>,

    /// Only include records of this branch.
    #[arg(long)]
    branch: Vec<String>,

    /// Only include records of this unit.
    #[arg(long)]
    unit: Vec<String>,

    /// Only include records of this department.
    #[arg(long)]
    department: Vec<String>,

    /// Only include records in this month, written as MM/YYYY.
    #[arg(long)]
    period: Vec<Period>,

    /// Only include records of this movement type, e.g. Termination or ExtraPayment-Vacation.
    #[arg(long)]
    movement: Vec<MovementType>,

    /// Only include extra payments with this type label as written in the source.
    #[arg(long)]
    label: Vec<String>,
}

impl FilterArgs {
    pub fn filter(&self) -> Filter {
        Filter {
            producers: self.producer.clone(),
            branches: self.branch.clone(),
            units: self.unit.clone(),
            departments: self.department.clone(),
            periods: self.period.clone(),
            movements: self.movement.clone(),
            labels: self.label.clone(),
        }
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("hr-ledger"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or HR_LEDGER_HOME instead of relying on the default \
                home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("hr-ledger")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
