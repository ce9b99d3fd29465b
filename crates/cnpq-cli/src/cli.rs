//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use cnpq_model::RegionPreference;
use cnpq_query::{AreaLevel, CategoryMetric};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cnpq-pagamentos",
    version,
    about = "CNPq payment ledgers - harmonize 2022-2024 exports into one dataset",
    long_about = "Harmonize the yearly CNPq payment exports into a single canonical dataset.\n\n\
                  Reads the raw 2022, 2023 and 2024 CSV ledgers, maps their columns onto one\n\
                  schema, coerces currency, dates and region codes, and writes CSV (and\n\
                  Parquet when available). Query commands read the written dataset back."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Print results as JSON instead of tables.
    #[arg(long = "json", global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Harmonize the raw ledgers and write the unified dataset.
    Build(BuildArgs),

    /// List the reference years present in a unified dataset.
    Years(DatasetArgs),

    /// Mean payment per state code for one year.
    MeanByRegion(MeanByRegionArgs),

    /// Payment totals per region or knowledge area.
    Totals(TotalsArgs),

    /// Payment metric per funding category (MODALIDADE).
    Categories(CategoriesArgs),

    /// Mean payment per category across years.
    Trend(DatasetArgs),

    /// Warnings about gaps in a unified dataset.
    Notes(DatasetArgs),
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Folder holding the raw yearly CSV exports.
    #[arg(long = "raw-dir", value_name = "DIR", default_value = "data/raw")]
    pub raw_dir: PathBuf,

    /// Folder receiving the unified dataset.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "data/preprocessed")]
    pub output_dir: PathBuf,

    /// Folder for the per-year cache (default: <OUTPUT_DIR>/yearly).
    #[arg(long = "cache-dir", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Re-read every raw file even when a cached year exists.
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Write only the CSV copy of the dataset.
    #[arg(long = "no-parquet")]
    pub no_parquet: bool,

    /// Unify the years that succeeded when another year fails.
    ///
    /// By default a year that cannot be harmonized stops the run. With this
    /// flag the failure is reported and the remaining years are written; the
    /// exit code is still 1.
    #[arg(long = "continue-on-error")]
    pub continue_on_error: bool,
}

#[derive(Args)]
pub struct DatasetArgs {
    /// Folder holding the unified dataset written by `build`.
    #[arg(value_name = "DATASET_DIR", default_value = "data/preprocessed")]
    pub dataset_dir: PathBuf,
}

#[derive(Parser)]
pub struct MeanByRegionArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Reference year to filter on.
    #[arg(long = "year")]
    pub year: i32,

    /// Which state code column to group by.
    #[arg(long = "region", value_enum, default_value = "auto")]
    pub region: RegionArg,
}

#[derive(Parser)]
pub struct TotalsArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Grouping for the totals.
    #[arg(long = "by", value_enum, default_value = "region")]
    pub by: TotalsByArg,

    /// Restrict to one reference year.
    #[arg(long = "year")]
    pub year: Option<i32>,

    /// Group by origin state when no macro-region column is filled.
    #[arg(long = "origin")]
    pub origin: bool,
}

#[derive(Parser)]
pub struct CategoriesArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Metric computed per category.
    #[arg(long = "metric", value_enum, default_value = "sum")]
    pub metric: MetricArg,

    /// Restrict to one reference year.
    #[arg(long = "year")]
    pub year: Option<i32>,
}

/// Region column choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum RegionArg {
    Auto,
    Destination,
    Origin,
}

impl From<RegionArg> for RegionPreference {
    fn from(arg: RegionArg) -> Self {
        match arg {
            RegionArg::Auto => Self::Auto,
            RegionArg::Destination => Self::Destination,
            RegionArg::Origin => Self::Origin,
        }
    }
}

/// Totals grouping choices.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum TotalsByArg {
    Region,
    GrandeArea,
    Area,
    Subarea,
}

impl TotalsByArg {
    /// Knowledge-area level, or `None` for region totals.
    pub fn area_level(self) -> Option<AreaLevel> {
        match self {
            Self::Region => None,
            Self::GrandeArea => Some(AreaLevel::GrandeArea),
            Self::Area => Some(AreaLevel::Area),
            Self::Subarea => Some(AreaLevel::Subarea),
        }
    }
}

/// Category metric choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum MetricArg {
    Sum,
    PerBeneficiary,
    PerProcess,
}

impl From<MetricArg> for CategoryMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Sum => Self::Sum,
            MetricArg::PerBeneficiary => Self::PerBeneficiaryMean,
            MetricArg::PerProcess => Self::PerProcessMean,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
