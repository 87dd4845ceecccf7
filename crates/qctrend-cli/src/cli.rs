//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "qctrend",
    version,
    about = "QC trend dashboard - aggregate automated constancy-control results",
    long_about = "Aggregate automated quality-control measurement results into \
                  per-template trend datasets and evaluate them against \
                  configured acceptance limits.\n\n\
                  Configuration is read from the imageQC config folder (YAML \
                  files); result files are read from the paths the automation \
                  templates declare."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Aggregate all templates and print the overview table.
    Overview(OverviewArgs),

    /// Evaluate limits for one template and print its plot bundles as JSON.
    Plots(PlotsArgs),
}

#[derive(Parser)]
pub struct OverviewArgs {
    /// Configuration folder (default: $IMAGEQC_CONFIG_FOLDER).
    #[arg(value_name = "CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct PlotsArgs {
    /// Configuration folder (default: $IMAGEQC_CONFIG_FOLDER).
    #[arg(value_name = "CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Modality code of the template (e.g. CT, Xray).
    #[arg(long = "modality", value_name = "MODALITY")]
    pub modality: String,

    /// Template label within the modality.
    #[arg(long = "template", value_name = "LABEL")]
    pub template: String,
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
