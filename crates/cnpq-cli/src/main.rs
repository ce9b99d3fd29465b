//! CNPq payment ledger CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use cnpq_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use cnpq_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod commands;
mod summary;

use crate::commands::{
    run_build, run_categories, run_mean_by_region, run_notes, run_totals, run_trend, run_years,
};
use crate::summary::print_build_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let json = cli.json;
    let outcome = match &cli.command {
        Command::Build(args) => run_build(args).and_then(|report| {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_build_summary(&report);
            }
            Ok(report.complete)
        }),
        Command::Years(args) => run_years(args, json).map(|()| true),
        Command::MeanByRegion(args) => run_mean_by_region(args, json).map(|()| true),
        Command::Totals(args) => run_totals(args, json).map(|()| true),
        Command::Categories(args) => run_categories(args, json).map(|()| true),
        Command::Trend(args) => run_trend(args, json).map(|()| true),
        Command::Notes(args) => run_notes(args, json).map(|()| true),
    };
    let exit_code = match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
