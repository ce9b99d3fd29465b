use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{info, info_span};

use cnpq_cli::cli::{BuildArgs, CategoriesArgs, DatasetArgs, MeanByRegionArgs, TotalsArgs};
use cnpq_cli::types::BuildReport;
use cnpq_core::{FailurePolicy, PipelineConfig, run_pipeline};
use cnpq_model::RegionPreference;
use cnpq_output::load_unified_dataset;
use cnpq_query::{
    CategoryMetric, dataset_notes, invest_by_category, list_available_years, region_means,
    time_mean_by_category, total_by_area, total_by_region,
};

use crate::summary::{
    print_categories, print_notes, print_region_means, print_totals, print_trend, print_years,
};

pub fn run_build(args: &BuildArgs) -> Result<BuildReport> {
    let mut config = PipelineConfig::new(&args.raw_dir, &args.output_dir)
        .with_cache(!args.no_cache)
        .with_parquet(!args.no_parquet)
        .with_failure_policy(if args.continue_on_error {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        });
    if let Some(cache_dir) = &args.cache_dir {
        config = config.with_cache_dir(cache_dir);
    }
    let result = run_pipeline(&config)
        .with_context(|| format!("build dataset from {}", args.raw_dir.display()))?;
    Ok(BuildReport::from(&result))
}

fn load_dataset(args: &DatasetArgs) -> Result<DataFrame> {
    let span = info_span!("load", dir = %args.dataset_dir.display());
    let _guard = span.enter();
    let loaded = load_unified_dataset(&args.dataset_dir)
        .with_context(|| format!("load dataset from {}", args.dataset_dir.display()))?;
    info!(
        path = %loaded.path.display(),
        rows = loaded.data.height(),
        "dataset loaded"
    );
    Ok(loaded.data)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize result")?;
    println!("{json}");
    Ok(())
}

pub fn run_years(args: &DatasetArgs, json: bool) -> Result<()> {
    let df = load_dataset(args)?;
    let years = list_available_years(&df);
    if json {
        return print_json(&years);
    }
    print_years(&years);
    Ok(())
}

pub fn run_mean_by_region(args: &MeanByRegionArgs, json: bool) -> Result<()> {
    let df = load_dataset(&args.dataset)?;
    let preference = RegionPreference::from(args.region);
    let means = region_means(&df, args.year, preference)
        .with_context(|| format!("mean payment by region for {}", args.year))?;
    if json {
        return print_json(&means);
    }
    print_region_means(args.year, &means);
    Ok(())
}

pub fn run_totals(args: &TotalsArgs, json: bool) -> Result<()> {
    let df = load_dataset(&args.dataset)?;
    let (label, totals) = match args.by.area_level() {
        None => (
            "Region".to_string(),
            total_by_region(&df, args.year, !args.origin).context("totals by region")?,
        ),
        Some(level) => (
            level.column_name().to_string(),
            total_by_area(&df, args.year, level)
                .with_context(|| format!("totals by {level}"))?,
        ),
    };
    if json {
        return print_json(&totals);
    }
    print_totals(&label, &totals);
    Ok(())
}

pub fn run_categories(args: &CategoriesArgs, json: bool) -> Result<()> {
    let df = load_dataset(&args.dataset)?;
    let metric = CategoryMetric::from(args.metric);
    let values = invest_by_category(&df, args.year, metric)
        .with_context(|| format!("category metric {metric}"))?;
    if json {
        return print_json(&values);
    }
    print_categories(&metric.to_string(), &values);
    Ok(())
}

pub fn run_trend(args: &DatasetArgs, json: bool) -> Result<()> {
    let df = load_dataset(args)?;
    let series = time_mean_by_category(&df).context("mean payment per category and year")?;
    if json {
        return print_json(&series);
    }
    print_trend(&series);
    Ok(())
}

pub fn run_notes(args: &DatasetArgs, json: bool) -> Result<()> {
    let df = load_dataset(args)?;
    let notes = dataset_notes(&df);
    if json {
        return print_json(&notes);
    }
    print_notes(&notes);
    Ok(())
}
