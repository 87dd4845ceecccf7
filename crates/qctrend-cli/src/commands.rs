//! Command implementations: load configuration, run an aggregation pass,
//! render the requested output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;

use qctrend_core::{AggregationConfig, PlotBundle, aggregate, evaluate, visible_titles};
use qctrend_ingest::{
    ByteSource, LocalSource, load_auto_templates, load_auto_vendor_templates, load_dash_settings,
    load_limit_plot_templates, load_paramset_marks,
};
use qctrend_model::ModalityCollection;

use crate::cli::{OverviewArgs, PlotsArgs};
use crate::overview::print_overview;

/// Environment variable naming the configuration folder, set by the
/// automation tool when it launches the dashboard.
const CONFIG_FOLDER_VAR: &str = "IMAGEQC_CONFIG_FOLDER";

pub fn run_overview(args: &OverviewArgs) -> Result<()> {
    let config_dir = resolve_config_dir(args.config_dir.as_deref())?;
    let source = LocalSource;
    let settings = load_dash_settings(&source, &config_dir);
    let collection = run_pass(&source, &config_dir);
    print_overview(&collection, &settings);
    Ok(())
}

#[derive(Serialize)]
struct PlotsOutput<'a> {
    modality: &'a str,
    template: &'a str,
    titles: Vec<String>,
    plots: Vec<PlotBundle>,
}

pub fn run_plots(args: &PlotsArgs) -> Result<()> {
    let config_dir = resolve_config_dir(args.config_dir.as_deref())?;
    let source = LocalSource;
    let collection = run_pass(&source, &config_dir);

    let Some(templates) = collection.get(&args.modality) else {
        bail!("no results for modality '{}'", args.modality);
    };
    let Some(template) = templates
        .iter()
        .find(|template| template.label == args.template)
    else {
        bail!(
            "no template '{}' with results in modality '{}'",
            args.template,
            args.modality
        );
    };

    let (titles, plots) = match &template.data {
        Some(table) => (
            visible_titles(&template.limits_and_plot),
            evaluate(table, &template.limits_and_plot),
        ),
        None => (Vec::new(), Vec::new()),
    };
    let output = PlotsOutput {
        modality: &args.modality,
        template: &template.label,
        titles,
        plots,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// One full aggregation pass against the local filesystem.
fn run_pass(source: &dyn ByteSource, config_dir: &str) -> ModalityCollection {
    let config = AggregationConfig {
        auto_templates: load_auto_templates(source, config_dir),
        auto_vendor_templates: load_auto_vendor_templates(source, config_dir),
        paramsets: load_paramset_marks(source, config_dir),
        limit_plots: load_limit_plot_templates(source, config_dir),
    };
    aggregate(&config, source, chrono::Local::now().date_naive())
}

fn resolve_config_dir(arg: Option<&Path>) -> Result<String> {
    let path: PathBuf = match arg {
        Some(path) => path.to_path_buf(),
        None => std::env::var(CONFIG_FOLDER_VAR)
            .map(PathBuf::from)
            .with_context(|| {
                format!("no CONFIG_DIR argument and {CONFIG_FOLDER_VAR} is not set")
            })?,
    };
    if !path.is_dir() {
        bail!("configuration folder not found: {}", path.display());
    }
    Ok(path.to_string_lossy().into_owned())
}
