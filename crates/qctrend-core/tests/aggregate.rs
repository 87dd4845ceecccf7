//! End-to-end aggregation tests: configuration collections plus result
//! files in, modality snapshot out.

use chrono::NaiveDate;
use qctrend_core::{AggregationConfig, aggregate};
use qctrend_ingest::{
    MemorySource, load_auto_templates, load_auto_vendor_templates, load_limit_plot_templates,
    load_paramset_marks,
};
use qctrend_model::NewestDate;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 13).expect("valid date")
}

fn template_yaml(label: &str, path_output: &str, limits_label: &str) -> String {
    format!(
        "  - label: {label}\n    path_output: {path_output}\n    active: true\n    \
         import_only: false\n    paramset_label: default\n    quicktemp_label: daily\n    \
         limits_and_plot_label: '{limits_label}'\n"
    )
}

fn base_source() -> MemorySource {
    let mut source = MemorySource::new();
    source.insert(
        "config/paramsets_CT.yaml",
        "label: default\noutput:\n  decimal_mark: '.'\n",
    );
    source.insert(
        "config/paramsets_Xray.yaml",
        "label: default\noutput:\n  decimal_mark: ','\n",
    );
    source
}

fn load_config(source: &MemorySource) -> AggregationConfig {
    AggregationConfig {
        auto_templates: load_auto_templates(source, "config"),
        auto_vendor_templates: load_auto_vendor_templates(source, "config"),
        paramsets: load_paramset_marks(source, "config"),
        limit_plots: load_limit_plot_templates(source, "config"),
    }
}

#[test]
fn best_effort_pass_skips_unreadable_template() {
    let mut source = base_source();
    let yaml = format!(
        "CT:\n{}{}{}",
        template_yaml("t1", "results/t1.txt", ""),
        template_yaml("t2", "results/missing.txt", ""),
        template_yaml("t3", "results/t3.txt", ""),
    );
    source.insert("config/auto_templates.yaml", yaml);
    source.insert(
        "results/t1.txt",
        "Date\tnoise\n01.05.2024\t1.0\n02.05.2024\t2.0\n",
    );
    source.insert(
        "results/t3.txt",
        "Date\tnoise\n01.05.2024\t1.0\n10.05.2024\t2.0\n",
    );

    let collection = aggregate(&load_config(&source), &source, today());
    let ct = collection.get("CT").expect("CT modality");
    let labels: Vec<&str> = ct.iter().map(|template| template.label.as_str()).collect();
    assert_eq!(labels, vec!["t1", "t3"]);
    assert_eq!(ct[1].days_since, 3);
    assert_eq!(
        ct[1].newest_date,
        NewestDate::Date(NaiveDate::from_ymd_opt(2024, 5, 10).expect("valid date"))
    );
}

#[test]
fn modality_with_no_loaded_templates_is_pruned() {
    let mut source = base_source();
    let yaml = format!(
        "CT:\n{}Xray:\n{}",
        template_yaml("good", "results/good.txt", ""),
        // Single-row file: parsing fails, the template contributes nothing.
        template_yaml("bad", "results/bad.txt", ""),
    );
    source.insert("config/auto_templates.yaml", yaml);
    source.insert(
        "results/good.txt",
        "Date\tnoise\n01.05.2024\t1.0\n02.05.2024\t2.0\n",
    );
    source.insert("results/bad.txt", "Date\tnoise\n01.05.2024\t1,0\n");

    let collection = aggregate(&load_config(&source), &source, today());
    let modalities: Vec<&str> = collection.modalities().collect();
    assert_eq!(modalities, vec!["CT"]);
    assert!(collection.get("Xray").is_none());
}

#[test]
fn ineligible_templates_contribute_nothing() {
    let mut source = base_source();
    let yaml = "
CT:
  - label: inactive
    path_output: results/a.txt
    active: false
    paramset_label: default
    quicktemp_label: daily
  - label: ''
    path_output: results/a.txt
    active: true
    paramset_label: default
    quicktemp_label: daily
  - label: import_only
    path_output: results/a.txt
    active: true
    import_only: true
    paramset_label: default
    quicktemp_label: daily
  - label: unknown_paramset
    path_output: results/a.txt
    active: true
    paramset_label: nonexistent
    quicktemp_label: daily
";
    source.insert("config/auto_templates.yaml", yaml);
    source.insert(
        "results/a.txt",
        "Date\tnoise\n01.05.2024\t1.0\n02.05.2024\t2.0\n",
    );

    let collection = aggregate(&load_config(&source), &source, today());
    assert!(collection.is_empty());
}

#[test]
fn default_limit_plot_is_synthesized_for_empty_label() {
    let mut source = base_source();
    source.insert(
        "config/auto_templates.yaml",
        format!("CT:\n{}", template_yaml("t1", "results/t1.txt", "")),
    );
    source.insert(
        "results/t1.txt",
        "Date\tnoise\tsnr\n01.05.2024\t1.0\t10.0\n02.05.2024\t2.0\t20.0\n",
    );

    let collection = aggregate(&load_config(&source), &source, today());
    let template = &collection.get("CT").expect("CT modality")[0];
    assert_eq!(
        template.limits_and_plot.groups,
        vec![vec!["noise".to_string()], vec!["snr".to_string()]]
    );
    assert!(template.limits_and_plot.groups_limits.is_none());
}

#[test]
fn named_limit_plot_is_joined_by_label() {
    let mut source = base_source();
    source.insert(
        "config/auto_templates.yaml",
        format!("CT:\n{}", template_yaml("t1", "results/t1.txt", "ctp404")),
    );
    source.insert(
        "config/limits_and_plot_templates.yaml",
        "
CT:
  - label: ctp404
    groups:
      - [noise, snr]
    groups_title: [Both]
    groups_limits:
      - [0.5, 2.5]
",
    );
    source.insert(
        "results/t1.txt",
        "Date\tnoise\tsnr\n01.05.2024\t1.0\t10.0\n02.05.2024\t2.0\t20.0\n",
    );

    let collection = aggregate(&load_config(&source), &source, today());
    let template = &collection.get("CT").expect("CT modality")[0];
    assert_eq!(template.limits_and_plot.label, "ctp404");
    assert_eq!(template.limits_and_plot.groups.len(), 1);
}

#[test]
fn vendor_templates_use_modality_default_decimal_mark() {
    let mut source = base_source();
    source.insert(
        "config/auto_vendor_templates.yaml",
        "
Xray:
  - label: vendor_daily
    path_output: results/vendor.txt
    active: true
",
    );
    // Xray's default parameter set uses the comma decimal mark.
    source.insert(
        "results/vendor.txt",
        "Date\tdose\n01.05.2024\t1,25\n02.05.2024\t1,5\n",
    );

    let collection = aggregate(&load_config(&source), &source, today());
    let template = &collection.get("Xray").expect("Xray modality")[0];
    let table = template.data.as_ref().expect("table");
    assert_eq!(table.rows[0].values, vec![Some(1.25)]);
    assert_eq!(table.rows[1].values, vec![Some(1.5)]);
}

#[test]
fn unparseable_trailing_date_surfaces_error_sentinel() {
    let mut source = base_source();
    source.insert(
        "config/auto_templates.yaml",
        format!("CT:\n{}", template_yaml("t1", "results/t1.txt", "")),
    );
    source.insert(
        "results/t1.txt",
        "Date\tnoise\n01.05.2024\t1.0\n02.05.2024\t2.0\nnot_a_date\t3.0\n",
    );

    let collection = aggregate(&load_config(&source), &source, today());
    let template = &collection.get("CT").expect("CT modality")[0];
    assert_eq!(template.newest_date, NewestDate::Error);
    assert_eq!(template.days_since, qctrend_model::DAYS_SINCE_UNKNOWN);
    assert_eq!(template.newest_date.to_string(), "error");
}

#[test]
fn primary_templates_come_before_vendor_templates() {
    let mut source = base_source();
    source.insert(
        "config/auto_templates.yaml",
        format!("CT:\n{}", template_yaml("primary", "results/p.txt", "")),
    );
    source.insert(
        "config/auto_vendor_templates.yaml",
        "
CT:
  - label: vendor
    path_output: results/v.txt
    active: true
",
    );
    source.insert(
        "results/p.txt",
        "Date\tnoise\n01.05.2024\t1.0\n02.05.2024\t2.0\n",
    );
    source.insert(
        "results/v.txt",
        "Date\tnoise\n01.05.2024\t1.0\n02.05.2024\t2.0\n",
    );

    let collection = aggregate(&load_config(&source), &source, today());
    let labels: Vec<&str> = collection
        .get("CT")
        .expect("CT modality")
        .iter()
        .map(|template| template.label.as_str())
        .collect();
    assert_eq!(labels, vec!["primary", "vendor"]);
}
