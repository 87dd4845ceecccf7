//! Integration tests for YAML configuration loading.

use qctrend_ingest::{
    ByteSource, LocalSource, MemorySource, load_auto_templates, load_dash_settings,
    load_limit_plot_templates, load_paramset_marks,
};
use qctrend_model::GroupLimits;

const AUTO_TEMPLATES: &str = "
CT:
  - label: daily_ct
    path_output: results/daily_ct.txt
    active: true
    import_only: false
    paramset_label: default
    quicktemp_label: daily
    limits_and_plot_label: ctp404
Xray:
  - label: weekly_xray
    path_output: results/weekly_xray.txt
    active: true
    paramset_label: default
    quicktemp_label: weekly
    limits_and_plot_label: ''
";

#[test]
fn loads_auto_templates_in_declaration_order() {
    let mut source = MemorySource::new();
    source.insert("config/auto_templates.yaml", AUTO_TEMPLATES.as_bytes());
    let templates = load_auto_templates(&source, "config");
    let modalities: Vec<&str> = templates
        .modalities
        .iter()
        .map(|(code, _)| code.as_str())
        .collect();
    assert_eq!(modalities, vec!["CT", "Xray"]);

    let ct = templates.get("CT").expect("CT templates");
    assert_eq!(ct.len(), 1);
    assert_eq!(ct[0].label, "daily_ct");
    assert_eq!(ct[0].path_output, "results/daily_ct.txt");
    assert!(ct[0].active);
    assert!(!ct[0].import_only);

    let xray = templates.get("Xray").expect("Xray templates");
    assert!(xray[0].limits_and_plot_label.is_empty());
}

#[test]
fn missing_template_file_yields_empty_collection() {
    let source = MemorySource::new();
    let templates = load_auto_templates(&source, "config");
    assert!(templates.is_empty());
}

#[test]
fn loads_paramset_marks_from_multi_document_stream() {
    let mut source = MemorySource::new();
    source.insert(
        "config/paramsets_CT.yaml",
        "label: default\noutput:\n  decimal_mark: ','\n---\nlabel: strict\noutput:\n  decimal_mark: '.'\n",
    );
    source.insert(
        "config/paramsets_Xray.yaml",
        "label: default\noutput:\n  decimal_mark: '.'\n",
    );
    let paramsets = load_paramset_marks(&source, "config");
    let ct = paramsets.get("CT").expect("CT paramsets");
    assert_eq!(ct.len(), 2);
    assert_eq!(ct[0].label, "default");
    assert_eq!(ct[0].decimal_mark, ',');
    assert_eq!(ct[1].decimal_mark, '.');
    assert!(paramsets.get("NM").is_none());
}

#[test]
fn loads_limit_plot_templates_with_tagged_limits() {
    let mut source = MemorySource::new();
    source.insert(
        "config/limits_and_plot_templates.yaml",
        "
CT:
  - label: ctp404
    groups:
      - [noise]
      - [snr, cnr]
    groups_title: [Noise, Signal]
    groups_hide: [false, false]
    groups_limits:
      - [relative_median, 20]
      - [0.5, 2.5]
    groups_ranges:
      - [null, null]
      - [0, 100]
",
    );
    let limit_plots = load_limit_plot_templates(&source, "config");
    let ct = limit_plots.get("CT").expect("CT limit plots");
    assert_eq!(ct.len(), 1);
    assert_eq!(ct[0].label, "ctp404");
    assert_eq!(ct[0].limits(0), GroupLimits::RelativeMedian { percent: 20.0 });
    assert_eq!(
        ct[0].limits(1),
        GroupLimits::Fixed {
            lower: Some(0.5),
            upper: Some(2.5)
        }
    );
}

#[test]
fn dash_settings_default_when_missing_and_merge_when_partial() {
    let source = MemorySource::new();
    let defaults = load_dash_settings(&source, "config");
    assert_eq!(defaults.days_since_limit, 30);

    let mut source = MemorySource::new();
    source.insert(
        "config/dash_settings.yaml",
        "header: Site QC\ndays_since_limit: 7\n",
    );
    let settings = load_dash_settings(&source, "config");
    assert_eq!(settings.header, "Site QC");
    assert_eq!(settings.days_since_limit, 7);
    assert_eq!(settings.table_headers.len(), 5);
}

#[test]
fn local_source_reads_config_folder() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("auto_templates.yaml");
    std::fs::write(&path, AUTO_TEMPLATES).expect("write config");
    let config_dir = dir.path().to_string_lossy().to_string();
    let templates = load_auto_templates(&LocalSource, &config_dir);
    assert_eq!(templates.modalities.len(), 2);

    let missing = LocalSource.read(&format!("{config_dir}/nope.yaml"));
    assert!(missing.is_err());
}
