//! YAML configuration loading.
//!
//! The automation tool keeps its configuration as YAML files in one folder
//! (or bucket prefix): modality-keyed template collections, per-modality
//! parameter-set files (multi-document streams), limit/plot templates, and
//! dashboard settings. Loading is deliberately lenient: a missing or
//! undeserializable file degrades to an empty collection (or defaults) with
//! a warning, so one bad file never aborts an aggregation pass.

use serde::Deserialize;

use qctrend_model::{DashSettings, LimitPlotTemplate};

use crate::error::IngestError;
use crate::source::ByteSource;

/// Modality codes in canonical declaration order.
pub const MODALITIES: [&str; 7] = ["CT", "Xray", "Mammo", "NM", "SPECT", "PET", "MR"];

/// One automation template declaration (primary or vendor).
///
/// Vendor files simply omit `paramset_label` and `quicktemp_label`; the
/// defaults keep one type serving both collections.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AutoTemplateConfig {
    pub label: String,
    /// Path (or object key) of the tab-delimited result file.
    pub path_output: String,
    pub active: bool,
    pub import_only: bool,
    /// Parameter-set reference, looked up for the decimal mark.
    pub paramset_label: String,
    /// Test-parameter grouping reference; empty means not runnable.
    pub quicktemp_label: String,
    /// Limit/plot template reference; empty means synthesize the default.
    pub limits_and_plot_label: String,
}

/// Parameter-set label with its output decimal mark.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSetMark {
    pub label: String,
    pub decimal_mark: char,
}

/// A modality-keyed collection preserving declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalityKeyed<T> {
    pub modalities: Vec<(String, Vec<T>)>,
}

impl<T> Default for ModalityKeyed<T> {
    fn default() -> Self {
        Self {
            modalities: Vec::new(),
        }
    }
}

impl<T> ModalityKeyed<T> {
    pub fn get(&self, modality: &str) -> Option<&[T]> {
        self.modalities
            .iter()
            .find(|(code, _)| code == modality)
            .map(|(_, items)| items.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.modalities.is_empty()
    }
}

pub type TemplateCollection = ModalityKeyed<AutoTemplateConfig>;
pub type ParamSetCollection = ModalityKeyed<ParamSetMark>;
pub type LimitPlotCollection = ModalityKeyed<LimitPlotTemplate>;

/// Join a config-folder path and a file name with `/`, which serves both
/// filesystem paths and object keys.
fn config_file(config_dir: &str, file_name: &str) -> String {
    if config_dir.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{file_name}", config_dir.trim_end_matches('/'))
    }
}

/// Load a modality-keyed YAML mapping, preserving key declaration order.
fn load_modality_keyed<T>(
    source: &dyn ByteSource,
    config_dir: &str,
    file_name: &str,
) -> ModalityKeyed<T>
where
    T: for<'de> Deserialize<'de>,
{
    let path = config_file(config_dir, file_name);
    let bytes = match source.read(&path) {
        Ok(bytes) => bytes,
        Err(IngestError::NotFound { .. }) => {
            tracing::warn!(%path, "configuration file not found, using empty collection");
            return ModalityKeyed::default();
        }
        Err(error) => {
            tracing::warn!(%path, %error, "failed to read configuration file");
            return ModalityKeyed::default();
        }
    };
    let value: serde_yaml::Value = match serde_yaml::from_slice(&bytes) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(%path, %error, "failed to parse configuration file");
            return ModalityKeyed::default();
        }
    };
    let Some(mapping) = value.as_mapping() else {
        tracing::warn!(%path, "configuration file is not a modality mapping");
        return ModalityKeyed::default();
    };
    let mut collection = ModalityKeyed::default();
    for (key, entries) in mapping {
        let Some(modality) = key.as_str() else {
            continue;
        };
        match serde_yaml::from_value::<Vec<T>>(entries.clone()) {
            Ok(items) => collection.modalities.push((modality.to_string(), items)),
            Err(error) => {
                tracing::warn!(%path, modality, %error, "skipping malformed modality entry");
            }
        }
    }
    collection
}

/// Load the primary automation template declarations.
pub fn load_auto_templates(source: &dyn ByteSource, config_dir: &str) -> TemplateCollection {
    load_modality_keyed(source, config_dir, "auto_templates.yaml")
}

/// Load the vendor-supplied automation template declarations.
pub fn load_auto_vendor_templates(source: &dyn ByteSource, config_dir: &str) -> TemplateCollection {
    load_modality_keyed(source, config_dir, "auto_vendor_templates.yaml")
}

/// Load the limit/plot template declarations.
pub fn load_limit_plot_templates(source: &dyn ByteSource, config_dir: &str) -> LimitPlotCollection {
    load_modality_keyed(source, config_dir, "limits_and_plot_templates.yaml")
}

#[derive(Debug, Deserialize)]
struct ParamSetDoc {
    label: String,
    #[serde(default)]
    output: ParamSetOutput,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ParamSetOutput {
    decimal_mark: String,
}

/// Load parameter-set labels and decimal marks.
///
/// Each modality has its own `paramsets_<MOD>.yaml`, a multi-document YAML
/// stream with one parameter set per document. Only the label and the output
/// decimal mark are kept. Missing or malformed files warn and skip, leaving
/// that modality without parameter sets.
pub fn load_paramset_marks(source: &dyn ByteSource, config_dir: &str) -> ParamSetCollection {
    let mut collection = ParamSetCollection::default();
    for modality in MODALITIES {
        let path = config_file(config_dir, &format!("paramsets_{modality}.yaml"));
        let bytes = match source.read(&path) {
            Ok(bytes) => bytes,
            Err(IngestError::NotFound { .. }) => continue,
            Err(error) => {
                tracing::warn!(%path, %error, "failed to read parameter-set file");
                continue;
            }
        };
        let mut marks = Vec::new();
        let mut failed = false;
        for document in serde_yaml::Deserializer::from_slice(&bytes) {
            match ParamSetDoc::deserialize(document) {
                Ok(doc) => {
                    let decimal_mark = doc.output.decimal_mark.chars().next().unwrap_or('.');
                    marks.push(ParamSetMark {
                        label: doc.label,
                        decimal_mark,
                    });
                }
                Err(error) => {
                    tracing::warn!(%path, %error, "failed to parse parameter-set document");
                    failed = true;
                    break;
                }
            }
        }
        if !failed && !marks.is_empty() {
            collection.modalities.push((modality.to_string(), marks));
        }
    }
    collection
}

/// Load dashboard settings, falling back to defaults when the file is
/// missing or malformed. Missing keys default field-by-field; unknown keys
/// are ignored.
pub fn load_dash_settings(source: &dyn ByteSource, config_dir: &str) -> DashSettings {
    let path = config_file(config_dir, "dash_settings.yaml");
    let bytes = match source.read(&path) {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(%path, %error, "dashboard settings unavailable, using defaults");
            return DashSettings::default();
        }
    };
    match serde_yaml::from_slice(&bytes) {
        Ok(settings) => settings,
        Err(error) => {
            tracing::warn!(%path, %error, "failed to parse dashboard settings, using defaults");
            DashSettings::default()
        }
    }
}
