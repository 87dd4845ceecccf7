//! QC result ingestion.
//!
//! This crate turns raw bytes into the model types: tab-delimited result
//! files become [`qctrend_model::ResultTable`]s and the automation tool's
//! YAML configuration files become template, parameter-set, and limit/plot
//! collections. All reads go through the [`ByteSource`] seam so local
//! filesystem and object-storage deployments share the same code path.

mod config;
mod error;
mod result_table;
mod source;

pub use config::{
    AutoTemplateConfig, LimitPlotCollection, MODALITIES, ModalityKeyed, ParamSetCollection,
    ParamSetMark, TemplateCollection, load_auto_templates, load_auto_vendor_templates,
    load_dash_settings, load_limit_plot_templates, load_paramset_marks,
};
pub use error::{IngestError, Result};
pub use result_table::parse_result_table;
pub use source::{ByteSource, LocalSource, MemorySource};
