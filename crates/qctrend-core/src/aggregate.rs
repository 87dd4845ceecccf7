//! The result aggregator: one best-effort pass over every configured
//! template.
//!
//! The pass is synchronous and batch-oriented: it reads every eligible
//! result file sequentially and returns a complete snapshot. Nothing from a
//! previous pass is reused; the caller decides when to run a new one.
//! Failures never abort the pass: an ineligible, unreadable, or unparseable
//! template simply contributes nothing.

use chrono::NaiveDate;

use qctrend_ingest::{
    AutoTemplateConfig, ByteSource, LimitPlotCollection, ParamSetCollection, TemplateCollection,
    parse_result_table,
};
use qctrend_model::{ModalityCollection, Template, TemplateStatus};

use crate::freshness::freshness;
use crate::resolve::{ModalityJoin, TemplateKind, is_eligible};

/// Configuration collections consumed by one aggregation pass.
#[derive(Debug, Default)]
pub struct AggregationConfig {
    pub auto_templates: TemplateCollection,
    pub auto_vendor_templates: TemplateCollection,
    pub paramsets: ParamSetCollection,
    pub limit_plots: LimitPlotCollection,
}

/// Run one aggregation pass.
///
/// Primary templates are processed before vendor templates; within each
/// collection, modalities and templates keep declaration order. Modalities
/// that end up with no templates are pruned from the snapshot.
///
/// `today` anchors the elapsed-days computation so callers (and tests)
/// control the clock.
pub fn aggregate(
    config: &AggregationConfig,
    source: &dyn ByteSource,
    today: NaiveDate,
) -> ModalityCollection {
    let mut collection = ModalityCollection::new();
    let mut processed = 0usize;
    let kinds = [
        (TemplateKind::Primary, &config.auto_templates),
        (TemplateKind::Vendor, &config.auto_vendor_templates),
    ];
    for (kind, templates) in kinds {
        for (modality, declarations) in &templates.modalities {
            collection.entry_mut(modality);
            let join = ModalityJoin::new(
                config.paramsets.get(modality),
                config.limit_plots.get(modality),
            );
            for declaration in declarations {
                if let Some(template) =
                    aggregate_template(kind, modality, declaration, &join, source, today)
                {
                    collection.entry_mut(modality).push(template);
                    processed += 1;
                }
            }
        }
    }
    collection.retain_non_empty();
    tracing::info!(
        processed,
        modalities = collection.len(),
        "aggregation pass complete"
    );
    collection
}

fn aggregate_template(
    kind: TemplateKind,
    modality: &str,
    declaration: &AutoTemplateConfig,
    join: &ModalityJoin<'_>,
    source: &dyn ByteSource,
    today: NaiveDate,
) -> Option<Template> {
    if !is_eligible(kind, declaration) {
        tracing::debug!(modality, label = %declaration.label, "template not eligible");
        return None;
    }
    let Some(decimal_mark) = join.decimal_mark(kind, &declaration.paramset_label) else {
        tracing::debug!(
            modality,
            label = %declaration.label,
            paramset = %declaration.paramset_label,
            "no matching parameter set"
        );
        return None;
    };
    let bytes = match source.read(&declaration.path_output) {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::debug!(
                modality,
                label = %declaration.label,
                path = %declaration.path_output,
                %error,
                "result file unreadable"
            );
            return None;
        }
    };
    let table = parse_result_table(&bytes, decimal_mark)?;
    tracing::debug!(modality, label = %declaration.label, rows = table.len(), "results read");
    let limits_and_plot = join.resolve_limit_plot(&declaration.limits_and_plot_label, &table);
    let fresh = freshness(&table, today);
    Some(Template {
        label: declaration.label.clone(),
        data: Some(table),
        limits_and_plot,
        newest_date: fresh.newest_date,
        days_since: fresh.days_since,
        status: TemplateStatus::default(),
    })
}
