//! Configuration joins: matching a template's declared labels against the
//! modality's loaded collections.
//!
//! The label maps are built once per modality at the start of a pass, giving
//! O(1) lookups and an explicit not-found branch. Label mismatches are never
//! fatal: a missing parameter set skips the template, a missing limit/plot
//! label falls back to the synthesized default.

use std::collections::HashMap;

use qctrend_ingest::{AutoTemplateConfig, ParamSetMark};
use qctrend_model::{LimitPlotTemplate, ResultTable};

/// Whether a template declaration came from the primary or the
/// vendor-supplied collection.
///
/// The two kinds differ only in decimal-mark resolution: primary templates
/// require a parameter-set lookup, vendor templates use the modality's
/// canonical default mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Primary,
    Vendor,
}

/// Eligibility gate for one template declaration.
///
/// Requires a non-empty label, a non-empty output path, the active flag, and
/// not import-only. Primary templates additionally need non-empty
/// parameter-set and test-parameter grouping references.
pub fn is_eligible(kind: TemplateKind, config: &AutoTemplateConfig) -> bool {
    if config.label.is_empty() || config.path_output.is_empty() || !config.active {
        return false;
    }
    if config.import_only {
        return false;
    }
    if kind == TemplateKind::Primary
        && (config.paramset_label.is_empty() || config.quicktemp_label.is_empty())
    {
        return false;
    }
    true
}

/// Per-modality label lookups, built once per aggregation pass.
#[derive(Debug, Default)]
pub struct ModalityJoin<'a> {
    decimal_marks: HashMap<&'a str, char>,
    /// First declared parameter set's mark, used by vendor templates.
    default_mark: Option<char>,
    limit_plots: HashMap<&'a str, &'a LimitPlotTemplate>,
}

impl<'a> ModalityJoin<'a> {
    pub fn new(
        paramsets: Option<&'a [ParamSetMark]>,
        limit_plots: Option<&'a [LimitPlotTemplate]>,
    ) -> Self {
        let paramsets = paramsets.unwrap_or_default();
        let mut decimal_marks = HashMap::with_capacity(paramsets.len());
        for paramset in paramsets {
            // First declaration wins on duplicate labels.
            decimal_marks
                .entry(paramset.label.as_str())
                .or_insert(paramset.decimal_mark);
        }
        let default_mark = paramsets.first().map(|paramset| paramset.decimal_mark);
        let limit_plots = limit_plots
            .unwrap_or_default()
            .iter()
            .map(|template| (template.label.as_str(), template))
            .collect();
        Self {
            decimal_marks,
            default_mark,
            limit_plots,
        }
    }

    /// Decimal mark for a template, or `None` when the modality has no
    /// matching parameter set (a non-fatal skip).
    pub fn decimal_mark(&self, kind: TemplateKind, paramset_label: &str) -> Option<char> {
        match kind {
            TemplateKind::Primary => self.decimal_marks.get(paramset_label).copied(),
            TemplateKind::Vendor => self.default_mark,
        }
    }

    /// Resolve the limit/plot template for a parsed table.
    ///
    /// An empty or unmatched label synthesizes the default template from the
    /// table's own channels, which is why this resolution runs after parsing
    /// while decimal-mark resolution runs before.
    pub fn resolve_limit_plot(&self, label: &str, table: &ResultTable) -> LimitPlotTemplate {
        if !label.is_empty() {
            if let Some(template) = self.limit_plots.get(label) {
                return (*template).clone();
            }
            tracing::debug!(label, "limit/plot label not found, synthesizing default");
        }
        LimitPlotTemplate::default_for_channels(&table.channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(label: &str) -> AutoTemplateConfig {
        AutoTemplateConfig {
            label: label.to_string(),
            path_output: "results/out.txt".to_string(),
            active: true,
            import_only: false,
            paramset_label: "default".to_string(),
            quicktemp_label: "daily".to_string(),
            limits_and_plot_label: String::new(),
        }
    }

    #[test]
    fn eligibility_gates() {
        let base = config("t1");
        assert!(is_eligible(TemplateKind::Primary, &base));

        let mut inactive = base.clone();
        inactive.active = false;
        assert!(!is_eligible(TemplateKind::Primary, &inactive));

        let mut import_only = base.clone();
        import_only.import_only = true;
        assert!(!is_eligible(TemplateKind::Primary, &import_only));

        let mut no_paramset = base.clone();
        no_paramset.paramset_label.clear();
        assert!(!is_eligible(TemplateKind::Primary, &no_paramset));
        // Vendor templates have no parameter-set requirement.
        assert!(is_eligible(TemplateKind::Vendor, &no_paramset));

        let mut no_path = base.clone();
        no_path.path_output.clear();
        assert!(!is_eligible(TemplateKind::Vendor, &no_path));
    }

    #[test]
    fn decimal_mark_lookup() {
        let paramsets = vec![
            ParamSetMark {
                label: "default".to_string(),
                decimal_mark: ',',
            },
            ParamSetMark {
                label: "strict".to_string(),
                decimal_mark: '.',
            },
        ];
        let join = ModalityJoin::new(Some(&paramsets), None);
        assert_eq!(join.decimal_mark(TemplateKind::Primary, "strict"), Some('.'));
        assert_eq!(join.decimal_mark(TemplateKind::Primary, "missing"), None);
        // Vendor templates use the first declared mark regardless of label.
        assert_eq!(join.decimal_mark(TemplateKind::Vendor, ""), Some(','));

        let empty = ModalityJoin::new(None, None);
        assert_eq!(empty.decimal_mark(TemplateKind::Vendor, ""), None);
    }

    #[test]
    fn limit_plot_fallback_synthesizes_default() {
        let named = LimitPlotTemplate {
            label: "ctp404".to_string(),
            groups: vec![vec!["noise".to_string()]],
            ..LimitPlotTemplate::default()
        };
        let limit_plots = vec![named.clone()];
        let join = ModalityJoin::new(None, Some(&limit_plots));
        let table = ResultTable {
            date_header: "Date".to_string(),
            channels: vec!["noise".to_string(), "snr".to_string()],
            rows: Vec::new(),
        };

        assert_eq!(join.resolve_limit_plot("ctp404", &table), named);

        let synthesized = join.resolve_limit_plot("", &table);
        assert_eq!(synthesized.groups.len(), 2);
        let unmatched = join.resolve_limit_plot("nope", &table);
        assert_eq!(unmatched, synthesized);
    }
}
