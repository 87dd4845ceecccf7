//! Dashboard display settings.

use serde::Deserialize;

/// Display settings for the overview, merged over defaults.
///
/// Every field has a default so a partial (or missing) settings file still
/// yields a usable configuration; unknown keys in the file are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashSettings {
    pub label: String,
    /// Heading shown above the overview.
    pub header: String,
    /// Overview column headers: modality, template, last results, elapsed
    /// days, status.
    pub table_headers: Vec<String>,
    /// Templates whose `days_since` reaches this limit are flagged stale.
    pub days_since_limit: i64,
    /// Plot height in pixels, passed through to the renderer.
    pub plot_height: u32,
    /// Line color cycle for grouped channels.
    pub colors: Vec<String>,
}

impl Default for DashSettings {
    fn default() -> Self {
        Self {
            label: String::new(),
            header: "Constancy controls".to_string(),
            table_headers: [
                "Modality",
                "Template",
                "Last results",
                "Elapsed days",
                "Status",
            ]
            .map(str::to_string)
            .to_vec(),
            days_since_limit: 30,
            plot_height: 200,
            colors: [
                "#000000", "#5165d5", "#a914a6", "#7f9955", "#efb412", "#97d2d1", "#b3303b",
            ]
            .map(str::to_string)
            .to_vec(),
        }
    }
}
