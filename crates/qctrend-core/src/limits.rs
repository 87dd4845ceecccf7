//! Limit evaluation: turning a result table plus its limit/plot template
//! into rendering-ready plot bundles.
//!
//! One bundle per visible group: the channel series, the resolved threshold
//! lines (fixed or computed from the data), the samples outside the
//! thresholds, and the y-axis range policy. Hidden groups contribute no
//! bundle; callers align titles via [`visible_titles`], which filters by the
//! same hide flags.

use chrono::NaiveDateTime;
use serde::Serialize;

use qctrend_model::{GroupLimits, GroupRange, LimitPlotTemplate, ResultTable};

/// One channel's `(timestamp, value)` points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSeries {
    pub channel: String,
    pub points: Vec<(NaiveDateTime, f64)>,
}

/// Which bound a threshold line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitAnchor {
    Lower,
    Upper,
}

/// A horizontal acceptance-limit line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdLine {
    pub value: f64,
    pub label: String,
    pub anchor: LimitAnchor,
}

/// Y-axis range policy for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutorangeMode {
    /// No explicit bounds; the renderer ranges freely.
    Full,
    /// Both bounds explicit; autorange disabled.
    Disabled,
    /// Lower bound explicit; the upper end autoranges.
    AnchoredMin,
    /// Upper bound explicit; the lower end autoranges.
    AnchoredMax,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub autorange: AutorangeMode,
}

impl AxisRange {
    fn from_group_range(range: GroupRange) -> Self {
        let (lower, upper) = (range.lower(), range.upper());
        let autorange = match (lower, upper) {
            (None, None) => AutorangeMode::Full,
            (Some(_), Some(_)) => AutorangeMode::Disabled,
            (Some(_), None) => AutorangeMode::AnchoredMin,
            (None, Some(_)) => AutorangeMode::AnchoredMax,
        };
        Self {
            lower,
            upper,
            autorange,
        }
    }
}

/// Rendering-ready data for one visible plot group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotBundle {
    pub series: Vec<ChannelSeries>,
    pub threshold_lines: Vec<ThresholdLine>,
    /// Samples outside the thresholds, duplicated from `series` so the
    /// renderer can highlight them distinctly.
    pub out_of_limit: Vec<ChannelSeries>,
    pub axis_range: AxisRange,
}

/// Group titles filtered by the hide flags, aligned 1:1 with the bundles
/// returned by [`evaluate`].
///
/// When the template carries no titles, each group's channels joined with
/// `", "` stand in.
pub fn visible_titles(template: &LimitPlotTemplate) -> Vec<String> {
    (0..template.groups.len())
        .filter(|&index| template.is_visible(index))
        .map(|index| match &template.groups_title {
            Some(titles) => titles.get(index).cloned().unwrap_or_default(),
            None => template.groups[index].join(", "),
        })
        .collect()
}

/// Evaluate all visible groups of a template against its result table.
///
/// Thresholds are only resolved when the group has limits configured;
/// data-dependent thresholds (relative-first, relative-median) anchor on the
/// group's first channel. Samples strictly outside a bound are flagged.
pub fn evaluate(table: &ResultTable, template: &LimitPlotTemplate) -> Vec<PlotBundle> {
    (0..template.groups.len())
        .filter(|&index| template.is_visible(index))
        .map(|index| evaluate_group(table, template, index))
        .collect()
}

fn evaluate_group(table: &ResultTable, template: &LimitPlotTemplate, index: usize) -> PlotBundle {
    let group = &template.groups[index];
    let mut series = Vec::with_capacity(group.len());
    for channel in group {
        if table.channel_index(channel).is_none() {
            tracing::debug!(channel, "channel not present in result table");
            continue;
        }
        series.push(ChannelSeries {
            channel: channel.clone(),
            points: table.channel_points(channel),
        });
    }

    let threshold_lines = resolve_thresholds(table, group, &template.limits(index));
    let mut out_of_limit = Vec::new();
    for line in &threshold_lines {
        for channel_series in &series {
            let points: Vec<(NaiveDateTime, f64)> = channel_series
                .points
                .iter()
                .copied()
                .filter(|&(_, value)| match line.anchor {
                    LimitAnchor::Lower => value < line.value,
                    LimitAnchor::Upper => value > line.value,
                })
                .collect();
            if !points.is_empty() {
                out_of_limit.push(ChannelSeries {
                    channel: channel_series.channel.clone(),
                    points,
                });
            }
        }
    }

    PlotBundle {
        series,
        threshold_lines,
        out_of_limit,
        axis_range: AxisRange::from_group_range(template.range(index)),
    }
}

fn resolve_thresholds(
    table: &ResultTable,
    group: &[String],
    limits: &GroupLimits,
) -> Vec<ThresholdLine> {
    let bounds = match limits {
        GroupLimits::None | GroupLimits::TextOnly => return Vec::new(),
        GroupLimits::Fixed { lower, upper } => {
            let mut lines = Vec::new();
            if let Some(lower) = lower {
                lines.push(ThresholdLine {
                    value: *lower,
                    label: format!("min {lower}"),
                    anchor: LimitAnchor::Lower,
                });
            }
            if let Some(upper) = upper {
                lines.push(ThresholdLine {
                    value: *upper,
                    label: format!("max {upper}"),
                    anchor: LimitAnchor::Upper,
                });
            }
            return lines;
        }
        GroupLimits::RelativeFirst { percent } => {
            relative_bounds(table, group, *percent, Reference::FirstSample)
                .map(|(lower, upper)| (lower, upper, format!("first +/- {percent}%")))
        }
        GroupLimits::RelativeMedian { percent } => {
            relative_bounds(table, group, *percent, Reference::MedianButLast)
                .map(|(lower, upper)| (lower, upper, format!("median +/- {percent}%")))
        }
    };
    match bounds {
        Some((lower, upper, label)) => vec![
            ThresholdLine {
                value: lower,
                label,
                anchor: LimitAnchor::Lower,
            },
            ThresholdLine {
                value: upper,
                label: String::new(),
                anchor: LimitAnchor::Upper,
            },
        ],
        None => Vec::new(),
    }
}

enum Reference {
    /// The reference channel's first sample value.
    FirstSample,
    /// Median of the reference channel's values excluding the last sample.
    MedianButLast,
}

/// Compute `reference +/- percent%` bounds.
///
/// The reference channel is the group's first channel that exists in the
/// table and has at least one value. Returns `None` when no such channel
/// exists or the reference cannot be computed.
fn relative_bounds(
    table: &ResultTable,
    group: &[String],
    percent: f64,
    reference: Reference,
) -> Option<(f64, f64)> {
    let values = group
        .iter()
        .map(|channel| table.channel_values(channel))
        .find(|values| !values.is_empty())?;
    let reference = match reference {
        Reference::FirstSample => values[0],
        Reference::MedianButLast => median(&values[..values.len() - 1])?,
    };
    let tolerance = reference * 0.01 * percent;
    Some((reference - tolerance, reference + tolerance))
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
