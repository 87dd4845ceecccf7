//! Limit/plot templates: channel grouping and acceptance limits.
//!
//! The configuration files describe each group's limits as a two-element
//! list whose entries are numbers, nulls, or literal tags
//! (`relative_first`, `relative_median`, `text`). [`GroupLimits`] models
//! that as a tagged union so downstream code never has to re-inspect
//! positional heterogeneous pairs.

use serde::{Deserialize, Deserializer, de};

/// Acceptance limits for one plot group.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GroupLimits {
    /// No limits configured (absent entry or `[null, null]`).
    #[default]
    None,
    /// Fixed lower/upper bounds, either bound optional.
    Fixed {
        lower: Option<f64>,
        upper: Option<f64>,
    },
    /// Bounds at +/- `percent` of the first sample value.
    RelativeFirst { percent: f64 },
    /// Bounds at +/- `percent` of the median of all but the last sample.
    RelativeMedian { percent: f64 },
    /// Limits documented out-of-band; nothing drawn, nothing flagged.
    TextOnly,
}

impl<'de> Deserialize<'de> for GroupLimits {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Entry {
            Number(f64),
            Tag(String),
        }

        let entries: Vec<Option<Entry>> = Vec::deserialize(deserializer)?;
        let mut entries = entries.into_iter();
        let first = entries.next().flatten();
        let second = entries.next().flatten();

        let percent_of = |entry: Option<Entry>, tag: &str| match entry {
            Some(Entry::Number(percent)) => Ok(percent),
            _ => Err(de::Error::custom(format!(
                "limit tag '{tag}' requires a numeric percentage as its second entry"
            ))),
        };

        match (first, second) {
            (None, None) => Ok(Self::None),
            (None, Some(Entry::Number(upper))) => Ok(Self::Fixed {
                lower: None,
                upper: Some(upper),
            }),
            (Some(Entry::Number(lower)), second) => {
                let upper = match second {
                    None => None,
                    Some(Entry::Number(upper)) => Some(upper),
                    Some(Entry::Tag(tag)) => {
                        return Err(de::Error::custom(format!(
                            "unexpected tag '{tag}' as upper limit"
                        )));
                    }
                };
                Ok(Self::Fixed {
                    lower: Some(lower),
                    upper,
                })
            }
            (Some(Entry::Tag(tag)), second) => match tag.as_str() {
                "text" => Ok(Self::TextOnly),
                "relative_first" => Ok(Self::RelativeFirst {
                    percent: percent_of(second, "relative_first")?,
                }),
                "relative_median" => Ok(Self::RelativeMedian {
                    percent: percent_of(second, "relative_median")?,
                }),
                other => Err(de::Error::custom(format!("unknown limit tag '{other}'"))),
            },
            (None, Some(Entry::Tag(tag))) => Err(de::Error::custom(format!(
                "unexpected tag '{tag}' as upper limit"
            ))),
        }
    }
}

/// Explicit y-axis bounds for one plot group, either bound optional.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct GroupRange(pub Option<f64>, pub Option<f64>);

impl GroupRange {
    pub fn lower(&self) -> Option<f64> {
        self.0
    }

    pub fn upper(&self) -> Option<f64> {
        self.1
    }
}

/// Grouping and limit configuration for one template's display.
///
/// `groups` is the only mandatory field; the per-group metadata lists, when
/// present, run parallel to it. A group with no `groups_hide` entry is
/// visible.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct LimitPlotTemplate {
    pub label: String,
    /// Ordered channel-name lists; each group renders as one plot.
    pub groups: Vec<Vec<String>>,
    pub groups_title: Option<Vec<String>>,
    pub groups_hide: Option<Vec<bool>>,
    pub groups_limits: Option<Vec<GroupLimits>>,
    pub groups_ranges: Option<Vec<GroupRange>>,
}

impl LimitPlotTemplate {
    /// Synthesize the default template for a table with the given channels:
    /// one single-channel group per channel, titled by channel name, no
    /// limits, no hidden groups.
    pub fn default_for_channels(channels: &[String]) -> Self {
        Self {
            groups: channels
                .iter()
                .map(|channel| vec![channel.clone()])
                .collect(),
            groups_title: Some(channels.to_vec()),
            ..Self::default()
        }
    }

    /// Whether group `index` is visible (missing hide entry means visible).
    pub fn is_visible(&self, index: usize) -> bool {
        !self
            .groups_hide
            .as_ref()
            .and_then(|hide| hide.get(index).copied())
            .unwrap_or(false)
    }

    /// Limits for group `index`, if configured.
    pub fn limits(&self, index: usize) -> GroupLimits {
        self.groups_limits
            .as_ref()
            .and_then(|limits| limits.get(index).cloned())
            .unwrap_or_default()
    }

    /// Explicit axis bounds for group `index`, if configured.
    pub fn range(&self, index: usize) -> GroupRange {
        self.groups_ranges
            .as_ref()
            .and_then(|ranges| ranges.get(index).copied())
            .unwrap_or_default()
    }
}
