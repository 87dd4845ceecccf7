//! QC trend aggregation core.
//!
//! One aggregation pass joins the automation tool's configuration
//! collections with its result files and produces an immutable
//! [`qctrend_model::ModalityCollection`] snapshot. The limit evaluation
//! engine then turns a selected template's table and limit/plot template
//! into rendering-ready plot bundles on demand.

mod aggregate;
mod freshness;
mod limits;
mod resolve;

pub use aggregate::{AggregationConfig, aggregate};
pub use freshness::{Freshness, freshness};
pub use limits::{
    AutorangeMode, AxisRange, ChannelSeries, LimitAnchor, PlotBundle, ThresholdLine, evaluate,
    visible_titles,
};
pub use resolve::{ModalityJoin, TemplateKind, is_eligible};
