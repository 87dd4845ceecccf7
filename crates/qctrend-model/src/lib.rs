//! Data model for QC trend aggregation.
//!
//! This crate defines the in-memory structures shared by the ingest and
//! aggregation layers:
//!
//! - **Result tables**: dated numeric tables parsed from automation output
//!   files ([`ResultTable`], [`ResultRow`], [`TimestampCell`])
//! - **Limit/plot templates**: which channels render together and which
//!   acceptance limits apply ([`LimitPlotTemplate`], [`GroupLimits`],
//!   [`GroupRange`])
//! - **Templates**: one monitored measurement stream per modality
//!   ([`Template`], [`NewestDate`], [`TemplateStatus`])
//! - **Modality collections**: the per-pass aggregation snapshot
//!   ([`ModalityCollection`])
//! - **Dashboard settings**: display configuration merged over defaults
//!   ([`DashSettings`])

mod limits;
mod modality;
mod settings;
mod table;
mod template;

pub use limits::{GroupLimits, GroupRange, LimitPlotTemplate};
pub use modality::ModalityCollection;
pub use settings::DashSettings;
pub use table::{ResultRow, ResultTable, TimestampCell};
pub use template::{DAYS_SINCE_UNKNOWN, NewestDate, Template, TemplateStatus};
