//! Telemetry core: ingestion, bounded history and resampling.
//!
//! Producers hand samples to a single loop that owns every series; on each
//! tick the loop resamples the trailing window of each series to the width
//! of its chart.

mod backend;
mod dashboard;
mod queue;
mod resample;
mod runtime;
mod series;
mod store;
pub mod tasks;

pub use backend::{PlotBackend, PlotMarker, PlotWidget};
pub use dashboard::{Dashboard, DashboardBuilder};
pub use queue::{QueuedSample, SampleSender};
pub use resample::resample;
pub use runtime::{DashboardLoop, DashboardRuntime};
pub use series::{Sample, Series};
pub use store::{RecordOutcome, SeriesStore};
