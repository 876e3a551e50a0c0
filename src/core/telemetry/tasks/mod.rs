//! Built-in producers that feed the dashboard like any external caller.

mod self_metrics;

pub use self_metrics::{self_metrics_task, MEMORY_METRIC, TASKS_METRIC};
