// dashtui Library - Public API

// Re-export error types
pub mod error;
pub use error::{DashError, Result};

// Module declarations
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::DashboardConfig;
pub use crate::core::telemetry::{
    Dashboard, DashboardBuilder, PlotBackend, PlotMarker, PlotWidget, SampleSender,
};

/// Initialize logging into the dashboard's stderr pane.
///
/// `RUST_LOG` is honoured; the default level is `info`. Does nothing if a
/// logger is already installed.
pub fn init_logging(dashboard: &Dashboard) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(dashboard.log_writer()))
        .try_init();
}
