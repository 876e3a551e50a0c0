// Core logic module

pub mod config;
pub mod telemetry;

// Re-export commonly used items
pub use config::DashboardConfig;
pub use telemetry::{Dashboard, DashboardBuilder, SampleSender};
