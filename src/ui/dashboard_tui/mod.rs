//! Terminal User Interface for the telemetry dashboard.
//!
//! Draws captured stdout/stderr panes and one chart per metric using
//! ratatui, on a thread of its own.

mod app;
mod backend;
mod capture;
mod event_handler;
mod pane;
mod render;
mod widgets;

pub use app::{spawn_ui, ChartView, DashboardApp, TerminalSession, UiCommand};
pub use backend::{TerminalBackend, TerminalPlot};
pub use capture::{capture_stdio, StdioCapture};
pub use event_handler::DashboardEvent;
pub use pane::{OutputPane, PaneKind, PaneWriter};
