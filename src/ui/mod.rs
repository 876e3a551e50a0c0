// UI module

pub mod dashboard_tui;
