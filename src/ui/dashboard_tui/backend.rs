//! Terminal implementation of the plot backend.
//!
//! Charts live on the UI thread; the handles given to the dashboard loop
//! forward every change as a [`UiCommand`] and read back the width the
//! last draw gave them.

use std::sync::mpsc::Sender;

use tokio::sync::watch;

use crate::core::telemetry::{PlotBackend, PlotMarker, PlotWidget};

use super::app::UiCommand;

/// Handle to one chart on the terminal dashboard
pub struct TerminalPlot {
    id: usize,
    ui: Sender<UiCommand>,
    widths: watch::Receiver<Vec<usize>>,
}

impl TerminalPlot {
    fn send(&self, command: UiCommand) {
        // The UI thread only goes away during shutdown
        let _ = self.ui.send(command);
    }
}

impl PlotWidget for TerminalPlot {
    fn set_title(&mut self, title: &str) {
        self.send(UiCommand::SetTitle {
            id: self.id,
            title: title.to_string(),
        });
    }

    fn set_border(&mut self, enabled: bool) {
        self.send(UiCommand::SetBorder {
            id: self.id,
            enabled,
        });
    }

    fn set_marker(&mut self, marker: PlotMarker) {
        self.send(UiCommand::SetMarker {
            id: self.id,
            marker,
        });
    }

    fn set_data(&mut self, data: Vec<Vec<f64>>) {
        self.send(UiCommand::SetData { id: self.id, data });
    }

    fn plot_width(&self) -> usize {
        self.widths.borrow().get(self.id).copied().unwrap_or(0)
    }
}

/// Plot backend drawing into the terminal UI thread
pub struct TerminalBackend {
    ui: Sender<UiCommand>,
    widths: watch::Receiver<Vec<usize>>,
    next_id: usize,
}

impl TerminalBackend {
    pub fn new(ui: Sender<UiCommand>, widths: watch::Receiver<Vec<usize>>) -> Self {
        Self {
            ui,
            widths,
            next_id: 0,
        }
    }
}

impl PlotBackend for TerminalBackend {
    type Widget = TerminalPlot;

    fn new_plot(&mut self) -> TerminalPlot {
        let id = self.next_id;
        self.next_id += 1;

        let _ = self.ui.send(UiCommand::AddChart { id });
        TerminalPlot {
            id,
            ui: self.ui.clone(),
            widths: self.widths.clone(),
        }
    }

    fn request_redraw(&mut self) {
        let _ = self.ui.send(UiCommand::Redraw);
    }

    fn release(&mut self) {
        let _ = self.ui.send(UiCommand::Close);
    }
}
