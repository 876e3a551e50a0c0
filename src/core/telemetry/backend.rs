//! Rendering collaborator seams used by the dashboard loop.
//!
//! The loop only needs a handful of capabilities from whatever draws the
//! charts; the terminal UI implements them, and tests use a recorder.

/// Marker style for plotted points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotMarker {
    #[default]
    Braille,
    Dot,
    Block,
}

/// A single chart owned by the dashboard loop.
pub trait PlotWidget: Send {
    fn set_title(&mut self, title: &str);

    fn set_border(&mut self, enabled: bool);

    fn set_marker(&mut self, marker: PlotMarker);

    /// Replace the plotted data. Each inner vector is one row (one line on
    /// the chart).
    fn set_data(&mut self, data: Vec<Vec<f64>>);

    /// Number of columns available for points. Zero means the chart has not
    /// been laid out yet.
    fn plot_width(&self) -> usize;
}

/// Factory and redraw trigger for [`PlotWidget`]s.
pub trait PlotBackend: Send + 'static {
    type Widget: PlotWidget + 'static;

    /// Create a chart and add it to the display.
    fn new_plot(&mut self) -> Self::Widget;

    fn request_redraw(&mut self);

    /// Called once when the dashboard shuts down.
    fn release(&mut self) {}
}
