use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dashtui::{PlotBackend, PlotMarker, PlotWidget};

#[derive(Debug, Clone, Default)]
pub struct PlotState {
    pub title: String,
    pub border: bool,
    pub marker: Option<PlotMarker>,
    pub data: Vec<Vec<f64>>,
    pub updates: usize,
}

#[derive(Debug, Default)]
pub struct Recorded {
    pub plots: Vec<PlotState>,
    pub redraws: usize,
    pub released: bool,
}

/// Plot backend that records every call for inspection
pub struct RecordingBackend {
    state: Arc<Mutex<Recorded>>,
    width: usize,
}

pub struct RecordingPlot {
    id: usize,
    state: Arc<Mutex<Recorded>>,
    width: usize,
}

impl RecordingBackend {
    pub fn new(width: usize) -> (Self, Arc<Mutex<Recorded>>) {
        let state = Arc::new(Mutex::new(Recorded::default()));
        (
            Self {
                state: Arc::clone(&state),
                width,
            },
            state,
        )
    }
}

impl RecordingPlot {
    fn with_plot(&self, f: impl FnOnce(&mut PlotState)) {
        let mut state = self.state.lock().unwrap();
        f(&mut state.plots[self.id]);
    }
}

impl PlotWidget for RecordingPlot {
    fn set_title(&mut self, title: &str) {
        self.with_plot(|p| p.title = title.to_string());
    }

    fn set_border(&mut self, enabled: bool) {
        self.with_plot(|p| p.border = enabled);
    }

    fn set_marker(&mut self, marker: PlotMarker) {
        self.with_plot(|p| p.marker = Some(marker));
    }

    fn set_data(&mut self, data: Vec<Vec<f64>>) {
        self.with_plot(|p| {
            p.data = data;
            p.updates += 1;
        });
    }

    fn plot_width(&self) -> usize {
        self.width
    }
}

impl PlotBackend for RecordingBackend {
    type Widget = RecordingPlot;

    fn new_plot(&mut self) -> RecordingPlot {
        let mut state = self.state.lock().unwrap();
        state.plots.push(PlotState::default());
        RecordingPlot {
            id: state.plots.len() - 1,
            state: Arc::clone(&self.state),
            width: self.width,
        }
    }

    fn request_redraw(&mut self) {
        self.state.lock().unwrap().redraws += 1;
    }

    fn release(&mut self) {
        self.state.lock().unwrap().released = true;
    }
}

/// Poll `check` until it holds or `timeout` passes
pub fn wait_for(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    check()
}
