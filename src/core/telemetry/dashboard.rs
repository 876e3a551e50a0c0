//! Public entry point: builder and dashboard handle.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self as std_mpsc, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::watch;

use crate::core::config::DashboardConfig;
use crate::error::{DashError, Result};
use crate::ui::dashboard_tui::{
    capture_stdio, spawn_ui, PaneKind, PaneWriter, StdioCapture, TerminalBackend, TerminalSession,
    UiCommand,
};

use super::backend::PlotBackend;
use super::queue::SampleSender;
use super::runtime::DashboardRuntime;

/// Fluent builder for a [`Dashboard`].
///
/// ```no_run
/// use dashtui::DashboardBuilder;
///
/// let dashboard = DashboardBuilder::new().build()?;
/// dashboard.set("requests", 12.0);
/// # Ok::<(), dashtui::DashError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DashboardBuilder {
    disabled: bool,
    config: DashboardConfig,
    capture_stdio: bool,
    log_file: Option<PathBuf>,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl DashboardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an inert dashboard: `set` and `close` do nothing.
    pub fn disable(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn with_config(mut self, config: DashboardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.config.max_len = max_len;
        self
    }

    pub fn sample_period(mut self, period: Duration) -> Self {
        self.config.sample_period_us = u64::try_from(period.as_micros()).unwrap_or(u64::MAX);
        self
    }

    pub fn window(mut self, window: Duration) -> Self {
        self.config.window_ms = millis(window);
        self
    }

    pub fn tick_interval(mut self, tick: Duration) -> Self {
        self.config.tick_ms = millis(tick);
        self
    }

    pub fn self_metrics(mut self, enabled: bool) -> Self {
        self.config.self_metrics = enabled;
        self
    }

    pub fn self_metrics_interval(mut self, interval: Duration) -> Self {
        self.config.self_metrics_interval_ms = millis(interval);
        self
    }

    pub fn scrollback_lines(mut self, lines: usize) -> Self {
        self.config.scrollback_lines = lines;
        self
    }

    /// Redirect the process's stdout and stderr into the dashboard panes.
    pub fn capture_stdio(mut self, enabled: bool) -> Self {
        self.capture_stdio = enabled;
        self
    }

    /// Append every captured byte to `path` as well.
    pub fn log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.log_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Start the dashboard on the controlling terminal.
    ///
    /// Fails if the terminal, the log file or the stdio pipes cannot be
    /// opened; nothing is left running in that case.
    pub fn build(self) -> Result<Dashboard> {
        if self.disabled {
            log::debug!("Dashboard disabled");
            return Ok(Dashboard::disabled());
        }
        self.config.validate()?;

        let mirror = match &self.log_file {
            Some(path) => Some(Arc::new(Mutex::new(open_log_file(path)?))),
            None => None,
        };

        let session = TerminalSession::open()?;

        let (ui_tx, ui_rx) = std_mpsc::channel();
        let (widths_tx, widths_rx) = watch::channel(Vec::new());
        let stdout_writer = PaneWriter::new(PaneKind::Stdout, ui_tx.clone(), mirror.clone());
        let stderr_writer = PaneWriter::new(PaneKind::Stderr, ui_tx.clone(), mirror);

        let capture = if self.capture_stdio {
            Some(capture_stdio(stdout_writer, stderr_writer.clone())?)
        } else {
            None
        };

        let backend = TerminalBackend::new(ui_tx.clone(), widths_rx);
        let (runtime, sender) = DashboardRuntime::start(&self.config, backend)?;
        let ui_thread = spawn_ui(session, ui_rx, widths_tx, self.config.scrollback_lines)?;

        log::info!(
            "Dashboard started (window {:?}, tick {:?})",
            self.config.window(),
            self.config.tick_interval()
        );

        Ok(Dashboard {
            sender,
            log_sink: Some(stderr_writer),
            running: Some(Running {
                runtime,
                ui: Some(UiHandle {
                    commands: ui_tx,
                    thread: ui_thread,
                }),
                capture,
            }),
        })
    }

    /// Start the dashboard loop over any plot backend, without touching the
    /// terminal or the process's stdio.
    pub fn build_with_backend<B: PlotBackend>(self, backend: B) -> Result<Dashboard> {
        if self.disabled {
            log::debug!("Dashboard disabled");
            return Ok(Dashboard::disabled());
        }
        self.config.validate()?;

        let (runtime, sender) = DashboardRuntime::start(&self.config, backend)?;
        Ok(Dashboard {
            sender,
            log_sink: None,
            running: Some(Running {
                runtime,
                ui: None,
                capture: None,
            }),
        })
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| DashError::io_context(format!("Failed to open log file {:?}", path), e))
}

struct UiHandle {
    commands: Sender<UiCommand>,
    thread: JoinHandle<()>,
}

struct Running {
    runtime: DashboardRuntime,
    ui: Option<UiHandle>,
    capture: Option<StdioCapture>,
}

/// Handle to a running (or disabled) dashboard.
pub struct Dashboard {
    sender: SampleSender,
    log_sink: Option<PaneWriter>,
    running: Option<Running>,
}

impl Dashboard {
    fn disabled() -> Self {
        Self {
            sender: SampleSender::disabled(),
            log_sink: None,
            running: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.running.is_some()
    }

    /// Report `value` for metric `name`.
    ///
    /// Blocks until the dashboard loop has taken the value. Values arriving
    /// faster than the sample period are dropped silently.
    pub fn set(&self, name: &str, value: f64) {
        self.sender.set(name, value);
    }

    pub async fn set_async(&self, name: &str, value: f64) {
        self.sender.set_async(name, value).await;
    }

    /// A clonable producer handle for other threads or tasks.
    pub fn sender(&self) -> SampleSender {
        self.sender.clone()
    }

    /// Writer feeding the stderr pane, suitable as a logger target. Output
    /// is discarded when no terminal UI is running.
    pub fn log_writer(&self) -> Box<dyn io::Write + Send + 'static> {
        match &self.log_sink {
            Some(writer) => Box::new(writer.clone()),
            None => Box::new(io::sink()),
        }
    }

    /// Stop accepting samples, stop the loop and UI, restore stdio.
    ///
    /// Safe to call more than once; also runs on drop.
    pub fn close(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        self.sender = SampleSender::disabled();
        self.log_sink = None;

        // Output written up to here still reaches the panes
        if let Some(mut capture) = running.capture {
            capture.restore();
        }

        running.runtime.shutdown();

        if let Some(ui) = running.ui {
            let _ = ui.commands.send(UiCommand::Close);
            if ui.thread.join().is_err() {
                log::error!("Dashboard UI thread panicked");
            }
        }

        log::info!("Dashboard closed");
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.close();
    }
}
