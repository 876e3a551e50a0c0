#[cfg(unix)]
use std::fs::File;
use std::io::{self, Write};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Position, prelude::Rect, Terminal};
use tokio::sync::watch;

use crate::core::telemetry::PlotMarker;
use crate::error::{DashError, Result};

use super::event_handler::{map_event, DashboardEvent};
use super::pane::{OutputPane, PaneKind};
use super::render::render_ui;

/// How long the UI thread waits for input before checking for commands.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Items laid out before the charts: the stdout and stderr panes.
pub const PANE_COUNT: usize = 2;

/// Requests sent to the UI thread.
#[derive(Debug)]
pub enum UiCommand {
    AddChart { id: usize },
    SetTitle { id: usize, title: String },
    SetBorder { id: usize, enabled: bool },
    SetMarker { id: usize, marker: PlotMarker },
    SetData { id: usize, data: Vec<Vec<f64>> },
    Append { pane: PaneKind, bytes: Vec<u8> },
    Redraw,
    Close,
}

/// What one chart currently shows.
#[derive(Debug, Clone, Default)]
pub struct ChartView {
    pub title: String,
    pub border: bool,
    pub marker: PlotMarker,
    pub data: Vec<Vec<f64>>,
}

/// Dashboard UI state, owned by the UI thread
pub struct DashboardApp {
    pub stdout: OutputPane,
    pub stderr: OutputPane,
    pub charts: Vec<ChartView>,
    /// Index into the layout: panes first, then charts
    pub focused: Option<usize>,
    pub dirty: bool,
    pub should_quit: bool,
    pub closed: bool,
    item_areas: Vec<Rect>,
}

impl DashboardApp {
    pub fn new(scrollback_lines: usize) -> Self {
        Self {
            stdout: OutputPane::new(scrollback_lines),
            stderr: OutputPane::new(scrollback_lines),
            charts: Vec::new(),
            focused: None,
            dirty: true,
            should_quit: false,
            closed: false,
            item_areas: Vec::new(),
        }
    }

    pub fn apply(&mut self, command: UiCommand) {
        match command {
            UiCommand::AddChart { id } => {
                self.chart_mut(id);
                self.dirty = true;
            }
            UiCommand::SetTitle { id, title } => self.chart_mut(id).title = title,
            UiCommand::SetBorder { id, enabled } => self.chart_mut(id).border = enabled,
            UiCommand::SetMarker { id, marker } => self.chart_mut(id).marker = marker,
            UiCommand::SetData { id, data } => self.chart_mut(id).data = data,
            UiCommand::Append { pane, bytes } => {
                match pane {
                    PaneKind::Stdout => self.stdout.push_bytes(&bytes),
                    PaneKind::Stderr => self.stderr.push_bytes(&bytes),
                }
                self.dirty = true;
            }
            UiCommand::Redraw => self.dirty = true,
            UiCommand::Close => self.closed = true,
        }
    }

    fn chart_mut(&mut self, id: usize) -> &mut ChartView {
        if id >= self.charts.len() {
            self.charts.resize_with(id + 1, ChartView::default);
        }
        &mut self.charts[id]
    }

    /// Handle keyboard/mouse events
    pub fn handle_event(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Quit => self.should_quit = true,
            DashboardEvent::Focus { column, row } => {
                let hit = self
                    .item_areas
                    .iter()
                    .position(|area| area.contains(Position::new(column, row)));
                if let Some(index) = hit {
                    if self.focused != Some(index) {
                        log::info!("selected {}", self.item_title(index));
                        self.focused = Some(index);
                        self.dirty = true;
                    }
                }
            }
            DashboardEvent::Resize => self.dirty = true,
            DashboardEvent::None => {}
        }
    }

    pub fn item_count(&self) -> usize {
        PANE_COUNT + self.charts.len()
    }

    pub fn item_title(&self, index: usize) -> &str {
        match index {
            0 => PaneKind::Stdout.title(),
            1 => PaneKind::Stderr.title(),
            _ => self
                .charts
                .get(index - PANE_COUNT)
                .map(|c| c.title.as_str())
                .unwrap_or(""),
        }
    }

    /// Remember where each item was drawn and return the plottable column
    /// count of every chart.
    pub fn set_layout(&mut self, areas: Vec<Rect>) -> Vec<usize> {
        let widths = self
            .charts
            .iter()
            .enumerate()
            .map(|(id, chart)| {
                let area = areas.get(PANE_COUNT + id).copied().unwrap_or_default();
                let width = if chart.border {
                    area.width.saturating_sub(2)
                } else {
                    area.width
                };
                width as usize
            })
            .collect();

        self.item_areas = areas;
        widths
    }
}

#[cfg(unix)]
type TtyWriter = File;
#[cfg(not(unix))]
type TtyWriter = io::Stdout;

#[cfg(unix)]
fn open_tty() -> io::Result<TtyWriter> {
    std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/tty")
}

#[cfg(not(unix))]
fn open_tty() -> io::Result<TtyWriter> {
    Ok(io::stdout())
}

/// Raw-mode, alternate-screen terminal. Restored on drop.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<TtyWriter>>,
    restored: bool,
}

impl TerminalSession {
    /// Take over the controlling terminal.
    ///
    /// On unix the terminal device is opened directly so that redirecting
    /// the process's stdout never lands on screen.
    pub fn open() -> Result<Self> {
        let mut tty = open_tty().map_err(|e| DashError::io_context("Failed to open terminal", e))?;

        enable_raw_mode().map_err(|e| DashError::io_context("Failed to enable raw mode", e))?;
        if let Err(e) = execute!(tty, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(DashError::io_context("Failed to enter alternate screen", e));
        }

        let terminal = match Terminal::new(CrosstermBackend::new(tty)) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = disable_raw_mode();
                return Err(DashError::io_context("Failed to create terminal", e));
            }
        };

        Ok(Self {
            terminal,
            restored: false,
        })
    }

    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }

    /// Print a line to the terminal itself, bypassing any captured stdio.
    fn report(&mut self, message: &str) {
        let _ = writeln!(self.terminal.backend_mut(), "{}", message);
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.restore();
    }
}

enum UiExit {
    Closed,
    UserQuit,
}

fn run_ui(
    session: &mut TerminalSession,
    app: &mut DashboardApp,
    commands: &Receiver<UiCommand>,
    widths: &watch::Sender<Vec<usize>>,
) -> io::Result<UiExit> {
    loop {
        loop {
            match commands.try_recv() {
                Ok(command) => app.apply(command),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    app.closed = true;
                    break;
                }
            }
        }

        if app.closed {
            return Ok(UiExit::Closed);
        }

        if app.dirty {
            let mut areas = Vec::new();
            session
                .terminal
                .draw(|frame| areas = render_ui(frame, app))?;

            let chart_widths = app.set_layout(areas);
            widths.send_if_modified(|current| {
                if *current == chart_widths {
                    false
                } else {
                    *current = chart_widths;
                    true
                }
            });
            app.dirty = false;
        }

        if event::poll(POLL_INTERVAL)? {
            app.handle_event(map_event(event::read()?));
            if app.should_quit {
                return Ok(UiExit::UserQuit);
            }
        }
    }
}

/// Run the dashboard UI on its own thread.
///
/// The thread ends quietly on [`UiCommand::Close`]. A user quit ends the
/// process with status 0; a terminal failure ends it with status 1, since a
/// half-drawn screen cannot be recovered.
pub fn spawn_ui(
    mut session: TerminalSession,
    commands: Receiver<UiCommand>,
    widths: watch::Sender<Vec<usize>>,
    scrollback_lines: usize,
) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("dashtui-ui".to_string())
        .spawn(move || {
            let mut app = DashboardApp::new(scrollback_lines);
            let outcome = run_ui(&mut session, &mut app, &commands, &widths);
            session.restore();

            match outcome {
                Ok(UiExit::Closed) => log::info!("Dashboard UI closed"),
                Ok(UiExit::UserQuit) => {
                    log::info!("Dashboard UI quit by user");
                    std::process::exit(0);
                }
                Err(e) => {
                    log::error!("Dashboard UI failed: {}", e);
                    session.report(&format!("dashtui: terminal failure: {}", e));
                    std::process::exit(1);
                }
            }
        })
        .map_err(|e| DashError::io_context("Failed to spawn UI thread", e))
}
