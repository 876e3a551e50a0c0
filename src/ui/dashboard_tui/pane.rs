//! Scrollback panes for captured process output.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use super::app::UiCommand;

/// Which text pane a byte stream belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
    Stdout,
    Stderr,
}

impl PaneKind {
    pub fn title(self) -> &'static str {
        match self {
            PaneKind::Stdout => "stdout",
            PaneKind::Stderr => "stderr",
        }
    }
}

/// Bounded scrollback of text lines.
///
/// Bytes may arrive split anywhere; an unterminated trailing line is held
/// in `partial` and shown until its newline arrives.
#[derive(Debug, Clone)]
pub struct OutputPane {
    max_lines: usize,
    lines: VecDeque<String>,
    partial: String,
}

impl OutputPane {
    pub fn new(max_lines: usize) -> Self {
        Self {
            max_lines: max_lines.max(1),
            lines: VecDeque::new(),
            partial: String::new(),
        }
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        for ch in text.chars() {
            match ch {
                '\n' => {
                    let line = std::mem::take(&mut self.partial);
                    self.push_line(line);
                }
                '\r' => {}
                _ => self.partial.push(ch),
            }
        }
    }

    fn push_line(&mut self, line: String) {
        if self.lines.len() >= self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// The newest `count` lines, oldest first, including a pending partial
    /// line.
    pub fn tail(&self, count: usize) -> Vec<&str> {
        let mut all: Vec<&str> = self.lines.iter().map(String::as_str).collect();
        if !self.partial.is_empty() {
            all.push(self.partial.as_str());
        }
        let skip = all.len().saturating_sub(count);
        all.split_off(skip)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// `io::Write` end of a pane.
///
/// Every write is forwarded to the UI thread, which marks the screen dirty;
/// an optional log file receives a copy of the same bytes.
#[derive(Debug, Clone)]
pub struct PaneWriter {
    pane: PaneKind,
    ui: Sender<UiCommand>,
    mirror: Option<Arc<Mutex<File>>>,
}

impl PaneWriter {
    pub fn new(pane: PaneKind, ui: Sender<UiCommand>, mirror: Option<Arc<Mutex<File>>>) -> Self {
        Self { pane, ui, mirror }
    }
}

impl Write for PaneWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(mirror) = &self.mirror {
            let mut file = mirror
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?;
            file.write_all(buf)?;
        }

        // A closed UI just means nobody is looking any more
        let _ = self.ui.send(UiCommand::Append {
            pane: self.pane,
            bytes: buf.to_vec(),
        });
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(mirror) = &self.mirror {
            let mut file = mirror
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?;
            file.flush()?;
        }
        Ok(())
    }
}
