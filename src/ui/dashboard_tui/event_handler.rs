use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

/// Events that can occur in the dashboard TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Quit the application
    Quit,
    /// Focus whatever sits under a mouse click
    Focus { column: u16, row: u16 },
    /// Terminal was resized
    Resize,
    /// No action
    None,
}

/// Translate a raw terminal event
pub fn map_event(event: Event) -> DashboardEvent {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => DashboardEvent::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                DashboardEvent::Quit
            }
            _ => DashboardEvent::None,
        },
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            DashboardEvent::Focus {
                column: mouse.column,
                row: mouse.row,
            }
        }
        Event::Resize(_, _) => DashboardEvent::Resize,
        _ => DashboardEvent::None,
    }
}
