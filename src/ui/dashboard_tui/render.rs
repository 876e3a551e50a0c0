use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use super::app::{ChartView, DashboardApp, PANE_COUNT};
use super::pane::{OutputPane, PaneKind};
use super::widgets::{metric_chart, to_points, value_bounds};

/// Main render function. Returns the area of every item, panes first.
pub fn render_ui(frame: &mut Frame, app: &DashboardApp) -> Vec<Rect> {
    // Panes and charts share the height equally
    let constraints = vec![Constraint::Fill(1); app.item_count()];
    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    render_pane(frame, areas[0], PaneKind::Stdout, &app.stdout, app.focused == Some(0));
    render_pane(frame, areas[1], PaneKind::Stderr, &app.stderr, app.focused == Some(1));

    for (id, chart) in app.charts.iter().enumerate() {
        let index = PANE_COUNT + id;
        render_chart(frame, areas[index], chart, app.focused == Some(index));
    }

    areas.to_vec()
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

/// Render the newest lines of a captured stream
fn render_pane(frame: &mut Frame, area: Rect, kind: PaneKind, pane: &OutputPane, focused: bool) {
    let block = Block::bordered()
        .title(kind.title())
        .border_style(focus_style(focused));

    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = pane.tail(visible).into_iter().map(Line::from).collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_chart(frame: &mut Frame, area: Rect, chart: &ChartView, focused: bool) {
    let points = to_points(&chart.data);
    let bounds = value_bounds(&chart.data);

    let widget = metric_chart(
        &chart.title,
        chart.border,
        chart.marker,
        &points,
        bounds,
        focused,
    );
    frame.render_widget(widget, area);
}
