use ratatui::{
    prelude::*,
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

use crate::core::telemetry::PlotMarker;

/// Colors cycled through when a chart carries several rows
const ROW_COLORS: [Color; 4] = [Color::Cyan, Color::LightYellow, Color::LightMagenta, Color::LightGreen];

/// Map a dashboard marker onto the ratatui symbol set
pub fn marker_symbol(marker: PlotMarker) -> symbols::Marker {
    match marker {
        PlotMarker::Braille => symbols::Marker::Braille,
        PlotMarker::Dot => symbols::Marker::Dot,
        PlotMarker::Block => symbols::Marker::Block,
    }
}

/// Lowest and highest value across all rows, padded so a flat line still
/// gets a visible y range.
pub fn value_bounds(rows: &[Vec<f64>]) -> (f64, f64) {
    let values = rows.iter().flatten().copied().filter(|v| v.is_finite());
    let (min, max) = values.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min > max {
        (0.0, 1.0)
    } else if min == max {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}

/// Short label for an axis bound
pub fn format_value(value: f64) -> String {
    if value.abs() >= 1000.0 || value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Turn rows of values into (x, y) points, x being the column index
pub fn to_points(rows: &[Vec<f64>]) -> Vec<Vec<(f64, f64)>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, &v)| (i as f64, v))
                .collect()
        })
        .collect()
}

/// Build the line chart for one metric
pub fn metric_chart<'a>(
    title: &'a str,
    border: bool,
    marker: PlotMarker,
    points: &'a [Vec<(f64, f64)>],
    bounds: (f64, f64),
    focused: bool,
) -> Chart<'a> {
    let datasets = points
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Dataset::default()
                .marker(marker_symbol(marker))
                .graph_type(GraphType::Line)
                .style(Style::default().fg(ROW_COLORS[i % ROW_COLORS.len()]))
                .data(row)
        })
        .collect::<Vec<_>>();

    let x_max = points
        .iter()
        .map(|row| row.len())
        .max()
        .unwrap_or(0)
        .saturating_sub(1)
        .max(1) as f64;

    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(title)
        .borders(if border { Borders::ALL } else { Borders::NONE })
        .border_style(border_style);

    // No x labels: the x axis is just "the last window"
    Chart::new(datasets)
        .block(block)
        .x_axis(Axis::default().bounds([0.0, x_max]))
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([bounds.0, bounds.1])
                .labels(vec![
                    Line::from(format_value(bounds.0)),
                    Line::from(format_value(bounds.1)),
                ]),
        )
}
