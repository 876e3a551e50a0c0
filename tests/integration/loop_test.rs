use std::time::{Duration, Instant};

use dashtui::core::telemetry::{resample, DashboardLoop, RecordOutcome};
use dashtui::{DashboardConfig, PlotMarker, PlotWidget};

use super::support::RecordingBackend;

fn config(max_len: usize, sample_period_us: u64, window_ms: u64) -> DashboardConfig {
    DashboardConfig {
        max_len,
        sample_period_us,
        window_ms,
        self_metrics: false,
        ..Default::default()
    }
}

fn base() -> Instant {
    Instant::now()
}

#[test]
fn test_charts_created_in_first_seen_order() {
    let (backend, state) = RecordingBackend::new(8);
    let mut dash = DashboardLoop::new(&config(16, 0, 1000), backend);
    let t0 = base();

    dash.ingest("latency", 3.0, t0);
    dash.ingest("cpu", 1.0, t0);
    dash.ingest("latency", 4.0, t0 + Duration::from_millis(10));
    dash.render_tick(t0 + Duration::from_millis(20));

    let state = state.lock().unwrap();
    let titles: Vec<_> = state.plots.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["latency", "cpu"]);
    assert!(state.plots.iter().all(|p| p.border));
    assert!(state
        .plots
        .iter()
        .all(|p| p.marker == Some(PlotMarker::Braille)));
}

#[test]
fn test_charts_are_created_once() {
    let (backend, state) = RecordingBackend::new(4);
    let mut dash = DashboardLoop::new(&config(16, 0, 1000), backend);
    let t0 = base();

    dash.ingest("cpu", 1.0, t0);
    assert!(dash.chart("cpu").is_none());

    for i in 1..=5 {
        dash.render_tick(t0 + Duration::from_millis(i * 100));
    }
    assert_eq!(dash.chart("cpu").map(|c| c.plot_width()), Some(4));
    assert!(dash.chart("mem").is_none());

    let state = state.lock().unwrap();
    assert_eq!(state.plots.len(), 1);
    assert_eq!(state.plots[0].updates, 5);
    assert_eq!(state.redraws, 5);
}

#[test]
fn test_zero_width_chart_is_skipped() {
    let (backend, state) = RecordingBackend::new(0);
    let mut dash = DashboardLoop::new(&config(16, 0, 1000), backend);
    let t0 = base();

    dash.ingest("cpu", 1.0, t0);
    dash.render_tick(t0 + Duration::from_millis(50));

    let state = state.lock().unwrap();
    assert_eq!(state.plots.len(), 1);
    assert!(state.plots[0].data.is_empty());
    assert_eq!(state.redraws, 0);
}

#[test]
fn test_tick_pushes_one_row_of_chart_width() {
    let (backend, state) = RecordingBackend::new(10);
    let mut dash = DashboardLoop::new(&config(32, 0, 1000), backend);
    let t0 = base();

    // seeds and the first value share t0, the window's left edge
    dash.ingest("rps", 1.0, t0);
    dash.ingest("rps", 5.0, t0 + Duration::from_millis(150));
    dash.ingest("rps", 8.0, t0 + Duration::from_millis(650));
    let now = t0 + Duration::from_millis(1000);
    dash.render_tick(now);

    let expected = resample(
        dash.store().get("rps").unwrap(),
        Duration::from_millis(1000),
        10,
        now,
    );
    let state = state.lock().unwrap();
    assert_eq!(state.plots[0].data, vec![expected.clone()]);
    assert_eq!(
        expected,
        vec![0.0, 5.0, 5.0, 5.0, 5.0, 5.0, 8.0, 8.0, 8.0, 8.0]
    );
}

#[test]
fn test_edge_samples_render_as_seed_value() {
    let (backend, state) = RecordingBackend::new(2);
    let mut dash = DashboardLoop::new(&config(5, 0, 2000), backend);
    let t0 = base();

    dash.ingest("cpu", 10.0, t0);
    dash.ingest("cpu", 20.0, t0 + Duration::from_secs(1));
    dash.render_tick(t0 + Duration::from_secs(1));

    let state = state.lock().unwrap();
    assert_eq!(state.plots[0].data, vec![vec![0.0, 0.0]]);
}

#[test]
fn test_throttled_writes_do_not_grow_series() {
    let (backend, _state) = RecordingBackend::new(4);
    let period_us = 16_667;
    let mut dash = DashboardLoop::new(&config(8, period_us, 1000), backend);
    let t0 = base();
    let period = Duration::from_micros(period_us);

    assert_eq!(dash.ingest("hz", 0.5, t0), RecordOutcome::Throttled);
    assert_eq!(dash.ingest("hz", 1.0, t0 + period), RecordOutcome::Stored);
    for i in 1..100u64 {
        let at = t0 + period + Duration::from_micros(i * 100);
        assert_eq!(dash.ingest("hz", i as f64, at), RecordOutcome::Throttled);
    }

    let series = dash.store().get("hz").unwrap();
    assert_eq!(series.len(), 8);
    assert_eq!(series.last().value, 1.0);
}

#[test]
fn test_stale_series_renders_flat_at_chart_width() {
    let (backend, state) = RecordingBackend::new(6);
    let mut dash = DashboardLoop::new(&config(64, 0, 1000), backend);
    let t0 = base();

    dash.ingest("queue", 42.0, t0 + Duration::from_millis(10));
    dash.render_tick(t0 + Duration::from_secs(60));

    let state = state.lock().unwrap();
    assert_eq!(state.plots[0].data, vec![vec![42.0; 6]]);
}
