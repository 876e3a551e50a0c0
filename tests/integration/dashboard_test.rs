use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use dashtui::core::telemetry::tasks::{MEMORY_METRIC, TASKS_METRIC};
use dashtui::{DashError, DashboardBuilder};

use super::support::{wait_for, Recorded, RecordingBackend};

fn fast_builder() -> DashboardBuilder {
    DashboardBuilder::new()
        .sample_period(Duration::ZERO)
        .tick_interval(Duration::from_millis(10))
        .window(Duration::from_secs(2))
        .self_metrics(false)
}

#[test]
fn test_disabled_dashboard_never_blocks() {
    let mut dashboard = DashboardBuilder::new().disable().build().unwrap();
    assert!(!dashboard.is_enabled());

    let started = Instant::now();
    for i in 0..10_000 {
        dashboard.set("cpu", i as f64);
    }
    dashboard.sender().set("cpu", 1.0);
    dashboard.close();
    dashboard.close();

    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_disabled_with_backend_is_inert() {
    let (backend, state) = RecordingBackend::new(8);
    let dashboard = DashboardBuilder::new()
        .disable()
        .build_with_backend(backend)
        .unwrap();

    dashboard.set("cpu", 1.0);
    drop(dashboard);

    let state = state.lock().unwrap();
    assert!(state.plots.is_empty());
    assert!(!state.released);
}

#[test]
fn test_samples_reach_charts() {
    let (backend, state) = RecordingBackend::new(16);
    let mut dashboard = fast_builder().build_with_backend(backend).unwrap();
    assert!(dashboard.is_enabled());

    // Seeds share the first write's timestamp; move later writes into a
    // later bucket so they are not shadowed by a seed.
    dashboard.set("cpu", 0.0);
    thread::sleep(Duration::from_millis(200));
    for i in 0..20 {
        dashboard.set("cpu", 50.0 + i as f64);
        thread::sleep(Duration::from_millis(2));
    }

    let plotted = wait_for(Duration::from_secs(2), || {
        let state = state.lock().unwrap();
        state
            .plots
            .iter()
            .any(|p| p.title == "cpu" && p.data.iter().flatten().any(|&v| v >= 50.0))
    });
    assert!(plotted);

    dashboard.close();
    let state = state.lock().unwrap();
    assert!(state.released);
    assert!(state.plots.iter().all(|p| p.data.iter().all(|row| row.len() == 16)));
}

#[test]
fn test_concurrent_producers_share_the_loop() {
    let (backend, state) = RecordingBackend::new(8);
    let mut dashboard = fast_builder().build_with_backend(backend).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let sender = dashboard.sender();
            thread::spawn(move || {
                let name = format!("producer {}", i);
                for n in 0..50 {
                    sender.set(&name, n as f64);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let all_charted = wait_for(Duration::from_secs(2), || {
        state.lock().unwrap().plots.len() == 4
    });
    assert!(all_charted);
    dashboard.close();
}

#[test]
fn test_close_releases_waiting_producers() {
    let (backend, _state) = RecordingBackend::new(8);
    let mut dashboard = fast_builder().build_with_backend(backend).unwrap();
    let sender = dashboard.sender();

    let producer = thread::spawn(move || {
        let started = Instant::now();
        while started.elapsed() < Duration::from_millis(300) {
            sender.set("spin", 1.0);
        }
        sender
    });

    thread::sleep(Duration::from_millis(50));
    dashboard.close();
    let sender = producer.join().unwrap();

    assert!(!sender.is_enabled());
    let started = Instant::now();
    sender.set("spin", 2.0);
    dashboard.set("spin", 3.0);
    assert!(started.elapsed() < Duration::from_millis(100));
}

#[test]
fn test_self_metrics_are_charted() {
    let (backend, state) = RecordingBackend::new(8);
    let mut dashboard = fast_builder()
        .self_metrics(true)
        .self_metrics_interval(Duration::from_millis(10))
        .build_with_backend(backend)
        .unwrap();

    let charted = wait_for(Duration::from_secs(3), || {
        let state = state.lock().unwrap();
        let has = |name: &str| state.plots.iter().any(|p| p.title == name);
        has(MEMORY_METRIC) && has(TASKS_METRIC)
    });
    assert!(charted);
    dashboard.close();
}

#[test]
fn test_invalid_config_fails_build() {
    let (backend, _state) = RecordingBackend::new(8);
    let result = DashboardBuilder::new().max_len(0).build_with_backend(backend);

    assert!(matches!(result, Err(DashError::Config(_))));
}

#[test]
fn test_unopenable_log_file_fails_build() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("capture.log");

    let result = DashboardBuilder::new().log_file(&path).build();

    assert!(matches!(result, Err(DashError::Io(_))));
}

#[tokio::test]
async fn test_set_async_from_runtime() {
    let (backend, state) = RecordingBackend::new(4);
    let dashboard = fast_builder().build_with_backend(backend).unwrap();

    dashboard.set_async("async", 7.0).await;

    let mut charted = false;
    for _ in 0..200 {
        if state.lock().unwrap().plots.iter().any(|p| p.title == "async") {
            charted = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(charted);
}

fn chart_count(state: &Mutex<Recorded>) -> usize {
    state.lock().unwrap().plots.len()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_set_from_runtime_threads_creates_every_series() {
    let (backend, state) = RecordingBackend::new(4);
    let mut dashboard = fast_builder().build_with_backend(backend).unwrap();

    for i in 0..20 {
        dashboard.set(&format!("worker {}", i), 1.0);
    }

    let sender = dashboard.sender();
    tokio::task::spawn_blocking(move || {
        for i in 0..20 {
            sender.set(&format!("blocking {}", i), 1.0);
        }
    })
    .await
    .unwrap();

    let all_charted = wait_for(Duration::from_secs(2), || chart_count(&state) == 40);
    assert!(all_charted, "{} charts", chart_count(&state));

    tokio::task::block_in_place(|| dashboard.close());
}

#[tokio::test]
async fn test_set_on_current_thread_runtime_is_not_lost() {
    let (backend, state) = RecordingBackend::new(4);
    let dashboard = fast_builder().build_with_backend(backend).unwrap();

    for i in 0..20 {
        dashboard.set(&format!("metric {}", i), 1.0);
    }

    let mut charted = 0;
    for _ in 0..200 {
        charted = chart_count(&state);
        if charted == 20 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(charted, 20);
}
