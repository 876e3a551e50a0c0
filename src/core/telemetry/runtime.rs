//! Tokio runtime and the single loop that owns all dashboard state.
//!
//! Series histories and chart handles live inside [`DashboardLoop`] and are
//! only ever touched by the task running it; everything else talks to it
//! through the sample queue or the shutdown signal.

use std::collections::HashMap;
use std::sync::mpsc as std_mpsc;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};

use crate::core::config::DashboardConfig;
use crate::error::Result;

use super::backend::{PlotBackend, PlotMarker, PlotWidget};
use super::queue::{QueuedSample, SampleSender};
use super::resample::resample;
use super::store::{RecordOutcome, SeriesStore};
use super::tasks::self_metrics_task;

/// How long `shutdown` waits for the loop to release its backend.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Owns the series store and one chart per series.
pub struct DashboardLoop<B: PlotBackend> {
    store: SeriesStore,
    charts: HashMap<String, B::Widget>,
    backend: B,
    window: Duration,
}

impl<B: PlotBackend> DashboardLoop<B> {
    pub fn new(config: &DashboardConfig, backend: B) -> Self {
        Self {
            store: SeriesStore::new(config.max_len, config.sample_period()),
            charts: HashMap::new(),
            backend,
            window: config.window(),
        }
    }

    /// Store a value observed at `now`, subject to the series throttle.
    pub fn ingest(&mut self, name: &str, value: f64, now: Instant) -> RecordOutcome {
        let outcome = self.store.record(name, value, now);
        if outcome == RecordOutcome::Throttled {
            log::trace!("Throttled sample for '{}'", name);
        }
        outcome
    }

    /// Push a fresh window of every series to its chart.
    ///
    /// Charts are created the first time their series is seen here. A chart
    /// that reports no width yet is skipped until the next tick.
    pub fn render_tick(&mut self, now: Instant) {
        let Self {
            store,
            charts,
            backend,
            window,
        } = self;

        for (name, series) in store.iter() {
            if !charts.contains_key(name) {
                let mut chart = backend.new_plot();
                chart.set_title(name);
                chart.set_border(true);
                chart.set_marker(PlotMarker::Braille);
                log::debug!("Created chart for '{}'", name);
                charts.insert(name.to_string(), chart);
            }

            let Some(chart) = charts.get_mut(name) else {
                continue;
            };

            let width = chart.plot_width();
            if width == 0 {
                continue;
            }

            let points = resample(series, *window, width, now);
            chart.set_data(vec![points]);
            backend.request_redraw();
        }
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    pub fn chart(&self, name: &str) -> Option<&B::Widget> {
        self.charts.get(name)
    }

    /// Serve samples and ticks until shutdown or until every sender is gone.
    pub async fn run(
        mut self,
        mut samples: mpsc::Receiver<QueuedSample>,
        tick: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        log::info!("Dashboard loop started");

        let mut ticker = interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                item = samples.recv() => {
                    let Some(item) = item else {
                        break;
                    };
                    self.ingest(&item.name, item.value, Instant::now());
                    if let Some(ack) = item.ack {
                        // The producer may have given up waiting
                        let _ = ack.send(());
                    }
                }
                _ = ticker.tick() => {
                    self.render_tick(Instant::now());
                }
                _ = shutdown.recv() => {
                    break;
                }
            }
        }

        samples.close();
        self.backend.release();
        log::info!("Dashboard loop stopped");
    }
}

/// Runtime hosting the dashboard loop and the self-metrics producer.
pub struct DashboardRuntime {
    shutdown_tx: broadcast::Sender<()>,
    loop_done: std_mpsc::Receiver<()>,
    runtime: Option<tokio::runtime::Runtime>,
}

impl DashboardRuntime {
    /// Spawn the loop over `backend` and return the sender feeding it.
    pub fn start<B: PlotBackend>(
        config: &DashboardConfig,
        backend: B,
    ) -> Result<(Self, SampleSender)> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .thread_name("dashtui-worker")
            .build()?;

        let (sender, samples) = SampleSender::channel();
        let (shutdown_tx, _) = broadcast::channel::<()>(1);
        let (done_tx, loop_done) = std_mpsc::channel();

        let dash_loop = DashboardLoop::new(config, backend);
        let tick = config.tick_interval();
        let shutdown = shutdown_tx.subscribe();
        runtime.spawn(async move {
            dash_loop.run(samples, tick, shutdown).await;
            let _ = done_tx.send(());
        });

        if config.self_metrics {
            runtime.spawn(self_metrics_task(
                sender.clone(),
                config.self_metrics_interval(),
                shutdown_tx.subscribe(),
            ));
        }

        Ok((
            Self {
                shutdown_tx,
                loop_done,
                runtime: Some(runtime),
            },
            sender,
        ))
    }

    /// Stop the loop, wait briefly for it to release the backend, then tear
    /// the runtime down without blocking on stragglers.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(runtime) = self.runtime.take() else {
            return;
        };

        log::info!("Shutting down dashboard runtime");
        let _ = self.shutdown_tx.send(());
        if self.loop_done.recv_timeout(SHUTDOWN_GRACE).is_err() {
            log::warn!("Dashboard loop did not stop within {:?}", SHUTDOWN_GRACE);
        }
        runtime.shutdown_background();
    }
}

impl Drop for DashboardRuntime {
    fn drop(&mut self) {
        self.stop();
    }
}
