//! Self-metrics task: the dashboard's own memory and task count.

use humansize::{format_size, BINARY};
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use tokio::sync::broadcast;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::core::telemetry::queue::SampleSender;

/// Resident memory of this process, in MiB.
pub const MEMORY_METRIC: &str = "memory MiB";
/// Live tasks on the dashboard runtime.
pub const TASKS_METRIC: &str = "tasks";

const MIB: u64 = 1024 * 1024;

/// Task that samples process memory and runtime task count.
///
/// Values go through the regular sample queue, so they are throttled and
/// resampled exactly like externally reported metrics.
pub async fn self_metrics_task(
    sender: SampleSender,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let pid = match sysinfo::get_current_pid() {
        Ok(pid) => pid,
        Err(e) => {
            log::warn!("Self-metrics disabled, no current pid: {}", e);
            return;
        }
    };

    let refresh_kind = ProcessRefreshKind::nothing().with_memory();
    let mut system = System::new();
    system.refresh_processes_specifics(ProcessesToUpdate::Some(&[pid]), true, refresh_kind);
    if let Some(process) = system.process(pid) {
        log::debug!(
            "Self-metrics started, resident memory {}",
            format_size(process.memory(), BINARY)
        );
    }

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                system.refresh_processes_specifics(
                    ProcessesToUpdate::Some(&[pid]),
                    true,
                    refresh_kind,
                );

                if let Some(process) = system.process(pid) {
                    sender
                        .set_async(MEMORY_METRIC, (process.memory() / MIB) as f64)
                        .await;
                }

                let tasks = tokio::runtime::Handle::current().metrics().num_alive_tasks();
                sender.set_async(TASKS_METRIC, tasks as f64).await;

                if !sender.is_enabled() {
                    break;
                }
            }
            _ = shutdown.recv() => {
                break;
            }
        }
    }

    log::debug!("Self-metrics task stopped");
}
