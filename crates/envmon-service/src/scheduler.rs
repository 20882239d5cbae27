//! Tick scheduler.
//!
//! One task drives two timers: the fast tick recomputes every area and
//! queues one indicator update per area with a display level; the slow tick
//! logs and queues the diagnostic summary. The monitor lock is released
//! before anything is queued.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::config::SchedulerConfig;
use crate::emitter::Outbound;
use crate::state::AppState;

/// The outbound queue was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("outbound queue closed")]
pub struct QueueClosed;

/// Drives the fast and slow ticks.
pub struct Scheduler {
    state: Arc<AppState>,
    tx: mpsc::Sender<Outbound>,
    tick_interval: Duration,
    diagnostic_interval: Duration,
}

impl Scheduler {
    /// Create a scheduler from timer settings.
    pub fn new(state: Arc<AppState>, tx: mpsc::Sender<Outbound>, config: &SchedulerConfig) -> Self {
        Self {
            state,
            tx,
            tick_interval: config.tick_interval(),
            diagnostic_interval: config.diagnostic_interval(),
        }
    }

    /// Spawn the scheduler loop. It runs until the token is cancelled or the
    /// outbound queue closes.
    pub fn start(self, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel_token))
    }

    /// Run the scheduler loop on the current task.
    pub async fn run(self, cancel_token: CancellationToken) {
        info!(
            tick_ms = self.tick_interval.as_millis() as u64,
            diagnostic_secs = self.diagnostic_interval.as_secs(),
            "Scheduler started"
        );

        let mut fast = interval(self.tick_interval);
        fast.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut slow = interval_at(
            Instant::now() + self.diagnostic_interval,
            self.diagnostic_interval,
        );
        slow.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let result = tokio::select! {
                _ = cancel_token.cancelled() => {
                    info!("Scheduler cancelled, shutting down");
                    break;
                }
                _ = fast.tick() => self.fast_tick().await,
                _ = slow.tick() => self.diagnostic_tick().await,
            };
            if result.is_err() {
                debug!("Outbound queue closed, stopping scheduler");
                break;
            }
        }
    }

    /// Recompute all areas and queue the resulting updates.
    pub async fn fast_tick(&self) -> Result<(), QueueClosed> {
        let report = {
            let mut monitor = self.state.monitor.lock().await;
            monitor.tick()
        };
        trace!(test_mode = report.test_mode, "Queueing {} update(s)", report.updates.len());

        for update in report.updates {
            self.tx
                .send(Outbound::Indicator(update))
                .await
                .map_err(|_| QueueClosed)?;
        }
        Ok(())
    }

    /// Log and queue the diagnostic summary.
    pub async fn diagnostic_tick(&self) -> Result<(), QueueClosed> {
        let summary = self.state.monitor.lock().await.diagnostic_summary();
        info!("{}", summary);
        self.tx
            .send(Outbound::Diagnostic(summary))
            .await
            .map_err(|_| QueueClosed)
    }
}
