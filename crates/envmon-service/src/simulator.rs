//! Simulated probes for running the service without hardware.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use envmon_core::{MockProbe, MockProbeBuilder, Monitor, ProbeId};

use crate::state::AppState;

/// Build `count` probes named `SIM1..` and bind them round-robin to the
/// monitor's areas. Starting CO2 values are spread so areas land on
/// different levels.
pub fn bind_simulated_probes(monitor: &mut Monitor, count: usize) -> Vec<MockProbe> {
    let areas: Vec<String> = monitor.areas().map(|a| a.name().to_string()).collect();
    if areas.is_empty() {
        warn!("No areas configured, simulated probes stay unbound");
    }

    let mut probes = Vec::with_capacity(count);
    for i in 0..count {
        let id = ProbeId::new(format!("SIM{}", i + 1));
        if let Some(area) = areas.get(i % areas.len().max(1))
            && let Err(e) = monitor.bind_probe(&id, area, Some("SIMULATED"))
        {
            warn!(probe = %id, error = %e, "Failed to bind simulated probe");
        }
        let co2 = 500.0 + 250.0 * (i % 7) as f64;
        probes.push(MockProbeBuilder::new(id).co2(co2).build());
    }
    probes
}

/// Spawn a task feeding one reading per probe every `period`.
pub fn spawn(
    state: Arc<AppState>,
    mut probes: Vec<MockProbe>,
    period: Duration,
    cancel_token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(probes = probes.len(), period_ms = period.as_millis() as u64, "Simulation started");
        let mut timer = interval(period);

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    info!("Simulation cancelled, shutting down");
                    break;
                }
                _ = timer.tick() => {
                    let now = OffsetDateTime::now_utc();
                    let mut monitor = state.monitor.lock().await;
                    for probe in &mut probes {
                        let telemetry = probe.next_telemetry(now);
                        debug!("{}", telemetry);
                        if let Err(e) = monitor.ingest(&telemetry) {
                            warn!(probe = %telemetry.probe, error = %e, "Simulated reading refused");
                        }
                    }
                }
            }
        }
    })
}
