//! Sensor-line router.
//!
//! Every inbound line is one of:
//!
//! - probe self-assignment: `A4B2 SET PROBE POOL DEEP END`
//! - telemetry: `A4B2: CO2:812,Temp:22.4,Hum:41,Sound:55`
//! - anything else, handed to the [command protocol](crate::commands)
//!   (`SET PROBES ...` and `REMOVE PROBE ...` included)
//!
//! Lines are classified first, then applied to the monitor under its lock.
//! Replies go to the outbound queue after the lock is released.

use time::OffsetDateTime;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use envmon_core::{ProbeId, RecordOutcome, Telemetry};
use envmon_types::normalize_name;

use crate::commands::{self, Reply};
use crate::emitter::Outbound;
use crate::scheduler::QueueClosed;
use crate::state::AppState;

/// What an inbound line turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorLine {
    /// A probe announcing which area it belongs to.
    ProbeAssign {
        probe: ProbeId,
        area: String,
        location: String,
    },
    /// A telemetry record.
    Telemetry(Telemetry),
    /// Everything else; parsed by the command protocol.
    Command(String),
}

/// Classify a trimmed, non-empty line.
///
/// ```
/// use envmon_service::input::{SensorLine, classify};
/// use time::OffsetDateTime;
///
/// let now = OffsetDateTime::UNIX_EPOCH;
/// assert!(matches!(classify("A4B2: CO2:812", now), SensorLine::Telemetry(_)));
/// assert!(matches!(classify("A4B2 SET PROBE POOL EAST", now), SensorLine::ProbeAssign { .. }));
/// assert!(matches!(classify("GET AREAS", now), SensorLine::Command(_)));
/// ```
pub fn classify(line: &str, now: OffsetDateTime) -> SensorLine {
    let line = line.trim();

    if let Some(assign) = parse_probe_assign(line) {
        return assign;
    }

    match Telemetry::parse_line(line, now) {
        Ok(telemetry) => SensorLine::Telemetry(telemetry),
        Err(e) => {
            debug!(error = %e, "Not telemetry");
            SensorLine::Command(line.to_string())
        }
    }
}

/// `<PROBE> SET PROBE <AREA> <LOCATION...>`
fn parse_probe_assign(line: &str) -> Option<SensorLine> {
    let (probe, rest) = line.split_once(char::is_whitespace)?;
    let words: Vec<&str> = rest.split_whitespace().collect();
    match words.as_slice() {
        [set, keyword, area, location @ ..]
            if set.eq_ignore_ascii_case("SET") && keyword.eq_ignore_ascii_case("PROBE") =>
        {
            Some(SensorLine::ProbeAssign {
                probe: ProbeId::new(probe),
                area: normalize_name(area),
                location: normalize_name(&location.join(" ")),
            })
        }
        _ => None,
    }
}

/// Outcome of applying one line.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    /// Telemetry was recorded.
    Recorded(RecordOutcome),
    /// Telemetry was refused by the probe table.
    Refused(String),
    /// The line produced a reply.
    Reply(Reply),
    /// Blank line.
    Ignored,
}

/// Apply one inbound line to the monitor.
pub async fn route_line(state: &AppState, line: &str, now: OffsetDateTime) -> Routed {
    let line = line.trim();
    if line.is_empty() {
        return Routed::Ignored;
    }

    let mut monitor = state.monitor.lock().await;
    match classify(line, now) {
        SensorLine::Telemetry(telemetry) => match monitor.ingest(&telemetry) {
            Ok(outcome) => Routed::Recorded(outcome),
            Err(e) => {
                warn!(probe = %telemetry.probe, error = %e, "Telemetry refused");
                Routed::Refused(e.to_string())
            }
        },
        SensorLine::ProbeAssign {
            probe,
            area,
            location,
        } => {
            let verdict = match monitor.bind_probe(&probe, &area, Some(location.as_str())) {
                Ok(()) => "ACCEPTED",
                Err(_) => "REJECTED",
            };
            Routed::Reply(Reply {
                lines: vec![format!("PROBE {probe} {area} {location} {verdict}")],
                config_changed: verdict == "ACCEPTED",
            })
        }
        SensorLine::Command(line) => match commands::handle(&mut monitor, &line) {
            Some(reply) => Routed::Reply(reply),
            None => Routed::Ignored,
        },
    }
}

/// Route a line, queue any reply and persist accepted configuration changes.
pub async fn dispatch(
    state: &AppState,
    tx: &mpsc::Sender<Outbound>,
    line: &str,
) -> Result<(), QueueClosed> {
    let Routed::Reply(reply) = route_line(state, line, OffsetDateTime::now_utc()).await else {
        return Ok(());
    };

    if reply.config_changed
        && state.persist_path().is_some()
        && let Err(e) = state.persist().await
    {
        warn!(error = %e, "Failed to persist configuration");
    }

    for line in reply.lines {
        tx.send(Outbound::Reply(line)).await.map_err(|_| QueueClosed)?;
    }
    Ok(())
}
