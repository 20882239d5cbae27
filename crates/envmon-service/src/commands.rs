//! Text command protocol.
//!
//! Commands arrive one per line, case-insensitive, optionally prefixed with
//! the short name of the relaying node (`A4B2: GET AREAS`). Every command
//! produces zero or more reply lines:
//!
//! | Command | Reply |
//! |---------|-------|
//! | `GET AREAS` | `AREA: <NAME> <LOC> <PROBES>` per area |
//! | `GET STATS` | `STAT: <NAME> <METRIC> min:.. max:.. min_o:.. max_o:.. baseline:..` per area and metric |
//! | `GET THRESHOLD` | `THRESHOLD <NAME> <METRIC> v1 .. v6` per area and metric |
//! | `GET USE_BASELINE <area>` | `USE_BASELINE <AREA> True\|False` or `NOT_FOUND` |
//! | `SET USE_BASELINE <area> <bool>` | `USE_BASELINE <AREA> <B> ACCEPTED` or `REJECTED` |
//! | `SET OVERRIDE <area> MIN\|MAX <v>` | `OVERRIDE <AREA> MIN <v> ACCEPTED` or `REJECTED` |
//! | `SET THRESHOLD <area> <metric> <1-6> <v>` | `THRESHOLD <AREA> <METRIC> <n> <v> ACCEPTED` or `REJECTED` |
//! | `SET PROBES <probe> <area> <loc>` | `PROBES <P> <A> <L> ACCEPTED` or `REJECTED` |
//! | `REMOVE PROBE <probe>` | `PROBE <P> REMOVED` or `NOT_FOUND` |
//! | `SET AGGREGATE MODE AVG\|MAX` | `AGGREGATE MODE <M> ACCEPTED` |
//! | `SET AGGREGATE N <1-10>` | `AGGREGATE N <n> ACCEPTED` or `REJECTED` |
//! | `GET AGGREGATE` | `AGGREGATE MODE <M> N <n>` |
//! | `SET DISPLAY <metric>` | `DISPLAY <METRIC> ACCEPTED` |
//! | `GET HISTORY <probe>` | probe history as JSON, or `HISTORY <P> NOT_FOUND` |
//! | `GET STATUS` | area status as JSON |
//! | `RESET EXTREMA <area>` | `EXTREMA <AREA> RESET` or `NOT_FOUND` |
//! | `SET TEST_MODE ON\|OFF` | `TEST_MODE ON\|OFF ACCEPTED` |
//!
//! Anything else is answered with `ERR: Unrecognized command: <line>`.

use core::str::FromStr;

use serde::Serialize;
use tracing::{debug, warn};

use envmon_core::{AggregationMode, Area, Bound, Metric, Monitor, ProbeId};
use envmon_types::{LADDER_SLOTS, normalize_name};

/// Longest relay short name that is stripped from the front of a command.
pub const MAX_SHORT_NAME_LEN: usize = 6;

/// Command parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Nothing left after trimming and prefix removal.
    #[error("empty command")]
    Empty,
    /// The line matches no command.
    #[error("unrecognized command: {0}")]
    Unrecognized(String),
}

impl CommandError {
    /// Reply line sent back for this error.
    pub fn reply_line(&self) -> Option<String> {
        match self {
            CommandError::Empty => None,
            CommandError::Unrecognized(line) => Some(format!("ERR: Unrecognized command: {line}")),
        }
    }
}

/// A parsed command. Names and ids are normalized to upper case.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    GetAreas,
    GetStats,
    GetThreshold,
    GetUseBaseline { area: String },
    SetUseBaseline { area: String, enabled: bool },
    SetOverride { area: String, bound: Bound, value: f64 },
    SetThreshold { area: String, metric: Metric, slot: usize, value: f64 },
    SetProbes { probe: ProbeId, area: String, location: String },
    RemoveProbe { probe: ProbeId },
    SetAggregateMode(AggregationMode),
    SetAggregateWindow(usize),
    GetAggregate,
    SetDisplayMetric(Metric),
    GetHistory { probe: ProbeId },
    GetStatus,
    ResetExtrema { area: String },
    SetTestMode(bool),
}

/// Reply to one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Lines to send back, in order.
    pub lines: Vec<String>,
    /// Whether the command changed persistent configuration.
    pub config_changed: bool,
}

impl Reply {
    fn line(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            config_changed: false,
        }
    }

    fn changed(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            config_changed: true,
        }
    }

    fn lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            config_changed: false,
        }
    }
}

/// Split off a relay short-name prefix such as `A4B2:`.
///
/// The prefix is recognized when a colon appears within the first
/// [`MAX_SHORT_NAME_LEN`] characters and what precedes it is not `SET` or
/// `GET`. Returns the prefix, if any, and the trimmed remainder.
///
/// ```
/// use envmon_service::commands::strip_short_name;
///
/// assert_eq!(strip_short_name("A4B2: GET AREAS"), (Some("A4B2"), "GET AREAS"));
/// assert_eq!(strip_short_name("GET AREAS"), (None, "GET AREAS"));
/// ```
pub fn strip_short_name(line: &str) -> (Option<&str>, &str) {
    let line = line.trim();
    match line.find(':') {
        Some(colon @ 1..=MAX_SHORT_NAME_LEN) => {
            let prefix = &line[..colon];
            if prefix.eq_ignore_ascii_case("SET") || prefix.eq_ignore_ascii_case("GET") {
                (None, line)
            } else {
                (Some(prefix), line[colon + 1..].trim())
            }
        }
        _ => (None, line),
    }
}

fn parse_flag(token: &str) -> Option<bool> {
    match token {
        "TRUE" | "1" | "ON" => Some(true),
        "FALSE" | "0" | "OFF" => Some(false),
        _ => None,
    }
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }
        let unrecognized = || CommandError::Unrecognized(line.to_string());

        let upper: Vec<String> = line.split_whitespace().map(normalize_name).collect();
        let words: Vec<&str> = upper.iter().map(String::as_str).collect();
        let join = |from: usize, to: usize| words[from..to].join(" ");

        let command = match words.as_slice() {
            ["GET", "AREAS"] => Command::GetAreas,
            ["GET", "STATS", ..] => Command::GetStats,
            ["GET", "THRESHOLD" | "THRESHOLDS", ..] => Command::GetThreshold,
            ["GET", "USE_BASELINE", _, ..] => Command::GetUseBaseline {
                area: join(2, words.len()),
            },
            ["SET", "USE_BASELINE", _, .., flag] => Command::SetUseBaseline {
                area: join(2, words.len() - 1),
                enabled: parse_flag(flag).ok_or_else(unrecognized)?,
            },
            ["SET", "OVERRIDE", _, .., bound, value] => Command::SetOverride {
                area: join(2, words.len() - 2),
                bound: match *bound {
                    "MIN" => Bound::Min,
                    "MAX" => Bound::Max,
                    _ => return Err(unrecognized()),
                },
                value: parse_number(value).ok_or_else(unrecognized)?,
            },
            ["SET", "THRESHOLD", area, metric, slot, value] => {
                let slot = slot
                    .parse::<usize>()
                    .ok()
                    .filter(|s| (1..=LADDER_SLOTS).contains(s))
                    .ok_or_else(unrecognized)?;
                Command::SetThreshold {
                    area: area.to_string(),
                    metric: metric.parse().map_err(|_| unrecognized())?,
                    slot,
                    value: parse_number(value).ok_or_else(unrecognized)?,
                }
            }
            ["SET", "PROBES", probe, area, _, ..] => Command::SetProbes {
                probe: ProbeId::new(probe),
                area: area.to_string(),
                location: join(4, words.len()),
            },
            ["REMOVE", "PROBE", probe] => Command::RemoveProbe {
                probe: ProbeId::new(probe),
            },
            ["SET", "AGGREGATE", "MODE", mode] => {
                Command::SetAggregateMode(mode.parse().map_err(|_| unrecognized())?)
            }
            ["SET", "AGGREGATE", "N", n] => {
                Command::SetAggregateWindow(n.parse().map_err(|_| unrecognized())?)
            }
            ["GET", "AGGREGATE"] => Command::GetAggregate,
            ["SET", "DISPLAY", metric] => {
                Command::SetDisplayMetric(metric.parse().map_err(|_| unrecognized())?)
            }
            ["GET", "HISTORY", probe] => Command::GetHistory {
                probe: ProbeId::new(probe),
            },
            ["GET", "STATUS"] => Command::GetStatus,
            ["RESET", "EXTREMA", _, ..] => Command::ResetExtrema {
                area: join(2, words.len()),
            },
            ["SET", "TEST_MODE", flag] => {
                Command::SetTestMode(parse_flag(flag).ok_or_else(unrecognized)?)
            }
            _ => return Err(unrecognized()),
        };
        Ok(command)
    }
}

fn title_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn json_line<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("ERR: {e}"))
}

/// `AREA:` line of one area.
fn area_line(area: &Area) -> String {
    let config = area.config();
    let location = if config.location.is_empty() {
        "-"
    } else {
        config.location.as_str()
    };
    let probes = if config.probes.is_empty() {
        "-".to_string()
    } else {
        config
            .probes
            .iter()
            .map(ProbeId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    };
    format!("AREA: {} {} {}", area.name(), location, probes)
}

/// `STAT:` line of one area and metric: the reported range, both overrides
/// (`-1.00` when unset) and the baseline flag.
pub fn stat_line(area: &Area, metric: Metric) -> String {
    let range = area.effective_range(metric);
    let config = area.config();
    format!(
        "STAT: {} {} min:{:.2} max:{:.2} min_o:{:.2} max_o:{:.2} baseline:{}",
        area.name(),
        metric,
        range.min,
        range.max,
        config.override_or_unset(Bound::Min),
        config.override_or_unset(Bound::Max),
        config.use_baseline,
    )
}

fn threshold_line(area: &Area, metric: Metric) -> String {
    let mut line = format!("THRESHOLD {} {}", area.name(), metric);
    for value in area.config().thresholds.ladder(metric).raw() {
        line.push_str(&format!(" {value:.2}"));
    }
    line
}

impl Command {
    /// Apply the command to the monitor and build the reply.
    pub fn execute(&self, monitor: &mut Monitor) -> Reply {
        debug!(command = ?self, "Executing command");
        match self {
            Command::GetAreas => Reply::lines(monitor.areas().map(area_line).collect()),
            Command::GetStats => Reply::lines(
                monitor
                    .areas()
                    .flat_map(|area| Metric::ALL.map(|metric| stat_line(area, metric)))
                    .collect(),
            ),
            Command::GetThreshold => Reply::lines(
                monitor
                    .areas()
                    .flat_map(|area| Metric::ALL.map(|metric| threshold_line(area, metric)))
                    .collect(),
            ),
            Command::GetUseBaseline { area } => match monitor.use_baseline(area) {
                Ok(enabled) => Reply::line(format!("USE_BASELINE {area} {}", title_bool(enabled))),
                Err(_) => Reply::line(format!("USE_BASELINE {area} NOT_FOUND")),
            },
            Command::SetUseBaseline { area, enabled } => {
                match monitor.set_use_baseline(area, *enabled) {
                    Ok(()) => Reply::changed(format!(
                        "USE_BASELINE {area} {} ACCEPTED",
                        title_bool(*enabled)
                    )),
                    Err(_) => Reply::line(format!("USE_BASELINE {area} REJECTED")),
                }
            }
            Command::SetOverride { area, bound, value } => {
                match monitor.set_override(area, *bound, *value) {
                    Ok(()) => Reply::changed(format!("OVERRIDE {area} {bound} {value:.2} ACCEPTED")),
                    Err(_) => Reply::line(format!("OVERRIDE {area} REJECTED")),
                }
            }
            Command::SetThreshold {
                area,
                metric,
                slot,
                value,
            } => match monitor.set_threshold(area, *metric, *slot, *value) {
                Ok(()) => Reply::changed(format!(
                    "THRESHOLD {area} {metric} {slot} {value:.2} ACCEPTED"
                )),
                Err(_) => Reply::line(format!("THRESHOLD {area} REJECTED")),
            },
            Command::SetProbes {
                probe,
                area,
                location,
            } => match monitor.bind_probe(probe, area, Some(location.as_str())) {
                Ok(()) => Reply::changed(format!("PROBES {probe} {area} {location} ACCEPTED")),
                Err(_) => Reply::line(format!("PROBES {probe} {area} {location} REJECTED")),
            },
            Command::RemoveProbe { probe } => {
                if monitor.remove_probe(probe) {
                    Reply::changed(format!("PROBE {probe} REMOVED"))
                } else {
                    Reply::line(format!("PROBE {probe} NOT_FOUND"))
                }
            }
            Command::SetAggregateMode(mode) => {
                monitor.set_aggregation_mode(*mode);
                Reply::changed(format!("AGGREGATE MODE {mode} ACCEPTED"))
            }
            Command::SetAggregateWindow(window) => match monitor.set_aggregation_window(*window) {
                Ok(()) => Reply::changed(format!("AGGREGATE N {window} ACCEPTED")),
                Err(_) => Reply::line(format!("AGGREGATE N {window} REJECTED")),
            },
            Command::GetAggregate => {
                let config = monitor.aggregation();
                Reply::line(format!("AGGREGATE MODE {} N {}", config.mode, config.window))
            }
            Command::SetDisplayMetric(metric) => {
                monitor.set_display_metric(*metric);
                Reply::changed(format!("DISPLAY {metric} ACCEPTED"))
            }
            Command::GetHistory { probe } => match monitor.probe_history(probe) {
                Ok(snapshot) => Reply::line(json_line(&snapshot)),
                Err(_) => Reply::line(format!("HISTORY {probe} NOT_FOUND")),
            },
            Command::GetStatus => Reply::line(json_line(&monitor.status())),
            Command::ResetExtrema { area } => match monitor.reset_extrema(area) {
                Ok(()) => Reply::line(format!("EXTREMA {area} RESET")),
                Err(_) => Reply::line(format!("EXTREMA {area} NOT_FOUND")),
            },
            Command::SetTestMode(enabled) => {
                monitor.set_test_mode(*enabled);
                let state = if *enabled { "ON" } else { "OFF" };
                Reply::line(format!("TEST_MODE {state} ACCEPTED"))
            }
        }
    }
}

/// Parse and execute one command line.
///
/// Returns `None` for blank lines. Unrecognized commands are logged and
/// answered with an `ERR:` line.
pub fn handle(monitor: &mut Monitor, line: &str) -> Option<Reply> {
    let (prefix, body) = strip_short_name(line);
    if let Some(prefix) = prefix {
        debug!(prefix, "Stripped short-name prefix");
    }

    match body.parse::<Command>() {
        Ok(command) => Some(command.execute(monitor)),
        Err(e) => {
            let reply = e.reply_line()?;
            warn!(line = body, "Unrecognized command");
            Some(Reply::line(reply))
        }
    }
}
