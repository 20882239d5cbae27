//! Tick scheduler, command protocol and indicator output for envmon.
//!
//! This crate wires the [`envmon_core::Monitor`] into a running service that:
//! - Reads probe telemetry and operator commands, one per line
//! - Recomputes every area on a fast tick and queues indicator updates
//! - Emits a diagnostic summary on a slow tick
//! - Writes outbound lines through a paced emitter
//! - Optionally writes accepted configuration changes back to disk
//!
//! # Line Protocol
//!
//! Inbound:
//!
//! - `A4B2: CO2:812,Temp:22.4,Hum:41,Sound:55` - telemetry
//! - `A4B2 SET PROBE POOL DEEP END` - probe self-assignment
//! - `GET AREAS`, `SET THRESHOLD POOL CO2 6 1400`, ... - see [`commands`]
//!
//! Outbound:
//!
//! - `POOL 6*` - indicator level, `*` marks the highlighted area
//! - `[LEDS] Pixels: FLOOR11:4, POOL:6` - diagnostic summary
//! - command replies
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/envmon/config.toml`:
//!
//! ```toml
//! display_metric = "CO2"
//!
//! [scheduler]
//! tick_interval_ms = 1000
//! diagnostic_interval_secs = 300
//! emit_pacing_ms = 10
//!
//! [aggregation]
//! mode = "average"
//! window = 10
//!
//! [history]
//! max_probes = 32
//! policy = "evict_stalest"
//!
//! [[areas]]
//! name = "FLOOR11"
//! location = "NORTH"
//! probes = ["A1B2"]
//! ```

pub mod commands;
pub mod config;
pub mod emitter;
pub mod input;
pub mod scheduler;
pub mod simulator;
pub mod state;

pub use commands::{Command, CommandError, Reply};
pub use config::{Config, ConfigError, HistoryConfig, SchedulerConfig, ValidationError};
pub use emitter::{Emitter, LineSink, Outbound, WriterSink};
pub use input::{Routed, SensorLine, dispatch, route_line};
pub use scheduler::{QueueClosed, Scheduler};
pub use state::AppState;
