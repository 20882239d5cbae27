//! Telemetry aggregation and threshold mapping engine for envmon.
//!
//! This crate turns raw probe telemetry into one indicator level per area.
//! Probes are grouped into named areas; each area combines the recent history
//! of its probes into one value per metric, maps the display metric through a
//! six-slot threshold ladder to a level from 0 to 6, and at most one area at
//! the top level is highlighted.
//!
//! # Features
//!
//! - **Ring history**: last 10 samples per probe and metric, bounded probe table
//! - **Extrema**: running per-area min/max, reset on request
//! - **Aggregation**: average or maximum of per-probe window means
//! - **Range selection**: static baseline vs live range for reporting
//! - **Level mapping**: absolute and fractional slots, last passing slot wins
//! - **Highlight**: normalized severity across metrics, stable tie-break
//! - **Simulation**: random-walk probes for demos and tests
//!
//! # Pipeline
//!
//! | Stage | Module | Runs on |
//! |-------|--------|---------|
//! | Record samples | [`history`] | every telemetry record |
//! | Update min/max | [`extrema`] | every telemetry record |
//! | Combine probes | [`aggregate`](mod@aggregate) | every tick |
//! | Map to level | [`thresholds`] | every tick |
//! | Pick highlight | [`highlight`] | every tick |
//!
//! # Quick Start
//!
//! ```
//! use envmon_core::{Monitor, MonitorConfig};
//! use envmon_types::{AreaConfig, Telemetry};
//! use time::OffsetDateTime;
//!
//! let mut monitor = Monitor::new(MonitorConfig {
//!     areas: vec![
//!         AreaConfig::new("POOL").with_probe("P1"),
//!         AreaConfig::new("TEAROOM").with_probe("P2"),
//!     ],
//!     ..MonitorConfig::default()
//! })?;
//!
//! let now = OffsetDateTime::now_utc();
//! monitor.ingest(&Telemetry::parse_line("P1: CO2:1500", now)?)?;
//! monitor.ingest(&Telemetry::parse_line("P2: CO2:1900", now)?)?;
//!
//! for update in monitor.tick_at(now).updates {
//!     println!("{update}"); // "POOL 6", then "TEAROOM 6*"
//! }
//! # Ok::<(), envmon_core::Error>(())
//! ```

pub mod aggregate;
pub mod area;
pub mod error;
pub mod extrema;
pub mod highlight;
pub mod history;
pub mod indicator;
pub mod mock;
pub mod monitor;
pub mod range;
pub mod thresholds;

// Re-export types from envmon-types
pub use envmon_types::{
    AggregationConfig, AggregationMode, AreaConfig, Bound, Level, Metric, ParseError, ProbeId,
    Telemetry, ThresholdLadder,
};

pub use aggregate::{Aggregate, aggregate};
pub use area::{Area, AreaState};
pub use error::{Error, Result};
pub use extrema::{AreaExtrema, Extrema};
pub use highlight::{HighlightCandidate, select_highlight, severity_score};
pub use history::{
    DEFAULT_MAX_PROBES, HistoryStore, MetricHistory, ProbeHistory, ProbeHistorySnapshot,
    ProbePolicy, RecordOutcome,
};
pub use indicator::{DiagnosticSummary, IndicatorUpdate};
pub use mock::{MockProbe, MockProbeBuilder};
pub use monitor::{
    AreaStatus, DEFAULT_AREA_NAMES, MetricStatus, Monitor, MonitorConfig, TEST_MODE_STEP_SECS,
    TickReport, default_areas,
};
pub use range::{EffectiveRange, RangeMax, RangeMaxSource, denominator, effective_range};
pub use thresholds::{level_for, level_for_aggregate};
