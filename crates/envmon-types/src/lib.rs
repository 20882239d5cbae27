//! Platform-agnostic types for envmon building air-quality monitoring.
//!
//! This crate provides the shared data model used by the aggregation engine
//! (envmon-core) and the service binary (envmon-service).
//!
//! # Features
//!
//! - Metric identifiers with their baseline ranges and scale maxima
//! - Area configuration and threshold ladders
//! - Telemetry records and the probe line format
//! - Error types for data parsing
//!
//! # Example
//!
//! ```
//! use envmon_types::{AreaConfig, Metric, Telemetry};
//! use time::OffsetDateTime;
//!
//! let area = AreaConfig::new("floor11").with_probe("a4b2");
//! assert!(area.measures(Metric::Co2));
//!
//! let telemetry = Telemetry::parse_line("A4B2: CO2:812", OffsetDateTime::UNIX_EPOCH).unwrap();
//! assert_eq!(telemetry.probe, area.probes[0]);
//! ```

pub mod error;
pub mod telemetry;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use telemetry::{MetricValues, Telemetry};
pub use types::{
    AggregationConfig, AggregationMode, AreaConfig, BASELINE_NEAR_FRACTION, BaselineRange, Bound,
    HISTORY_CAPACITY, LADDER_SLOTS, Level, Metric, ProbeId, Sample, ThresholdLadder,
    ThresholdSlot, Thresholds, UNUSED_SLOT, normalize_name,
};
