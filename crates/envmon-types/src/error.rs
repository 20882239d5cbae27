//! Error types for data parsing in envmon-types.

use thiserror::Error;

/// Errors that can occur when parsing probe telemetry or configuration tokens.
///
/// This error type is transport-agnostic; it knows nothing about serial links
/// or files (those belong in envmon-service).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Generic malformed input.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A metric name that matches none of the known metrics or aliases.
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// An aggregation mode name that is neither average nor maximum.
    #[error("Unknown aggregation mode: {0}")]
    UnknownAggregationMode(String),

    /// A telemetry line without a `<PROBE>:` prefix.
    #[error("Telemetry line has no probe identifier")]
    MissingProbeId,

    /// A telemetry line where not a single metric could be parsed.
    #[error("Telemetry from {probe} contains no parseable metric")]
    NoMetrics {
        /// The probe that sent the line.
        probe: String,
    },

    /// A display level outside `0..=6`.
    #[error("Level {0} is out of range (0-6)")]
    LevelOutOfRange(u8),
}

/// Result type alias using envmon-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
