//! Error types for envmon-core.
//!
//! The engine itself never fails on telemetry content; malformed fields are
//! dropped during parsing. Errors surface from lookups of unknown areas or
//! probes, from configuration changes that are out of range, and from the
//! probe table being full under [`crate::ProbePolicy::Reject`].
//!
//! | Error | Typical source |
//! |-------|----------------|
//! | [`Error::AreaNotFound`] | Query or setter naming an area that is not configured |
//! | [`Error::ProbeNotFound`] | History query for a probe that never reported |
//! | [`Error::ProbeCapacity`] | New probe while the probe table is full |
//! | [`Error::InvalidThresholdSlot`] | Slot index outside `1..=6` |
//! | [`Error::InvalidConfig`] | Duplicate area names and similar |
//! | [`Error::Parse`] | Telemetry or token parsing |

use thiserror::Error;

/// Errors returned by the envmon engine.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// No area with this name is configured.
    #[error("Area not found: {0}")]
    AreaNotFound(String),

    /// No history exists for this probe.
    #[error("Probe not found: {0}")]
    ProbeNotFound(String),

    /// The probe table is full and the policy rejects new probes.
    #[error("Probe table full ({capacity} probes), rejecting {probe}")]
    ProbeCapacity {
        /// The probe that could not be admitted.
        probe: String,
        /// Configured table capacity.
        capacity: usize,
    },

    /// Threshold slot index outside `1..=6`.
    #[error("Invalid threshold slot {0} (expected 1-6)")]
    InvalidThresholdSlot(usize),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Parsing failed.
    #[error(transparent)]
    Parse(#[from] envmon_types::ParseError),
}

impl Error {
    /// Create an area-not-found error.
    pub fn area_not_found(name: impl Into<String>) -> Self {
        Error::AreaNotFound(name.into())
    }

    /// Create a probe-not-found error.
    pub fn probe_not_found(probe: impl Into<String>) -> Self {
        Error::ProbeNotFound(probe.into())
    }

    /// Whether the error means a lookup target does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::AreaNotFound(_) | Error::ProbeNotFound(_))
    }
}

/// Result type alias using envmon-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
