//! Baseline vs live range selection.
//!
//! Two different "range" notions exist:
//!
//! - [`effective_range`] picks the range reported to operators: the static
//!   baseline or the live extrema, with the near-threshold switch at
//!   [`BASELINE_NEAR_FRACTION`] of the baseline maximum.
//! - [`RangeMax::resolve`] picks the maximum that fractional thresholds scale
//!   against: override, then live maximum, then the metric's scale maximum.

use serde::{Deserialize, Serialize};

use envmon_types::{AreaConfig, BASELINE_NEAR_FRACTION, Metric};

use crate::extrema::AreaExtrema;

/// Range reported for one metric of one area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveRange {
    /// Lower end.
    pub min: f64,
    /// Upper end.
    pub max: f64,
    /// Whether the area is in baseline mode. Stays `true` when the live range
    /// is reported because readings came near the baseline maximum.
    pub using_baseline: bool,
}

impl EffectiveRange {
    /// Position of `value` within the range as a percentage of `max`.
    ///
    /// Denominators `<= 0` are replaced by 1.
    pub fn percent_of_range(&self, value: f64) -> f64 {
        value / denominator(self.max) * 100.0
    }
}

/// Select the range to report for a metric.
///
/// ```
/// use envmon_core::{AreaExtrema, effective_range};
/// use envmon_types::{AreaConfig, Metric};
///
/// let area = AreaConfig::new("floor11");
/// let mut extrema = AreaExtrema::default();
/// extrema.observe(Metric::Co2, 500.0);
/// extrema.observe(Metric::Co2, 950.0);
///
/// let range = effective_range(&area, &extrema, Metric::Co2);
/// assert_eq!((range.min, range.max), (500.0, 950.0));
/// assert!(range.using_baseline);
/// ```
pub fn effective_range(area: &AreaConfig, extrema: &AreaExtrema, metric: Metric) -> EffectiveRange {
    let baseline = metric.baseline_range();
    let live = extrema.get(metric);

    let (min, max) = match live {
        Some(live) if !area.use_baseline => (live.min, live.max),
        Some(live) if live.max >= BASELINE_NEAR_FRACTION * baseline.max => (live.min, live.max),
        _ => (baseline.min, baseline.max),
    };

    EffectiveRange {
        min,
        max,
        using_baseline: area.use_baseline,
    }
}

/// Replace a non-positive denominator by 1.
pub fn denominator(max: f64) -> f64 {
    if max > 0.0 { max } else { 1.0 }
}

/// Maximum that fractional threshold slots scale against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeMaxSource {
    /// Operator override.
    Override,
    /// Live running maximum.
    Live,
    /// Static metric scale maximum.
    Scale,
}

/// Resolved range maximum and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeMax {
    /// The value; always `> 0`.
    pub value: f64,
    /// Source of the value.
    pub source: RangeMaxSource,
}

impl RangeMax {
    /// Resolve: override max if set and `> 0`, else live max if `> 0`, else
    /// the metric's scale maximum.
    pub fn resolve(area: &AreaConfig, extrema: &AreaExtrema, metric: Metric) -> Self {
        if let Some(value) = area.override_max.filter(|v| *v > 0.0) {
            return Self {
                value,
                source: RangeMaxSource::Override,
            };
        }
        if let Some(value) = extrema.get(metric).map(|e| e.max).filter(|v| *v > 0.0) {
            return Self {
                value,
                source: RangeMaxSource::Live,
            };
        }
        Self {
            value: metric.scale_max(),
            source: RangeMaxSource::Scale,
        }
    }
}
