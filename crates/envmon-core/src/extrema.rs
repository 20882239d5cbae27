//! Running per-area minimum and maximum of each metric.

use serde::{Deserialize, Serialize};

use envmon_types::Metric;

/// Observed minimum and maximum of one metric. Always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extrema {
    /// Smallest observed value.
    pub min: f64,
    /// Largest observed value.
    pub max: f64,
}

/// Running extrema of every metric of one area.
///
/// The first observation of a metric sets both bounds; later observations
/// only widen them. Bounds persist until [`AreaExtrema::reset`] or
/// [`AreaExtrema::reset_metric`].
///
/// ```
/// use envmon_core::AreaExtrema;
/// use envmon_types::Metric;
///
/// let mut extrema = AreaExtrema::default();
/// extrema.observe(Metric::Co2, 800.0);
/// extrema.observe(Metric::Co2, 650.0);
/// extrema.observe(Metric::Co2, 700.0);
///
/// let co2 = extrema.get(Metric::Co2).unwrap();
/// assert_eq!((co2.min, co2.max), (650.0, 800.0));
/// assert!(extrema.get(Metric::Humidity).is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaExtrema([Option<Extrema>; Metric::COUNT]);

impl AreaExtrema {
    /// Fold a value into the extrema of a metric.
    pub fn observe(&mut self, metric: Metric, value: f64) {
        debug_assert!(value.is_finite(), "non-finite value reached extrema");
        if !value.is_finite() {
            return;
        }
        let slot = &mut self.0[metric.index()];
        *slot = Some(match *slot {
            None => Extrema {
                min: value,
                max: value,
            },
            Some(e) => Extrema {
                min: e.min.min(value),
                max: e.max.max(value),
            },
        });
    }

    /// Extrema of a metric, `None` until the first observation.
    pub fn get(&self, metric: Metric) -> Option<Extrema> {
        self.0[metric.index()]
    }

    /// Clear all metrics.
    pub fn reset(&mut self) {
        self.0 = [None; Metric::COUNT];
    }

    /// Clear one metric.
    pub fn reset_metric(&mut self, metric: Metric) {
        self.0[metric.index()] = None;
    }
}
