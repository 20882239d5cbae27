//! Combining the history of several probes into one value per area.

use core::fmt;

use serde::{Deserialize, Serialize};

use envmon_types::{AggregationConfig, AggregationMode, Metric, ProbeId};

use crate::history::HistoryStore;

/// Value of one metric for one area, or the absence of any data.
///
/// `NoData` is never treated as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Aggregate {
    /// Combined value.
    Value(f64),
    /// No bound probe has samples for the metric.
    #[default]
    NoData,
}

impl Aggregate {
    /// The value, if any.
    pub fn value(self) -> Option<f64> {
        match self {
            Aggregate::Value(v) => Some(v),
            Aggregate::NoData => None,
        }
    }

    /// Whether there is no data.
    pub fn is_no_data(self) -> bool {
        matches!(self, Aggregate::NoData)
    }
}

impl From<Option<f64>> for Aggregate {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Aggregate::NoData, Aggregate::Value)
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregate::Value(v) => write!(f, "{v:.2}"),
            Aggregate::NoData => f.write_str("NO_DATA"),
        }
    }
}

/// Aggregate one metric across the probes bound to an area.
///
/// Each probe contributes the mean of its `N` most recent samples, where `N`
/// is [`AggregationConfig::effective_window`]; probes without samples are
/// skipped. Contributions are combined by mean ([`AggregationMode::Average`])
/// or by taking the largest ([`AggregationMode::Maximum`]).
///
/// ```
/// use envmon_core::{Aggregate, HistoryStore, aggregate};
/// use envmon_types::{AggregationConfig, AggregationMode, Metric, ProbeId};
/// use time::OffsetDateTime;
///
/// let (a, b) = (ProbeId::new("A"), ProbeId::new("B"));
/// let mut store = HistoryStore::default();
/// let now = OffsetDateTime::UNIX_EPOCH;
/// store.record(&a, Metric::Co2, 10.0, now).unwrap();
/// store.record(&a, Metric::Co2, 20.0, now).unwrap();
/// store.record(&b, Metric::Co2, 30.0, now).unwrap();
///
/// let probes = [a, b];
/// let avg = AggregationConfig::new(AggregationMode::Average, 2);
/// let max = AggregationConfig::new(AggregationMode::Maximum, 2);
/// assert_eq!(aggregate(&store, &probes, Metric::Co2, &avg), Aggregate::Value(22.5));
/// assert_eq!(aggregate(&store, &probes, Metric::Co2, &max), Aggregate::Value(30.0));
/// ```
pub fn aggregate(
    history: &HistoryStore,
    probes: &[ProbeId],
    metric: Metric,
    config: &AggregationConfig,
) -> Aggregate {
    let window = config.effective_window();
    let probe_means = probes.iter().filter_map(|probe| {
        let (sum, count) = history
            .recent(probe, metric, window)
            .fold((0.0, 0usize), |(sum, count), s| (sum + s.value, count + 1));
        (count > 0).then(|| sum / count as f64)
    });

    match config.mode {
        AggregationMode::Average => {
            let (sum, count) = probe_means.fold((0.0, 0usize), |(sum, count), m| (sum + m, count + 1));
            Aggregate::from((count > 0).then(|| sum / count as f64))
        }
        AggregationMode::Maximum => Aggregate::from(probe_means.reduce(f64::max)),
    }
}
