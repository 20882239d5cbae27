//! Per-probe ring history.
//!
//! Every probe gets one fixed-capacity ring per metric holding the most recent
//! [`HISTORY_CAPACITY`] samples. Entries are created lazily on first
//! telemetry. The probe table itself is bounded; see [`ProbePolicy`] for what
//! happens when a new probe arrives at a full table.
//!
//! # Example
//!
//! ```
//! use envmon_core::HistoryStore;
//! use envmon_types::{Metric, ProbeId};
//! use time::OffsetDateTime;
//!
//! let mut store = HistoryStore::default();
//! let probe = ProbeId::new("A1");
//! for v in 0..12i32 {
//!     store.record(&probe, Metric::Co2, f64::from(v), OffsetDateTime::UNIX_EPOCH).unwrap();
//! }
//!
//! let recent: Vec<f64> = store.recent(&probe, Metric::Co2, 3).map(|s| s.value).collect();
//! assert_eq!(recent, vec![11.0, 10.0, 9.0]);
//! ```

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, warn};

use envmon_types::{HISTORY_CAPACITY, Metric, ParseError, ProbeId, Sample, Telemetry};

use crate::error::{Error, Result};

/// Default bound on the number of probes tracked at once.
pub const DEFAULT_MAX_PROBES: usize = 32;

/// What to do when telemetry arrives from a new probe while the table is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbePolicy {
    /// Drop the probe whose newest sample is the oldest, then admit.
    #[default]
    EvictStalest,
    /// Refuse the new probe.
    Reject,
}

/// Result of recording a sample or telemetry record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The probe was already tracked.
    Appended,
    /// The probe was new and fit into the table.
    Admitted,
    /// The probe was new and another probe was evicted to make room.
    Replaced {
        /// The probe whose history was dropped.
        evicted: ProbeId,
    },
}

/// Rolling samples of one probe.
#[derive(Debug, Clone, Default)]
pub struct ProbeHistory {
    rings: [VecDeque<Sample>; Metric::COUNT],
}

impl ProbeHistory {
    fn push(&mut self, sample: Sample) {
        let ring = &mut self.rings[sample.metric.index()];
        if ring.len() == HISTORY_CAPACITY {
            ring.pop_front();
        }
        ring.push_back(sample);
    }

    /// Up to `count` most recent samples of a metric, newest first.
    pub fn recent(
        &self,
        metric: Metric,
        count: usize,
    ) -> impl Iterator<Item = &Sample> + Clone + '_ {
        self.rings[metric.index()].iter().rev().take(count)
    }

    /// Number of stored samples for a metric.
    pub fn len(&self, metric: Metric) -> usize {
        self.rings[metric.index()].len()
    }

    /// Whether no samples are stored for any metric.
    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(VecDeque::is_empty)
    }

    /// Timestamp of the newest sample across all metrics.
    pub fn last_seen(&self) -> Option<OffsetDateTime> {
        self.rings
            .iter()
            .filter_map(|ring| ring.back().map(|s| s.timestamp))
            .max()
    }
}

/// Serializable view of one metric's ring, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricHistory {
    /// The metric.
    pub metric: Metric,
    /// Samples, oldest first.
    pub samples: Vec<Sample>,
}

/// Serializable view of a probe's whole history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeHistorySnapshot {
    /// The probe.
    pub probe: ProbeId,
    /// Newest sample across all metrics.
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_seen: Option<OffsetDateTime>,
    /// One entry per metric in index order; empty rings included.
    pub metrics: Vec<MetricHistory>,
}

/// Table of probe histories keyed by probe id.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    probes: HashMap<ProbeId, ProbeHistory>,
    max_probes: usize,
    policy: ProbePolicy,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PROBES, ProbePolicy::default())
    }
}

impl HistoryStore {
    /// Create a store bounded to `max_probes` (at least 1).
    pub fn new(max_probes: usize, policy: ProbePolicy) -> Self {
        Self {
            probes: HashMap::new(),
            max_probes: max_probes.max(1),
            policy,
        }
    }

    /// Maximum number of tracked probes.
    pub fn max_probes(&self) -> usize {
        self.max_probes
    }

    /// Policy applied at capacity.
    pub fn policy(&self) -> ProbePolicy {
        self.policy
    }

    /// Append one sample, evicting the oldest sample of that ring at capacity.
    pub fn record(
        &mut self,
        probe: &ProbeId,
        metric: Metric,
        value: f64,
        timestamp: OffsetDateTime,
    ) -> Result<RecordOutcome> {
        if !value.is_finite() {
            return Err(ParseError::InvalidData(format!(
                "non-finite {metric} value from {probe}"
            ))
            .into());
        }
        let outcome = self.admit(probe)?;
        if let Some(history) = self.probes.get_mut(probe) {
            history.push(Sample {
                metric,
                value,
                timestamp,
            });
        }
        Ok(outcome)
    }

    /// Record every metric present in a telemetry record.
    pub fn record_telemetry(&mut self, telemetry: &Telemetry) -> Result<RecordOutcome> {
        let outcome = self.admit(&telemetry.probe)?;
        if let Some(history) = self.probes.get_mut(&telemetry.probe) {
            for (metric, value) in telemetry.values.iter() {
                history.push(Sample {
                    metric,
                    value,
                    timestamp: telemetry.received_at,
                });
            }
        }
        Ok(outcome)
    }

    fn admit(&mut self, probe: &ProbeId) -> Result<RecordOutcome> {
        if self.probes.contains_key(probe) {
            return Ok(RecordOutcome::Appended);
        }

        if self.probes.len() < self.max_probes {
            debug!(probe = %probe, "Tracking new probe");
            self.probes.insert(probe.clone(), ProbeHistory::default());
            return Ok(RecordOutcome::Admitted);
        }

        match self.policy {
            ProbePolicy::Reject => {
                warn!(probe = %probe, capacity = self.max_probes, "Probe table full, rejecting");
                Err(Error::ProbeCapacity {
                    probe: probe.to_string(),
                    capacity: self.max_probes,
                })
            }
            ProbePolicy::EvictStalest => {
                let stalest = self
                    .probes
                    .iter()
                    .min_by_key(|(id, history)| (history.last_seen(), (*id).clone()))
                    .map(|(id, _)| id.clone());
                let Some(evicted) = stalest else {
                    return Err(Error::InvalidConfig("probe table has no capacity".into()));
                };
                self.probes.remove(&evicted);
                self.probes.insert(probe.clone(), ProbeHistory::default());
                warn!(probe = %probe, evicted = %evicted, "Probe table full, evicted stalest probe");
                Ok(RecordOutcome::Replaced { evicted })
            }
        }
    }

    /// Up to `count` most recent samples, newest first.
    ///
    /// Unknown probes and empty rings yield an empty iterator.
    pub fn recent<'a>(
        &'a self,
        probe: &ProbeId,
        metric: Metric,
        count: usize,
    ) -> impl Iterator<Item = &'a Sample> + Clone + 'a {
        self.probes
            .get(probe)
            .into_iter()
            .flat_map(move |history| history.recent(metric, count))
    }

    /// History of one probe.
    pub fn probe(&self, probe: &ProbeId) -> Option<&ProbeHistory> {
        self.probes.get(probe)
    }

    /// Serializable copy of one probe's history.
    pub fn snapshot(&self, probe: &ProbeId) -> Option<ProbeHistorySnapshot> {
        self.probes.get(probe).map(|history| ProbeHistorySnapshot {
            probe: probe.clone(),
            last_seen: history.last_seen(),
            metrics: Metric::ALL
                .into_iter()
                .map(|metric| MetricHistory {
                    metric,
                    samples: history.rings[metric.index()].iter().copied().collect(),
                })
                .collect(),
        })
    }

    /// Forget a probe. Returns whether it was tracked.
    pub fn remove(&mut self, probe: &ProbeId) -> bool {
        self.probes.remove(probe).is_some()
    }

    /// Number of tracked probes.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Whether no probe is tracked.
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Tracked probe ids, sorted.
    pub fn probe_ids(&self) -> Vec<ProbeId> {
        let mut ids: Vec<ProbeId> = self.probes.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use time::Duration;

    fn at(secs: i64) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + Duration::seconds(secs)
    }

    fn values(store: &HistoryStore, probe: &ProbeId, metric: Metric, count: usize) -> Vec<f64> {
        store.recent(probe, metric, count).map(|s| s.value).collect()
    }

    #[test]
    fn test_ring_evicts_oldest() {
        let mut store = HistoryStore::default();
        let probe = ProbeId::new("P1");
        for v in 1..=11i32 {
            store.record(&probe, Metric::Co2, f64::from(v), at(i64::from(v))).unwrap();
        }

        let recent = values(&store, &probe, Metric::Co2, 10);
        assert_eq!(recent, (2..=11).rev().map(f64::from).collect::<Vec<_>>());
        assert_eq!(store.probe(&probe).unwrap().len(Metric::Co2), HISTORY_CAPACITY);
    }

    #[test]
    fn test_recent_count_larger_than_len() {
        let mut store = HistoryStore::default();
        let probe = ProbeId::new("P1");
        store.record(&probe, Metric::Humidity, 40.0, at(0)).unwrap();
        store.record(&probe, Metric::Humidity, 41.0, at(1)).unwrap();

        assert_eq!(values(&store, &probe, Metric::Humidity, 50), vec![41.0, 40.0]);
        assert!(values(&store, &probe, Metric::Co2, 5).is_empty());
    }

    #[test]
    fn test_recent_unknown_probe_is_empty() {
        let store = HistoryStore::default();
        assert_eq!(store.recent(&ProbeId::new("NOPE"), Metric::Co2, 10).count(), 0);
    }

    #[test]
    fn test_recent_is_restartable() {
        let mut store = HistoryStore::default();
        let probe = ProbeId::new("P1");
        store.record(&probe, Metric::Co2, 1.0, at(0)).unwrap();
        store.record(&probe, Metric::Co2, 2.0, at(1)).unwrap();

        let iter = store.recent(&probe, Metric::Co2, 2);
        let first: Vec<f64> = iter.clone().map(|s| s.value).collect();
        let second: Vec<f64> = iter.map(|s| s.value).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_record_rejects_non_finite() {
        let mut store = HistoryStore::default();
        let result = store.record(&ProbeId::new("P1"), Metric::Co2, f64::NAN, at(0));
        assert!(matches!(result, Err(Error::Parse(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_record_telemetry_all_metrics() {
        let mut store = HistoryStore::default();
        let telemetry = Telemetry::new("p1", at(5))
            .with(Metric::Co2, 800.0)
            .with(Metric::Temperature, 21.5);

        assert_eq!(store.record_telemetry(&telemetry).unwrap(), RecordOutcome::Admitted);
        assert_eq!(store.record_telemetry(&telemetry).unwrap(), RecordOutcome::Appended);

        let probe = ProbeId::new("P1");
        assert_eq!(values(&store, &probe, Metric::Co2, 10), vec![800.0, 800.0]);
        assert_eq!(values(&store, &probe, Metric::Temperature, 10).len(), 2);
        assert!(values(&store, &probe, Metric::SoundLevel, 10).is_empty());
        assert_eq!(store.probe(&probe).unwrap().last_seen(), Some(at(5)));
    }

    #[test]
    fn test_capacity_evicts_stalest() {
        let mut store = HistoryStore::new(2, ProbePolicy::EvictStalest);
        store.record(&ProbeId::new("OLD"), Metric::Co2, 1.0, at(0)).unwrap();
        store.record(&ProbeId::new("NEW"), Metric::Co2, 1.0, at(10)).unwrap();

        let outcome = store.record(&ProbeId::new("THIRD"), Metric::Co2, 1.0, at(20)).unwrap();
        assert_eq!(
            outcome,
            RecordOutcome::Replaced {
                evicted: ProbeId::new("OLD")
            }
        );
        assert_eq!(store.probe_ids(), vec![ProbeId::new("NEW"), ProbeId::new("THIRD")]);
    }

    #[test]
    fn test_capacity_reject() {
        let mut store = HistoryStore::new(1, ProbePolicy::Reject);
        store.record(&ProbeId::new("A"), Metric::Co2, 1.0, at(0)).unwrap();

        let err = store.record(&ProbeId::new("B"), Metric::Co2, 1.0, at(1)).unwrap_err();
        assert_eq!(
            err,
            Error::ProbeCapacity {
                probe: "B".into(),
                capacity: 1
            }
        );
        // Existing probes keep recording.
        assert!(store.record(&ProbeId::new("A"), Metric::Co2, 2.0, at(2)).is_ok());
    }

    #[test]
    fn test_snapshot_oldest_first() {
        let mut store = HistoryStore::default();
        let probe = ProbeId::new("P1");
        store.record(&probe, Metric::Co2, 1.0, at(0)).unwrap();
        store.record(&probe, Metric::Co2, 2.0, at(1)).unwrap();

        let snapshot = store.snapshot(&probe).unwrap();
        assert_eq!(snapshot.metrics.len(), Metric::COUNT);
        let co2: Vec<f64> = snapshot.metrics[0].samples.iter().map(|s| s.value).collect();
        assert_eq!(co2, vec![1.0, 2.0]);
        assert!(snapshot.metrics[1].samples.is_empty());
        assert!(serde_json::to_string(&snapshot).is_ok());
        assert!(store.snapshot(&ProbeId::new("X")).is_none());
    }

    #[test]
    fn test_remove_probe() {
        let mut store = HistoryStore::default();
        let probe = ProbeId::new("P1");
        store.record(&probe, Metric::Co2, 1.0, at(0)).unwrap();
        assert!(store.remove(&probe));
        assert!(!store.remove(&probe));
        assert!(store.is_empty());
    }

    proptest! {
        #[test]
        fn ring_never_exceeds_capacity(values in proptest::collection::vec(-1.0e4f64..1.0e4, 0..40)) {
            let mut store = HistoryStore::default();
            let probe = ProbeId::new("P");
            for (i, v) in values.iter().enumerate() {
                store.record(&probe, Metric::Co2, *v, at(i as i64)).unwrap();
            }
            let recent: Vec<f64> = store.recent(&probe, Metric::Co2, usize::MAX).map(|s| s.value).collect();
            prop_assert!(recent.len() <= HISTORY_CAPACITY);
            let expected: Vec<f64> = values.iter().rev().take(HISTORY_CAPACITY).copied().collect();
            prop_assert_eq!(recent, expected);
        }

        #[test]
        fn table_never_exceeds_max_probes(ids in proptest::collection::vec(0u8..20, 0..60), max in 1usize..8) {
            let mut store = HistoryStore::new(max, ProbePolicy::EvictStalest);
            for (i, id) in ids.iter().enumerate() {
                store.record(&ProbeId::new(format!("P{id}")), Metric::Co2, 1.0, at(i as i64)).unwrap();
            }
            prop_assert!(store.len() <= max);
        }
    }
}
