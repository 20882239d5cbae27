//! Runtime state of one configured area.

use serde::Serialize;

use envmon_types::{AggregationConfig, AreaConfig, Level, Metric, Telemetry};

use crate::aggregate::{Aggregate, aggregate};
use crate::extrema::AreaExtrema;
use crate::highlight::severity_score;
use crate::history::HistoryStore;
use crate::range::{EffectiveRange, RangeMax, effective_range};
use crate::thresholds::level_for_aggregate;

/// Results of the latest tick for one area. Fully recomputed every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AreaState {
    /// Aggregate per metric, indexed by [`Metric::index`].
    pub aggregates: [Aggregate; Metric::COUNT],
    /// Level per metric; `None` where the aggregate is `NoData`.
    pub levels: [Option<Level>; Metric::COUNT],
    /// Level of the display metric.
    pub level: Option<Level>,
    /// Whether this area holds the highlight.
    pub highlighted: bool,
}

impl AreaState {
    /// Aggregate of a metric.
    pub fn aggregate(&self, metric: Metric) -> Aggregate {
        self.aggregates[metric.index()]
    }

    /// Level of a metric.
    pub fn level_of(&self, metric: Metric) -> Option<Level> {
        self.levels[metric.index()]
    }
}

/// An area: its configuration, running extrema and latest tick results.
#[derive(Debug, Clone)]
pub struct Area {
    config: AreaConfig,
    extrema: AreaExtrema,
    state: AreaState,
    last_emitted: Level,
}

impl Area {
    /// Create an area from its configuration.
    pub fn new(config: AreaConfig) -> Self {
        Self {
            config,
            extrema: AreaExtrema::default(),
            state: AreaState::default(),
            last_emitted: Level::ZERO,
        }
    }

    /// Normalized area name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Configuration.
    pub fn config(&self) -> &AreaConfig {
        &self.config
    }

    pub(crate) fn config_mut(&mut self) -> &mut AreaConfig {
        &mut self.config
    }

    /// Running extrema.
    pub fn extrema(&self) -> &AreaExtrema {
        &self.extrema
    }

    pub(crate) fn extrema_mut(&mut self) -> &mut AreaExtrema {
        &mut self.extrema
    }

    /// Latest tick results.
    pub fn state(&self) -> &AreaState {
        &self.state
    }

    /// Level most recently emitted for this area.
    pub fn last_emitted(&self) -> Level {
        self.last_emitted
    }

    pub(crate) fn set_emitted(&mut self, level: Level, highlighted: bool) {
        self.last_emitted = level;
        self.state.level = Some(level);
        self.state.highlighted = highlighted;
    }

    /// Fold telemetry values into the extrema.
    pub(crate) fn observe(&mut self, telemetry: &Telemetry) {
        for (metric, value) in telemetry.values.iter() {
            self.extrema.observe(metric, value);
        }
    }

    /// Reported range of a metric.
    pub fn effective_range(&self, metric: Metric) -> EffectiveRange {
        effective_range(&self.config, &self.extrema, metric)
    }

    /// Maximum that fractional thresholds scale against.
    pub fn range_max(&self, metric: Metric) -> RangeMax {
        RangeMax::resolve(&self.config, &self.extrema, metric)
    }

    /// Aggregate a metric from the current history.
    pub fn aggregate(&self, history: &HistoryStore, metric: Metric, config: &AggregationConfig) -> Aggregate {
        aggregate(history, &self.config.probes, metric, config)
    }

    /// Recompute aggregates and levels. The highlight flag is cleared; the
    /// caller sets it after comparing areas.
    pub(crate) fn recompute(
        &mut self,
        history: &HistoryStore,
        config: &AggregationConfig,
        display_metric: Metric,
    ) -> &AreaState {
        let mut state = AreaState::default();
        for metric in Metric::ALL {
            let value = self.aggregate(history, metric, config);
            state.aggregates[metric.index()] = value;
            state.levels[metric.index()] = level_for_aggregate(
                self.config.thresholds.ladder(metric),
                self.range_max(metric).value,
                value,
            );
        }
        state.level = state.level_of(display_metric);
        self.state = state;
        &self.state
    }

    /// Severity score of the latest aggregates.
    pub fn severity_score(&self) -> Option<f64> {
        severity_score(&self.config.thresholds, &self.state.aggregates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envmon_types::{ProbeId, ThresholdLadder};
    use time::OffsetDateTime;

    #[test]
    fn test_recompute_levels() {
        let mut history = HistoryStore::default();
        let now = OffsetDateTime::UNIX_EPOCH;
        history
            .record_telemetry(
                &Telemetry::new("P1", now)
                    .with(Metric::Co2, 1250.0)
                    .with(Metric::Temperature, 20.5),
            )
            .unwrap();

        let mut area = Area::new(AreaConfig::new("FLOOR11").with_probe("P1"));
        let state = *area.recompute(&history, &AggregationConfig::default(), Metric::Co2);

        assert_eq!(state.aggregate(Metric::Co2), Aggregate::Value(1250.0));
        assert_eq!(state.level_of(Metric::Co2), Level::new(5));
        assert_eq!(state.level_of(Metric::Temperature), Level::new(3));
        assert_eq!(state.level_of(Metric::Humidity), None);
        assert_eq!(state.level, Level::new(5));
        assert!(!state.highlighted);
    }

    #[test]
    fn test_recompute_display_metric_without_data() {
        let mut history = HistoryStore::default();
        history
            .record(&ProbeId::new("P1"), Metric::Humidity, 55.0, OffsetDateTime::UNIX_EPOCH)
            .unwrap();

        let mut area = Area::new(AreaConfig::new("POOL").with_probe("P1"));
        let state = area.recompute(&history, &AggregationConfig::default(), Metric::Co2);
        assert_eq!(state.level, None);
        assert_eq!(state.level_of(Metric::Humidity), Level::new(3));
    }

    #[test]
    fn test_fraction_scales_with_override() {
        let mut history = HistoryStore::default();
        history
            .record(&ProbeId::new("P1"), Metric::SoundLevel, 150.0, OffsetDateTime::UNIX_EPOCH)
            .unwrap();

        let config = AreaConfig::new("A")
            .with_probe("P1")
            .with_ladder(
                Metric::SoundLevel,
                ThresholdLadder::new([-1.0, -1.0, -1.0, -1.0, -1.0, 0.5]),
            )
            .with_override(envmon_types::Bound::Max, 200.0);
        let mut area = Area::new(config);
        let state = area.recompute(&history, &AggregationConfig::default(), Metric::SoundLevel);
        assert_eq!(state.level, Some(Level::MAX));
    }

    #[test]
    fn test_observe_updates_extrema() {
        let mut area = Area::new(AreaConfig::new("A"));
        area.observe(&Telemetry::new("P", OffsetDateTime::UNIX_EPOCH).with(Metric::Co2, 700.0));
        area.observe(&Telemetry::new("P", OffsetDateTime::UNIX_EPOCH).with(Metric::Co2, 650.0));
        let co2 = area.extrema().get(Metric::Co2).unwrap();
        assert_eq!((co2.min, co2.max), (650.0, 700.0));
        assert_eq!(area.last_emitted(), Level::ZERO);
    }
}
