//! The monitoring engine.
//!
//! [`Monitor`] owns the configured areas and the probe history. Telemetry is
//! folded in with [`Monitor::ingest`]; [`Monitor::tick`] recomputes every
//! area and returns the indicator updates to emit. Configuration setters take
//! effect at the next tick.
//!
//! The monitor is a plain single-owner value. Callers that share it across
//! tasks wrap it in a mutex.
//!
//! # Example
//!
//! ```
//! use envmon_core::{Monitor, MonitorConfig};
//! use envmon_types::{AreaConfig, Level, Metric, Telemetry};
//! use time::OffsetDateTime;
//!
//! let config = MonitorConfig {
//!     areas: vec![AreaConfig::new("FLOOR11").with_probe("A4B2")],
//!     ..MonitorConfig::default()
//! };
//! let mut monitor = Monitor::new(config)?;
//!
//! let now = OffsetDateTime::UNIX_EPOCH;
//! monitor.ingest(&Telemetry::new("A4B2", now).with(Metric::Co2, 1250.0))?;
//!
//! let report = monitor.tick_at(now);
//! assert_eq!(report.updates[0].to_string(), "FLOOR11 5");
//! # Ok::<(), envmon_core::Error>(())
//! ```

use std::collections::HashSet;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, trace};

use envmon_types::{
    AggregationConfig, AggregationMode, AreaConfig, Bound, HISTORY_CAPACITY, LADDER_SLOTS, Level,
    Metric, ProbeId, Telemetry, ThresholdLadder, normalize_name,
};

use crate::aggregate::Aggregate;
use crate::area::Area;
use crate::error::{Error, Result};
use crate::highlight::{HighlightCandidate, select_highlight};
use crate::history::{DEFAULT_MAX_PROBES, HistoryStore, ProbeHistorySnapshot, ProbePolicy, RecordOutcome};
use crate::indicator::{DiagnosticSummary, IndicatorUpdate};
use crate::range::{EffectiveRange, RangeMax};

/// Seconds each level is shown while test mode cycles the display.
pub const TEST_MODE_STEP_SECS: i64 = 5;

/// Names of the areas in the factory configuration.
pub const DEFAULT_AREA_NAMES: [&str; 7] = [
    "FLOOR11", "FLOOR12", "FLOOR15", "FLOOR16", "FLOOR17", "POOL", "TEAROOM",
];

/// Factory areas with factory threshold ladders and no probes.
pub fn default_areas() -> Vec<AreaConfig> {
    DEFAULT_AREA_NAMES.iter().map(AreaConfig::new).collect()
}

/// Everything needed to build a [`Monitor`].
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Areas in configuration order.
    pub areas: Vec<AreaConfig>,
    /// Aggregation settings.
    pub aggregation: AggregationConfig,
    /// Metric whose level drives the indicator.
    pub display_metric: Metric,
    /// Bound on tracked probes.
    pub max_probes: usize,
    /// Policy at the probe bound.
    pub probe_policy: ProbePolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            areas: default_areas(),
            aggregation: AggregationConfig::default(),
            display_metric: Metric::Co2,
            max_probes: DEFAULT_MAX_PROBES,
            probe_policy: ProbePolicy::default(),
        }
    }
}

/// Output of one fast tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    /// One update per area with a display level, in configuration order.
    pub updates: Vec<IndicatorUpdate>,
    /// Name of the highlighted area.
    pub highlighted: Option<String>,
    /// Whether the levels come from the test pattern.
    pub test_mode: bool,
}

/// Per-metric status of an area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricStatus {
    /// The metric.
    pub metric: Metric,
    /// Whether the area's ladder for this metric has a used slot.
    pub measured: bool,
    /// Aggregate at the last tick.
    pub aggregate: Aggregate,
    /// Level at the last tick.
    pub level: Option<Level>,
    /// Reported range.
    pub range: EffectiveRange,
    /// Maximum used for fractional thresholds.
    pub range_max: RangeMax,
    /// Aggregate as a percentage of the reported range maximum.
    pub percent_of_range: Option<f64>,
}

/// Status of one area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaStatus {
    /// Area name.
    pub name: String,
    /// Location label.
    pub location: String,
    /// Bound probes.
    pub probes: Vec<ProbeId>,
    /// Display level at the last tick.
    pub level: Option<Level>,
    /// Whether the area holds the highlight.
    pub highlighted: bool,
    /// Per-metric details in metric order.
    pub metrics: Vec<MetricStatus>,
}

/// Aggregation engine over a set of areas.
#[derive(Debug, Clone)]
pub struct Monitor {
    areas: Vec<Area>,
    history: HistoryStore,
    aggregation: AggregationConfig,
    display_metric: Metric,
    test_mode: bool,
    test_started: Option<OffsetDateTime>,
}

impl Monitor {
    /// Build a monitor, rejecting duplicate or empty area names and probes
    /// bound to more than one area.
    pub fn new(config: MonitorConfig) -> Result<Self> {
        let mut names = HashSet::new();
        let mut probes = HashSet::new();
        let mut areas = Vec::with_capacity(config.areas.len());

        for mut area in config.areas {
            area.name = normalize_name(&area.name);
            if area.name.is_empty() {
                return Err(Error::InvalidConfig("area name must not be empty".into()));
            }
            if !names.insert(area.name.clone()) {
                return Err(Error::InvalidConfig(format!("duplicate area {}", area.name)));
            }
            for probe in &area.probes {
                if !probes.insert(probe.clone()) {
                    return Err(Error::InvalidConfig(format!(
                        "probe {probe} is bound to more than one area"
                    )));
                }
            }
            areas.push(Area::new(area));
        }

        info!(
            areas = areas.len(),
            probes = probes.len(),
            mode = %config.aggregation.mode,
            window = config.aggregation.effective_window(),
            "Monitor configured"
        );

        Ok(Self {
            areas,
            history: HistoryStore::new(config.max_probes, config.probe_policy),
            aggregation: config.aggregation,
            display_metric: config.display_metric,
            test_mode: false,
            test_started: None,
        })
    }

    // --- Ingest and tick ---

    /// Record telemetry and fold it into the extrema of the probe's area.
    ///
    /// Probes that are not bound to any area are still recorded so they
    /// contribute as soon as they are bound.
    pub fn ingest(&mut self, telemetry: &Telemetry) -> Result<RecordOutcome> {
        let outcome = self.history.record_telemetry(telemetry)?;
        match self
            .areas
            .iter_mut()
            .find(|a| a.config().probes.contains(&telemetry.probe))
        {
            Some(area) => area.observe(telemetry),
            None => trace!(probe = %telemetry.probe, "Telemetry from unbound probe"),
        }
        Ok(outcome)
    }

    /// Run one fast tick at the current time.
    pub fn tick(&mut self) -> TickReport {
        self.tick_at(OffsetDateTime::now_utc())
    }

    /// Run one fast tick: aggregate, map to levels, resolve the highlight.
    pub fn tick_at(&mut self, now: OffsetDateTime) -> TickReport {
        if self.test_mode {
            return self.test_pattern(now);
        }

        let mut candidates = Vec::with_capacity(self.areas.len());
        for area in &mut self.areas {
            area.recompute(&self.history, &self.aggregation, self.display_metric);
            candidates.push(HighlightCandidate {
                level: area.state().level,
                score: area.severity_score(),
            });
        }
        let highlight = select_highlight(&candidates);

        let mut report = TickReport::default();
        for (index, area) in self.areas.iter_mut().enumerate() {
            let Some(level) = area.state().level else {
                trace!(area = area.name(), metric = %self.display_metric, "No data, skipping");
                continue;
            };
            let highlighted = highlight == Some(index);
            area.set_emitted(level, highlighted);
            if highlighted {
                report.highlighted = Some(area.name().to_string());
            }
            report.updates.push(IndicatorUpdate::new(area.name(), level, highlighted));
        }

        debug!(
            updates = report.updates.len(),
            highlighted = ?report.highlighted,
            "Tick complete"
        );
        report
    }

    fn test_pattern(&mut self, now: OffsetDateTime) -> TickReport {
        let started = *self.test_started.get_or_insert(now);
        let steps = (now - started).whole_seconds().max(0) / TEST_MODE_STEP_SECS;
        let level = Level::saturating((steps % (LADDER_SLOTS as i64 + 1)) as u8);

        let mut report = TickReport {
            test_mode: true,
            ..TickReport::default()
        };
        for area in &mut self.areas {
            area.set_emitted(level, false);
            report.updates.push(IndicatorUpdate::new(area.name(), level, false));
        }
        report
    }

    /// Last emitted level of every area.
    pub fn diagnostic_summary(&self) -> DiagnosticSummary {
        DiagnosticSummary {
            entries: self
                .areas
                .iter()
                .map(|a| (a.name().to_string(), a.last_emitted()))
                .collect(),
        }
    }

    // --- Queries ---

    fn area_index(&self, name: &str) -> Result<usize> {
        let name = normalize_name(name);
        self.areas
            .iter()
            .position(|a| a.name() == name)
            .ok_or(Error::AreaNotFound(name))
    }

    fn area_mut(&mut self, name: &str) -> Result<&mut Area> {
        let index = self.area_index(name)?;
        Ok(&mut self.areas[index])
    }

    /// Areas in configuration order.
    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter()
    }

    /// Look up an area by name (case-insensitive).
    pub fn area(&self, name: &str) -> Result<&Area> {
        self.area_index(name).map(|i| &self.areas[i])
    }

    /// Area a probe is bound to.
    pub fn probe_area(&self, probe: &ProbeId) -> Option<&Area> {
        self.areas.iter().find(|a| a.config().probes.contains(probe))
    }

    /// Reported range of a metric of an area.
    pub fn effective_range(&self, area: &str, metric: Metric) -> Result<EffectiveRange> {
        Ok(self.area(area)?.effective_range(metric))
    }

    /// Aggregate a metric of an area from the current history.
    pub fn aggregate(&self, area: &str, metric: Metric) -> Result<Aggregate> {
        Ok(self.area(area)?.aggregate(&self.history, metric, &self.aggregation))
    }

    /// History of a probe.
    pub fn probe_history(&self, probe: &ProbeId) -> Result<ProbeHistorySnapshot> {
        self.history
            .snapshot(probe)
            .ok_or_else(|| Error::probe_not_found(probe.as_str()))
    }

    /// The probe history store.
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Status of every area as of the last tick.
    pub fn status(&self) -> Vec<AreaStatus> {
        self.areas
            .iter()
            .map(|area| AreaStatus {
                name: area.name().to_string(),
                location: area.config().location.clone(),
                probes: area.config().probes.clone(),
                level: area.state().level,
                highlighted: area.state().highlighted,
                metrics: Metric::ALL
                    .into_iter()
                    .map(|metric| {
                        let range = area.effective_range(metric);
                        let aggregate = area.state().aggregate(metric);
                        MetricStatus {
                            metric,
                            measured: area.config().measures(metric),
                            aggregate,
                            level: area.state().level_of(metric),
                            range,
                            range_max: area.range_max(metric),
                            percent_of_range: aggregate.value().map(|v| range.percent_of_range(v)),
                        }
                    })
                    .collect(),
            })
            .collect()
    }

    /// Current area configurations, including runtime changes.
    pub fn area_configs(&self) -> Vec<AreaConfig> {
        self.areas.iter().map(|a| a.config().clone()).collect()
    }

    /// Aggregation settings.
    pub fn aggregation(&self) -> AggregationConfig {
        self.aggregation
    }

    /// Display metric.
    pub fn display_metric(&self) -> Metric {
        self.display_metric
    }

    /// Whether test mode is on.
    pub fn test_mode(&self) -> bool {
        self.test_mode
    }

    // --- Setters ---

    /// Set one raw threshold slot (`1..=6`).
    pub fn set_threshold(&mut self, area: &str, metric: Metric, slot: usize, value: f64) -> Result<()> {
        let area = self.area_mut(area)?;
        if !area.config_mut().thresholds.ladder_mut(metric).set(slot, value) {
            return Err(Error::InvalidThresholdSlot(slot));
        }
        debug!(area = area.name(), %metric, slot, value, "Threshold updated");
        Ok(())
    }

    /// Replace a whole ladder.
    pub fn set_ladder(&mut self, area: &str, metric: Metric, ladder: ThresholdLadder) -> Result<()> {
        *self.area_mut(area)?.config_mut().thresholds.ladder_mut(metric) = ladder;
        Ok(())
    }

    /// Set or clear (negative value) an override bound.
    pub fn set_override(&mut self, area: &str, bound: Bound, value: f64) -> Result<()> {
        let area = self.area_mut(area)?;
        area.config_mut().set_override(bound, value);
        debug!(area = area.name(), %bound, value, "Override updated");
        Ok(())
    }

    /// Baseline flag of an area.
    pub fn use_baseline(&self, area: &str) -> Result<bool> {
        Ok(self.area(area)?.config().use_baseline)
    }

    /// Set the baseline flag of an area.
    pub fn set_use_baseline(&mut self, area: &str, use_baseline: bool) -> Result<()> {
        self.area_mut(area)?.config_mut().use_baseline = use_baseline;
        Ok(())
    }

    /// Set the aggregation mode.
    pub fn set_aggregation_mode(&mut self, mode: AggregationMode) {
        self.aggregation.mode = mode;
    }

    /// Set the aggregation window; must be within `1..=10`.
    pub fn set_aggregation_window(&mut self, window: usize) -> Result<()> {
        if !(1..=HISTORY_CAPACITY).contains(&window) {
            return Err(Error::InvalidConfig(format!(
                "aggregation window {window} outside 1-{HISTORY_CAPACITY}"
            )));
        }
        self.aggregation.window = window;
        Ok(())
    }

    /// Set the display metric.
    pub fn set_display_metric(&mut self, metric: Metric) {
        self.display_metric = metric;
    }

    /// Bind a probe to an area, unbinding it from any other area. A non-empty
    /// location replaces the area's location label.
    pub fn bind_probe(&mut self, probe: &ProbeId, area: &str, location: Option<&str>) -> Result<()> {
        let index = self.area_index(area)?;
        for other in &mut self.areas {
            other.config_mut().probes.retain(|p| p != probe);
        }

        let area = &mut self.areas[index];
        area.config_mut().probes.push(probe.clone());
        if let Some(location) = location.map(normalize_name).filter(|l| !l.is_empty()) {
            area.config_mut().location = location;
        }
        info!(probe = %probe, area = area.name(), "Probe bound");
        Ok(())
    }

    /// Unbind a probe from every area. Returns whether it was bound.
    pub fn remove_probe(&mut self, probe: &ProbeId) -> bool {
        let mut removed = false;
        for area in &mut self.areas {
            let before = area.config().probes.len();
            area.config_mut().probes.retain(|p| p != probe);
            removed |= area.config().probes.len() != before;
        }
        if removed {
            info!(probe = %probe, "Probe unbound");
        }
        removed
    }

    /// Clear the running extrema of an area.
    pub fn reset_extrema(&mut self, area: &str) -> Result<()> {
        self.area_mut(area)?.extrema_mut().reset();
        Ok(())
    }

    /// Switch the test pattern on or off.
    pub fn set_test_mode(&mut self, enabled: bool) {
        if enabled != self.test_mode {
            info!(enabled, "Test mode changed");
        }
        self.test_mode = enabled;
        self.test_started = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn at(secs: i64) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + Duration::seconds(secs)
    }

    fn monitor(areas: Vec<AreaConfig>) -> Monitor {
        Monitor::new(MonitorConfig {
            areas,
            ..MonitorConfig::default()
        })
        .unwrap()
    }

    fn co2(probe: &str, value: f64) -> Telemetry {
        Telemetry::new(probe, at(0)).with(Metric::Co2, value)
    }

    #[test]
    fn test_default_config_has_factory_areas() {
        let monitor = Monitor::new(MonitorConfig::default()).unwrap();
        let names: Vec<&str> = monitor.areas().map(Area::name).collect();
        assert_eq!(names, DEFAULT_AREA_NAMES);
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let err = Monitor::new(MonitorConfig {
            areas: vec![AreaConfig::new("A"), AreaConfig::new("a")],
            ..MonitorConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = Monitor::new(MonitorConfig {
            areas: vec![
                AreaConfig::new("A").with_probe("P1"),
                AreaConfig::new("B").with_probe("P1"),
            ],
            ..MonitorConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_tick_skips_areas_without_data() {
        let mut monitor = monitor(vec![
            AreaConfig::new("A").with_probe("P1"),
            AreaConfig::new("B").with_probe("P2"),
        ]);
        monitor.ingest(&co2("P1", 650.0)).unwrap();

        let report = monitor.tick_at(at(1));
        assert_eq!(report.updates, vec![IndicatorUpdate::new("A", Level::new(2).unwrap(), false)]);
        assert_eq!(report.highlighted, None);
    }

    #[test]
    fn test_tick_highlights_most_severe() {
        let mut monitor = monitor(vec![
            AreaConfig::new("A").with_probe("P1"),
            AreaConfig::new("B").with_probe("P2"),
            AreaConfig::new("C").with_probe("P3"),
        ]);
        monitor.ingest(&co2("P1", 1500.0)).unwrap();
        monitor.ingest(&co2("P2", 1900.0)).unwrap();
        monitor.ingest(&co2("P3", 700.0)).unwrap();

        let report = monitor.tick_at(at(1));
        let lines: Vec<String> = report.updates.iter().map(ToString::to_string).collect();
        assert_eq!(lines, vec!["A 6", "B 6*", "C 2"]);
        assert_eq!(report.highlighted.as_deref(), Some("B"));
        assert!(monitor.area("b").unwrap().state().highlighted);
    }

    #[test]
    fn test_unbound_probe_recorded_but_ignored() {
        let mut monitor = monitor(vec![AreaConfig::new("A")]);
        assert_eq!(monitor.ingest(&co2("STRAY", 1500.0)).unwrap(), RecordOutcome::Admitted);
        assert!(monitor.tick_at(at(1)).updates.is_empty());
        assert!(monitor.probe_history(&ProbeId::new("stray")).is_ok());

        monitor.bind_probe(&ProbeId::new("STRAY"), "a", None).unwrap();
        assert_eq!(monitor.tick_at(at(2)).updates[0].level, Level::MAX);
    }

    #[test]
    fn test_bind_probe_moves_between_areas() {
        let mut monitor = monitor(vec![AreaConfig::new("A").with_probe("P1"), AreaConfig::new("B")]);
        monitor.bind_probe(&ProbeId::new("p1"), "B", Some("north")).unwrap();

        assert!(monitor.area("A").unwrap().config().probes.is_empty());
        let b = monitor.area("B").unwrap();
        assert_eq!(b.config().probes, vec![ProbeId::new("P1")]);
        assert_eq!(b.config().location, "NORTH");

        assert_eq!(
            monitor.bind_probe(&ProbeId::new("P1"), "NOPE", None),
            Err(Error::AreaNotFound("NOPE".into()))
        );
        assert!(monitor.remove_probe(&ProbeId::new("P1")));
        assert!(!monitor.remove_probe(&ProbeId::new("P1")));
    }

    #[test]
    fn test_ingest_updates_extrema_of_bound_area() {
        let mut monitor = monitor(vec![AreaConfig::new("A").with_probe("P1")]);
        monitor.ingest(&co2("P1", 500.0)).unwrap();
        monitor.ingest(&co2("P1", 950.0)).unwrap();

        let range = monitor.effective_range("A", Metric::Co2).unwrap();
        assert_eq!((range.min, range.max), (500.0, 950.0));

        monitor.reset_extrema("A").unwrap();
        let range = monitor.effective_range("A", Metric::Co2).unwrap();
        assert_eq!((range.min, range.max), (400.0, 1000.0));
    }

    #[test]
    fn test_setters_take_effect_next_tick() {
        let mut monitor = monitor(vec![AreaConfig::new("A").with_probe("P1")]);
        monitor.ingest(&co2("P1", 700.0)).unwrap();
        assert_eq!(monitor.tick_at(at(1)).updates[0].level, Level::new(2).unwrap());

        monitor.set_threshold("A", Metric::Co2, 6, 650.0).unwrap();
        assert_eq!(monitor.tick_at(at(2)).updates[0].level, Level::MAX);

        assert_eq!(
            monitor.set_threshold("A", Metric::Co2, 7, 1.0),
            Err(Error::InvalidThresholdSlot(7))
        );
    }

    #[test]
    fn test_display_metric_switch() {
        let mut monitor = monitor(vec![AreaConfig::new("A").with_probe("P1")]);
        monitor
            .ingest(&Telemetry::new("P1", at(0)).with(Metric::Humidity, 65.0))
            .unwrap();
        assert!(monitor.tick_at(at(1)).updates.is_empty());

        monitor.set_display_metric(Metric::Humidity);
        assert_eq!(monitor.tick_at(at(2)).updates[0].level, Level::new(4).unwrap());
    }

    #[test]
    fn test_aggregation_setters() {
        let mut monitor = monitor(vec![AreaConfig::new("A").with_probe("P1")]);
        for v in [100.0, 200.0, 900.0] {
            monitor.ingest(&co2("P1", v)).unwrap();
        }
        monitor.set_aggregation_window(1).unwrap();
        assert_eq!(monitor.aggregate("A", Metric::Co2).unwrap(), Aggregate::Value(900.0));
        monitor.set_aggregation_window(3).unwrap();
        assert_eq!(monitor.aggregate("A", Metric::Co2).unwrap(), Aggregate::Value(400.0));
        assert!(monitor.set_aggregation_window(0).is_err());
        assert!(monitor.set_aggregation_window(11).is_err());

        monitor.set_aggregation_mode(AggregationMode::Maximum);
        assert_eq!(monitor.aggregation().mode, AggregationMode::Maximum);
    }

    #[test]
    fn test_test_mode_cycles_levels() {
        let mut monitor = monitor(vec![AreaConfig::new("A"), AreaConfig::new("B")]);
        monitor.set_test_mode(true);

        let levels: Vec<u8> = [0, 4, 5, 12, 30, 35]
            .into_iter()
            .map(|s| monitor.tick_at(at(s)).updates[0].level.get())
            .collect();
        assert_eq!(levels, vec![0, 0, 1, 2, 6, 0]);

        let report = monitor.tick_at(at(10));
        assert!(report.test_mode);
        assert_eq!(report.updates.len(), 2);

        monitor.set_test_mode(false);
        assert!(monitor.tick_at(at(40)).updates.is_empty());
    }

    #[test]
    fn test_diagnostic_summary_keeps_last_level() {
        let mut monitor = monitor(vec![AreaConfig::new("A").with_probe("P1"), AreaConfig::new("B")]);
        monitor.ingest(&co2("P1", 1000.0)).unwrap();
        monitor.tick_at(at(1));
        assert_eq!(monitor.diagnostic_summary().to_string(), "[LEDS] Pixels: A:4, B:0");
    }

    #[test]
    fn test_status_reports_percent_of_range() {
        let mut monitor = monitor(vec![AreaConfig::new("A").with_probe("P1")]);
        monitor.ingest(&co2("P1", 500.0)).unwrap();
        monitor.tick_at(at(1));

        let status = monitor.status();
        let co2 = &status[0].metrics[Metric::Co2.index()];
        assert!(co2.measured);
        assert_eq!(co2.aggregate, Aggregate::Value(500.0));
        assert_eq!(co2.range.max, 1000.0);
        assert_eq!(co2.percent_of_range, Some(50.0));
        assert_eq!(status[0].metrics[Metric::Humidity.index()].percent_of_range, None);
    }

    #[test]
    fn test_unknown_lookups() {
        let monitor = monitor(vec![AreaConfig::new("A")]);
        assert!(matches!(monitor.area("Z"), Err(Error::AreaNotFound(_))));
        assert!(matches!(
            monitor.probe_history(&ProbeId::new("Z")),
            Err(Error::ProbeNotFound(_))
        ));
        assert!(monitor.use_baseline("A").unwrap());
    }
}
