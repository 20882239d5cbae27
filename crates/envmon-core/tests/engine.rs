//! End-to-end tests of the envmon engine through its public API.
//!
//! Run with: `cargo test --package envmon-core --test engine`

use envmon_core::{
    Aggregate, AreaExtrema, EffectiveRange, HighlightCandidate, HistoryStore, Level, Metric,
    MockProbeBuilder, Monitor, MonitorConfig, ProbeId, RangeMax, Telemetry, aggregate,
    effective_range, level_for, select_highlight, severity_score,
};
use envmon_types::{
    AggregationConfig, AggregationMode, AreaConfig, Bound, ThresholdLadder, Thresholds,
};
use proptest::prelude::*;
use time::{Duration, OffsetDateTime};

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

// =============================================================================
// History
// =============================================================================

#[test]
fn test_eleven_inserts_keep_last_ten_newest_first() {
    let mut store = HistoryStore::default();
    let probe = ProbeId::new("P1");
    for v in 1..=11i32 {
        store
            .record(&probe, Metric::Co2, f64::from(v), at(i64::from(v)))
            .unwrap();
    }

    let recent: Vec<f64> = store.recent(&probe, Metric::Co2, 10).map(|s| s.value).collect();
    assert_eq!(
        recent,
        vec![11.0, 10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0]
    );
}

// =============================================================================
// Extrema
// =============================================================================

proptest! {
    #[test]
    fn extrema_track_sequence_bounds(values in proptest::collection::vec(0.0f64..5000.0, 1..100)) {
        let mut extrema = AreaExtrema::default();
        for v in &values {
            extrema.observe(Metric::Co2, *v);
        }
        let e = extrema.get(Metric::Co2).unwrap();
        prop_assert_eq!(e.min, values.iter().copied().fold(f64::INFINITY, f64::min));
        prop_assert_eq!(e.max, values.iter().copied().fold(f64::NEG_INFINITY, f64::max));
    }
}

// =============================================================================
// Aggregation
// =============================================================================

#[test]
fn test_aggregation_modes_combine_probe_means() {
    let (a, b) = (ProbeId::new("A"), ProbeId::new("B"));
    let mut store = HistoryStore::default();
    store.record(&a, Metric::Co2, 10.0, at(0)).unwrap();
    store.record(&a, Metric::Co2, 20.0, at(1)).unwrap();
    store.record(&b, Metric::Co2, 30.0, at(1)).unwrap();
    let probes = [a, b];

    let average = AggregationConfig::new(AggregationMode::Average, 2);
    let maximum = AggregationConfig::new(AggregationMode::Maximum, 2);
    assert_eq!(aggregate(&store, &probes, Metric::Co2, &average), Aggregate::Value(22.5));
    assert_eq!(aggregate(&store, &probes, Metric::Co2, &maximum), Aggregate::Value(30.0));
}

#[test]
fn test_no_data_propagates_to_level_and_highlight() {
    let store = HistoryStore::default();
    let config = AggregationConfig::default();
    assert_eq!(aggregate(&store, &[], Metric::Co2, &config), Aggregate::NoData);
    assert_eq!(
        aggregate(&store, &[ProbeId::new("SILENT")], Metric::Co2, &config),
        Aggregate::NoData
    );

    // An area with probes but no samples emits nothing and is never highlighted.
    let mut monitor = monitor(vec![
        AreaConfig::new("A").with_probe("P1"),
        AreaConfig::new("B").with_probe("P2"),
        AreaConfig::new("C").with_probe("SILENT"),
    ]);
    monitor
        .ingest(&Telemetry::new("P1", at(0)).with(Metric::Co2, 1500.0))
        .unwrap();
    let report = monitor.tick_at(at(1));
    assert_eq!(report.updates.len(), 1);
    assert_eq!(report.highlighted, None);
    assert_eq!(monitor.area("C").unwrap().state().level, None);
}

// =============================================================================
// Level mapping
// =============================================================================

#[test]
fn test_last_passing_slot_wins() {
    let sparse = ThresholdLadder::new([-1.0, 50.0, -1.0, 150.0, -1.0, 90.0]);
    assert_eq!(level_for(&sparse, 2000.0, 120.0), Level::MAX);

    let ascending = ThresholdLadder::new([10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
    assert_eq!(level_for(&ascending, 2000.0, 35.0), Level::new(3).unwrap());
}

#[test]
fn test_fractional_slot_scales_with_override_max() {
    let area = AreaConfig::new("A")
        .with_ladder(
            Metric::Co2,
            ThresholdLadder::new([-1.0, -1.0, -1.0, -1.0, -1.0, 0.5]),
        )
        .with_override(Bound::Max, 200.0);
    let range_max = RangeMax::resolve(&area, &AreaExtrema::default(), Metric::Co2);
    assert_eq!(range_max.value, 200.0);

    let ladder = area.thresholds.ladder(Metric::Co2);
    assert_eq!(level_for(ladder, range_max.value, 150.0), Level::MAX);
    assert_eq!(level_for(ladder, range_max.value, 99.0), Level::ZERO);
}

// =============================================================================
// Highlight
// =============================================================================

#[test]
fn test_highlight_prefers_higher_normalized_severity() {
    let thresholds = Thresholds::factory();
    let x = [
        Aggregate::Value(1800.0),
        Aggregate::NoData,
        Aggregate::NoData,
        Aggregate::NoData,
    ];
    let y = [
        Aggregate::Value(1000.0),
        Aggregate::Value(27.0),
        Aggregate::NoData,
        Aggregate::NoData,
    ];
    let candidates = [
        HighlightCandidate {
            level: Some(Level::MAX),
            score: severity_score(&thresholds, &x),
        },
        HighlightCandidate {
            level: Some(Level::MAX),
            score: severity_score(&thresholds, &y),
        },
    ];
    assert_eq!(select_highlight(&candidates), Some(0));
}

#[test]
fn test_highlight_through_monitor_uses_all_metrics() {
    let mut monitor = monitor(vec![
        AreaConfig::new("X").with_probe("PX"),
        AreaConfig::new("Y").with_probe("PY"),
    ]);
    // Both reach level 6 on CO2; X scores 0.9, Y scores (0.75 + 0.9) / 2.
    monitor
        .ingest(&Telemetry::new("PX", at(0)).with(Metric::Co2, 1800.0))
        .unwrap();
    monitor
        .ingest(
            &Telemetry::new("PY", at(0))
                .with(Metric::Co2, 1500.0)
                .with(Metric::Temperature, 27.0),
        )
        .unwrap();

    let report = monitor.tick_at(at(1));
    assert_eq!(report.highlighted.as_deref(), Some("X"));
    let lines: Vec<String> = report.updates.iter().map(ToString::to_string).collect();
    assert_eq!(lines, vec!["X 6*", "Y 6"]);
}

// =============================================================================
// Range selection
// =============================================================================

#[test]
fn test_near_baseline_max_reports_live_range() {
    let area = AreaConfig::new("A");
    let mut extrema = AreaExtrema::default();
    extrema.observe(Metric::Co2, 600.0);
    extrema.observe(Metric::Co2, 950.0);

    assert_eq!(
        effective_range(&area, &extrema, Metric::Co2),
        EffectiveRange {
            min: 600.0,
            max: 950.0,
            using_baseline: true
        }
    );
}

// =============================================================================
// Simulation
// =============================================================================

#[test]
fn test_simulated_probes_drive_the_monitor() {
    let mut monitor = monitor(vec![
        AreaConfig::new("POOL").with_probe("SIM1"),
        AreaConfig::new("TEAROOM").with_probe("SIM2"),
    ]);
    let mut probes = [
        MockProbeBuilder::new("SIM1").co2(1900.0).steady().build(),
        MockProbeBuilder::new("SIM2").co2(1450.0).steady().build(),
    ];

    for second in 0..15 {
        for probe in &mut probes {
            let line = probe.next_telemetry(at(second)).to_string();
            let telemetry = Telemetry::parse_line(&line, at(second)).unwrap();
            monitor.ingest(&telemetry).unwrap();
        }
    }

    let report = monitor.tick_at(at(15));
    assert_eq!(report.highlighted.as_deref(), Some("POOL"));
    assert_eq!(
        monitor.diagnostic_summary().to_string(),
        "[LEDS] Pixels: POOL:6, TEAROOM:6"
    );
}
