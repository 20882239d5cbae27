//! Simulated probes for testing and demos.
//!
//! A [`MockProbe`] produces telemetry that random-walks around configurable
//! starting values, bounded to a plausible band per metric. Seed the probe
//! for reproducible sequences.
//!
//! # Example
//!
//! ```
//! use envmon_core::MockProbeBuilder;
//! use envmon_types::Metric;
//! use time::OffsetDateTime;
//!
//! let mut probe = MockProbeBuilder::new("SIM1").co2(900.0).seed(7).build();
//! let telemetry = probe.next_telemetry(OffsetDateTime::UNIX_EPOCH);
//! assert_eq!(telemetry.probe.as_str(), "SIM1");
//! assert!(telemetry.values.get(Metric::Co2).is_some());
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use time::OffsetDateTime;

use envmon_types::{Metric, ProbeId, Telemetry};

/// Plausible band a simulated metric stays within.
fn band(metric: Metric) -> (f64, f64) {
    match metric {
        Metric::Co2 => (350.0, 3000.0),
        Metric::Temperature => (10.0, 35.0),
        Metric::Humidity => (5.0, 95.0),
        Metric::SoundLevel => (25.0, 110.0),
    }
}

/// Default per-reading step of the random walk.
fn default_step(metric: Metric) -> f64 {
    match metric {
        Metric::Co2 => 25.0,
        Metric::Temperature => 0.2,
        Metric::Humidity => 0.5,
        Metric::SoundLevel => 2.0,
    }
}

/// A simulated probe.
#[derive(Debug, Clone)]
pub struct MockProbe {
    id: ProbeId,
    values: [Option<f64>; Metric::COUNT],
    steps: [f64; Metric::COUNT],
    rng: StdRng,
    readings: u64,
}

impl MockProbe {
    /// Probe id.
    pub fn id(&self) -> &ProbeId {
        &self.id
    }

    /// Number of readings produced so far.
    pub fn readings(&self) -> u64 {
        self.readings
    }

    /// Current value of a metric, `None` if the probe does not report it.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values[metric.index()]
    }

    /// Force a metric to a value; the walk continues from there.
    pub fn set_value(&mut self, metric: Metric, value: f64) {
        let (lo, hi) = band(metric);
        self.values[metric.index()] = Some(value.clamp(lo, hi));
    }

    /// Advance the walk and return the new reading.
    pub fn next_telemetry(&mut self, received_at: OffsetDateTime) -> Telemetry {
        let mut telemetry = Telemetry::new(self.id.clone(), received_at);
        for metric in Metric::ALL {
            let Some(current) = self.values[metric.index()] else {
                continue;
            };
            let step = self.steps[metric.index()];
            let delta = if step > 0.0 {
                self.rng.random_range(-step..=step)
            } else {
                0.0
            };
            let (lo, hi) = band(metric);
            let next = ((current + delta).clamp(lo, hi) * 10.0).round() / 10.0;
            self.values[metric.index()] = Some(next);
            telemetry.values.set(metric, next);
        }
        self.readings += 1;
        telemetry
    }
}

/// Builder for [`MockProbe`].
#[derive(Debug, Clone)]
pub struct MockProbeBuilder {
    id: ProbeId,
    values: [Option<f64>; Metric::COUNT],
    steps: [f64; Metric::COUNT],
    seed: Option<u64>,
}

impl MockProbeBuilder {
    /// Start a probe reporting CO2, temperature and humidity at typical
    /// indoor values.
    pub fn new(id: impl Into<ProbeId>) -> Self {
        Self {
            id: id.into(),
            values: [Some(650.0), Some(21.5), Some(45.0), None],
            steps: Metric::ALL.map(default_step),
            seed: None,
        }
    }

    fn value(mut self, metric: Metric, value: f64) -> Self {
        self.values[metric.index()] = Some(value);
        self
    }

    /// Starting CO2 (ppm).
    pub fn co2(self, value: f64) -> Self {
        self.value(Metric::Co2, value)
    }

    /// Starting temperature (°C).
    pub fn temperature(self, value: f64) -> Self {
        self.value(Metric::Temperature, value)
    }

    /// Starting humidity (%).
    pub fn humidity(self, value: f64) -> Self {
        self.value(Metric::Humidity, value)
    }

    /// Starting sound level (dB). Sound is off unless set.
    pub fn sound_level(self, value: f64) -> Self {
        self.value(Metric::SoundLevel, value)
    }

    /// Stop reporting a metric.
    pub fn without(mut self, metric: Metric) -> Self {
        self.values[metric.index()] = None;
        self
    }

    /// Maximum change per reading for a metric; 0 holds the value constant.
    pub fn step(mut self, metric: Metric, step: f64) -> Self {
        self.steps[metric.index()] = step.abs();
        self
    }

    /// Hold every metric constant.
    pub fn steady(mut self) -> Self {
        self.steps = [0.0; Metric::COUNT];
        self
    }

    /// Seed the walk for reproducible output.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the probe.
    pub fn build(self) -> MockProbe {
        let seed = self.seed.unwrap_or_else(rand::random);
        let mut values = self.values;
        for metric in Metric::ALL {
            let (lo, hi) = band(metric);
            if let Some(v) = values[metric.index()].as_mut() {
                *v = v.clamp(lo, hi);
            }
        }
        MockProbe {
            id: self.id,
            values,
            steps: self.steps,
            rng: StdRng::seed_from_u64(seed),
            readings: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH
    }

    #[test]
    fn test_builder_defaults() {
        let probe = MockProbeBuilder::new("p1").build();
        assert_eq!(probe.id().as_str(), "P1");
        assert_eq!(probe.value(Metric::Co2), Some(650.0));
        assert_eq!(probe.value(Metric::SoundLevel), None);
        assert_eq!(probe.readings(), 0);
    }

    #[test]
    fn test_steady_probe_repeats_values() {
        let mut probe = MockProbeBuilder::new("P1")
            .co2(1200.0)
            .sound_level(60.0)
            .without(Metric::Humidity)
            .steady()
            .build();

        let first = probe.next_telemetry(now());
        let second = probe.next_telemetry(now());
        assert_eq!(first.values, second.values);
        assert_eq!(first.values.get(Metric::Co2), Some(1200.0));
        assert_eq!(first.values.get(Metric::SoundLevel), Some(60.0));
        assert_eq!(first.values.get(Metric::Humidity), None);
        assert_eq!(probe.readings(), 2);
    }

    #[test]
    fn test_seeded_probes_match() {
        let mut a = MockProbeBuilder::new("A").seed(42).build();
        let mut b = MockProbeBuilder::new("A").seed(42).build();
        for _ in 0..20 {
            assert_eq!(a.next_telemetry(now()), b.next_telemetry(now()));
        }
    }

    #[test]
    fn test_walk_stays_in_band() {
        let mut probe = MockProbeBuilder::new("P1")
            .co2(360.0)
            .step(Metric::Co2, 500.0)
            .seed(3)
            .build();
        for _ in 0..200 {
            let co2 = probe.next_telemetry(now()).values.get(Metric::Co2).unwrap();
            assert!((350.0..=3000.0).contains(&co2));
        }
    }

    #[test]
    fn test_set_value_clamps() {
        let mut probe = MockProbeBuilder::new("P1").build();
        probe.set_value(Metric::Co2, 99_999.0);
        assert_eq!(probe.value(Metric::Co2), Some(3000.0));
    }
}
