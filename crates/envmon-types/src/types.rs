//! Core types for envmon sensor data and area configuration.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Number of samples kept per probe and metric.
pub const HISTORY_CAPACITY: usize = 10;

/// Number of slots in a threshold ladder (one per indicator pixel).
pub const LADDER_SLOTS: usize = 6;

/// Raw slot value marking a ladder slot as unused.
pub const UNUSED_SLOT: f64 = -1.0;

/// Fraction of the baseline maximum at which reporting switches to the live
/// range even while an area is configured to use the baseline.
pub const BASELINE_NEAR_FRACTION: f64 = 0.90;

/// A measured quantity reported by probes.
///
/// The set is fixed; [`Metric::index`] is stable and used to index per-metric
/// arrays throughout the workspace.
///
/// ```
/// use envmon_types::Metric;
///
/// assert_eq!("temperature".parse::<Metric>(), Ok(Metric::Temperature));
/// assert_eq!("rh".parse::<Metric>(), Ok(Metric::Humidity));
/// assert_eq!(Metric::SoundLevel.to_string(), "DB");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Metric {
    /// CO2 concentration in ppm.
    #[cfg_attr(feature = "serde", serde(rename = "CO2", alias = "co2"))]
    Co2,
    /// Temperature in degrees Celsius.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "TEMP", alias = "temp", alias = "temperature")
    )]
    Temperature,
    /// Relative humidity in percent.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "HUM", alias = "hum", alias = "humidity")
    )]
    Humidity,
    /// Sound level in dB.
    #[cfg_attr(feature = "serde", serde(rename = "DB", alias = "db", alias = "sound"))]
    SoundLevel,
}

impl Metric {
    /// Number of metrics.
    pub const COUNT: usize = 4;

    /// All metrics in index order.
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Co2,
        Metric::Temperature,
        Metric::Humidity,
        Metric::SoundLevel,
    ];

    /// Stable array index of this metric.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Metric::Co2 => 0,
            Metric::Temperature => 1,
            Metric::Humidity => 2,
            Metric::SoundLevel => 3,
        }
    }

    /// Short wire name (`CO2`, `TEMP`, `HUM`, `DB`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Metric::Co2 => "CO2",
            Metric::Temperature => "TEMP",
            Metric::Humidity => "HUM",
            Metric::SoundLevel => "DB",
        }
    }

    /// Expected range used for reporting while an area is in baseline mode.
    #[must_use]
    pub const fn baseline_range(self) -> BaselineRange {
        match self {
            Metric::Co2 => BaselineRange::new(400.0, 1000.0),
            Metric::Temperature => BaselineRange::new(18.0, 25.0),
            Metric::Humidity => BaselineRange::new(30.0, 70.0),
            Metric::SoundLevel => BaselineRange::new(35.0, 85.0),
        }
    }

    /// Upper end of the metric's scale.
    ///
    /// Used to normalize values across metrics when scoring areas, and as the
    /// last fallback for fractional thresholds. Always positive.
    #[must_use]
    pub const fn scale_max(self) -> f64 {
        match self {
            Metric::Co2 => 2000.0,
            Metric::Temperature => 30.0,
            Metric::Humidity => 70.0,
            Metric::SoundLevel => 100.0,
        }
    }

    /// Unit suffix for display.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Metric::Co2 => "ppm",
            Metric::Temperature => "°C",
            Metric::Humidity => "%",
            Metric::SoundLevel => "dB",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ParseError;

    /// Parse a metric name, case-insensitively, including common aliases and
    /// the `C02` typo seen on hand-typed consoles.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CO2" | "C02" | "CARBONDIOXIDE" => Ok(Metric::Co2),
            "TEMP" | "TEMPERATURE" => Ok(Metric::Temperature),
            "HUM" | "HUMIDITY" | "RH" => Ok(Metric::Humidity),
            "DB" | "SOUND" | "DECIBEL" => Ok(Metric::SoundLevel),
            _ => Err(ParseError::UnknownMetric(s.trim().to_string())),
        }
    }
}

/// Static expected range of a metric.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BaselineRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl BaselineRange {
    /// Create a range.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Normalize an area or location name (trimmed, upper case).
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Identifier of a telemetry probe.
///
/// Probe ids are case-insensitive on the wire; they are stored trimmed and
/// upper-cased so `a4b2` and `A4B2` refer to the same probe.
///
/// ```
/// use envmon_types::ProbeId;
///
/// assert_eq!(ProbeId::new(" a4b2 "), ProbeId::new("A4B2"));
/// assert_eq!(ProbeId::new("a4b2").as_str(), "A4B2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "String", into = "String")
)]
pub struct ProbeId(String);

impl ProbeId {
    /// Create a normalized probe id.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(normalize_name(id.as_ref()))
    }

    /// The normalized id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty after normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProbeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProbeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProbeId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<ProbeId> for String {
    fn from(value: ProbeId) -> Self {
        value.0
    }
}

/// One value of one metric, as it arrived from a probe.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Which metric this sample measures.
    pub metric: Metric,
    /// The measured value.
    pub value: f64,
    /// Arrival time.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: time::OffsetDateTime,
}

/// Interpretation of one raw threshold slot value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdSlot {
    /// The slot neither raises nor caps the level.
    Unused,
    /// Absolute cut point (raw value `>= 1`).
    Absolute(f64),
    /// Fraction of the effective range maximum (raw value in `[0, 1)`).
    Fraction(f64),
}

impl ThresholdSlot {
    /// Classify a raw slot value.
    ///
    /// Negative and non-finite values mark the slot unused.
    #[must_use]
    pub fn classify(raw: f64) -> Self {
        if !raw.is_finite() || raw < 0.0 {
            ThresholdSlot::Unused
        } else if raw >= 1.0 {
            ThresholdSlot::Absolute(raw)
        } else {
            ThresholdSlot::Fraction(raw)
        }
    }

    /// Whether this slot takes part in level mapping.
    #[must_use]
    pub fn is_used(&self) -> bool {
        !matches!(self, ThresholdSlot::Unused)
    }

    /// The cut point for this slot given the effective range maximum.
    ///
    /// Returns `None` for unused slots.
    #[must_use]
    pub fn cut_point(&self, range_max: f64) -> Option<f64> {
        match *self {
            ThresholdSlot::Unused => None,
            ThresholdSlot::Absolute(t) => Some(t),
            ThresholdSlot::Fraction(t) => Some(t * range_max),
        }
    }
}

/// Six raw threshold slots for one metric of one area.
///
/// Slots are addressed 1..=6, matching the indicator pixel they light. The
/// ladder does not need to be ascending and may contain unused slots.
///
/// ```
/// use envmon_types::{ThresholdLadder, ThresholdSlot};
///
/// let ladder = ThresholdLadder::new([-1.0, 50.0, -1.0, 150.0, -1.0, 0.5]);
/// assert_eq!(ladder.slot(1), Some(ThresholdSlot::Unused));
/// assert_eq!(ladder.slot(2), Some(ThresholdSlot::Absolute(50.0)));
/// assert_eq!(ladder.slot(6), Some(ThresholdSlot::Fraction(0.5)));
/// assert_eq!(ladder.slot(7), None);
/// assert!(ladder.is_measured());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ThresholdLadder([f64; LADDER_SLOTS]);

impl Default for ThresholdLadder {
    fn default() -> Self {
        Self::unused()
    }
}

impl ThresholdLadder {
    /// Create a ladder from raw slot values (slot 1 first).
    #[must_use]
    pub const fn new(raw: [f64; LADDER_SLOTS]) -> Self {
        Self(raw)
    }

    /// A ladder with every slot unused.
    #[must_use]
    pub const fn unused() -> Self {
        Self([UNUSED_SLOT; LADDER_SLOTS])
    }

    /// Raw slot values, slot 1 first.
    #[must_use]
    pub fn raw(&self) -> &[f64; LADDER_SLOTS] {
        &self.0
    }

    /// Classified slot at a 1-based index.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<ThresholdSlot> {
        index
            .checked_sub(1)
            .and_then(|i| self.0.get(i))
            .map(|raw| ThresholdSlot::classify(*raw))
    }

    /// Overwrite the raw value of the slot at a 1-based index.
    ///
    /// Returns `false` when the index is outside `1..=6`.
    pub fn set(&mut self, index: usize, raw: f64) -> bool {
        match index.checked_sub(1).and_then(|i| self.0.get_mut(i)) {
            Some(slot) => {
                *slot = raw;
                true
            }
            None => false,
        }
    }

    /// Iterate `(1-based index, slot)` in evaluation order.
    pub fn slots(&self) -> impl Iterator<Item = (usize, ThresholdSlot)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(i, raw)| (i + 1, ThresholdSlot::classify(*raw)))
    }

    /// Whether at least one slot is used, i.e. the area measures this metric.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.slots().any(|(_, slot)| slot.is_used())
    }
}

/// Threshold ladders for every metric of one area.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Thresholds {
    /// CO2 ladder.
    #[cfg_attr(feature = "serde", serde(rename = "CO2", default))]
    pub co2: ThresholdLadder,
    /// Temperature ladder.
    #[cfg_attr(feature = "serde", serde(rename = "TEMP", default))]
    pub temperature: ThresholdLadder,
    /// Humidity ladder.
    #[cfg_attr(feature = "serde", serde(rename = "HUM", default))]
    pub humidity: ThresholdLadder,
    /// Sound level ladder.
    #[cfg_attr(feature = "serde", serde(rename = "DB", default))]
    pub sound_level: ThresholdLadder,
}

impl Thresholds {
    /// Factory ladders installed on freshly created areas.
    ///
    /// Sound is left unmeasured.
    #[must_use]
    pub const fn factory() -> Self {
        Self {
            co2: ThresholdLadder::new([400.0, 600.0, 800.0, 1000.0, 1200.0, 1400.0]),
            temperature: ThresholdLadder::new([18.0, 19.0, 20.0, 21.0, 22.0, 23.0]),
            humidity: ThresholdLadder::new([30.0, 40.0, 50.0, 60.0, 70.0, 80.0]),
            sound_level: ThresholdLadder::unused(),
        }
    }

    /// Ladder for a metric.
    #[must_use]
    pub fn ladder(&self, metric: Metric) -> &ThresholdLadder {
        match metric {
            Metric::Co2 => &self.co2,
            Metric::Temperature => &self.temperature,
            Metric::Humidity => &self.humidity,
            Metric::SoundLevel => &self.sound_level,
        }
    }

    /// Mutable ladder for a metric.
    pub fn ladder_mut(&mut self, metric: Metric) -> &mut ThresholdLadder {
        match metric {
            Metric::Co2 => &mut self.co2,
            Metric::Temperature => &mut self.temperature,
            Metric::Humidity => &mut self.humidity,
            Metric::SoundLevel => &mut self.sound_level,
        }
    }
}

/// Discrete indicator level, `0..=6`.
///
/// Level 0 means no threshold was reached; level 6 is the top of the display.
///
/// ```
/// use envmon_types::Level;
///
/// assert_eq!(Level::new(6), Some(Level::MAX));
/// assert_eq!(Level::new(7), None);
/// assert_eq!(Level::saturating(9), Level::MAX);
/// assert!(Level::MAX > Level::ZERO);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(try_from = "u8", into = "u8"))]
pub struct Level(u8);

impl Level {
    /// No threshold reached.
    pub const ZERO: Level = Level(0);
    /// Top of the display.
    pub const MAX: Level = Level(LADDER_SLOTS as u8);

    /// Create a level, or `None` when `value > 6`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value as usize <= LADDER_SLOTS {
            Some(Level(value))
        } else {
            None
        }
    }

    /// Create a level, clamping values above 6.
    #[must_use]
    pub const fn saturating(value: u8) -> Self {
        if value as usize > LADDER_SLOTS {
            Self::MAX
        } else {
            Level(value)
        }
    }

    /// Numeric value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Whether this is the top level.
    #[must_use]
    pub const fn is_max(self) -> bool {
        self.0 == Self::MAX.0
    }
}

impl TryFrom<u8> for Level {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value).ok_or(ParseError::LevelOutOfRange(value))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the per-probe values of an area are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum AggregationMode {
    /// Mean of the per-probe means.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "avg", alias = "mean"))]
    Average,
    /// Largest per-probe mean.
    #[cfg_attr(feature = "serde", serde(alias = "max"))]
    Maximum,
}

impl AggregationMode {
    /// Short wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AggregationMode::Average => "AVG",
            AggregationMode::Maximum => "MAX",
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVG" | "AVERAGE" | "MEAN" => Ok(AggregationMode::Average),
            "MAX" | "MAXIMUM" => Ok(AggregationMode::Maximum),
            _ => Err(ParseError::UnknownAggregationMode(s.trim().to_string())),
        }
    }
}

/// Global aggregation settings shared by all areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AggregationConfig {
    /// How probes are combined.
    pub mode: AggregationMode,
    /// Samples per probe considered; see [`AggregationConfig::effective_window`].
    pub window: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            mode: AggregationMode::Average,
            window: HISTORY_CAPACITY,
        }
    }
}

impl AggregationConfig {
    /// Create a configuration.
    #[must_use]
    pub const fn new(mode: AggregationMode, window: usize) -> Self {
        Self { mode, window }
    }

    /// Window clamped to `1..=HISTORY_CAPACITY`.
    #[must_use]
    pub fn effective_window(&self) -> usize {
        self.window.clamp(1, HISTORY_CAPACITY)
    }
}

/// Which operator override bound a command refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Lower override.
    Min,
    /// Upper override.
    Max,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Min => f.write_str("MIN"),
            Bound::Max => f.write_str("MAX"),
        }
    }
}

/// Configuration of one named area.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AreaConfig {
    /// Area name (normalized to upper case).
    pub name: String,
    /// Free-form location label.
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: String,
    /// Probes bound to this area, in binding order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub probes: Vec<ProbeId>,
    /// Report the static baseline range instead of the live range.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub use_baseline: bool,
    /// Operator-set lower bound.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub override_min: Option<f64>,
    /// Operator-set upper bound; used for fractional thresholds when `> 0`.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub override_max: Option<f64>,
    /// Threshold ladders; factory ladders when omitted.
    #[cfg_attr(feature = "serde", serde(default = "Thresholds::factory"))]
    pub thresholds: Thresholds,
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

impl AreaConfig {
    /// Create an area with factory thresholds and baseline reporting on.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: normalize_name(name.as_ref()),
            location: String::new(),
            probes: Vec::new(),
            use_baseline: true,
            override_min: None,
            override_max: None,
            thresholds: Thresholds::factory(),
        }
    }

    /// Builder-style probe binding.
    #[must_use]
    pub fn with_probe(mut self, probe: impl Into<ProbeId>) -> Self {
        let probe = probe.into();
        if !self.probes.contains(&probe) {
            self.probes.push(probe);
        }
        self
    }

    /// Builder-style ladder replacement.
    #[must_use]
    pub fn with_ladder(mut self, metric: Metric, ladder: ThresholdLadder) -> Self {
        *self.thresholds.ladder_mut(metric) = ladder;
        self
    }

    /// Builder-style baseline flag.
    #[must_use]
    pub fn with_baseline(mut self, use_baseline: bool) -> Self {
        self.use_baseline = use_baseline;
        self
    }

    /// Builder-style override.
    #[must_use]
    pub fn with_override(mut self, bound: Bound, value: f64) -> Self {
        self.set_override(bound, value);
        self
    }

    /// Set an override bound. Negative or non-finite values clear it.
    pub fn set_override(&mut self, bound: Bound, value: f64) {
        let value = (value.is_finite() && value >= 0.0).then_some(value);
        match bound {
            Bound::Min => self.override_min = value,
            Bound::Max => self.override_max = value,
        }
    }

    /// Override bound as reported on the wire, `-1` meaning not set.
    #[must_use]
    pub fn override_or_unset(&self, bound: Bound) -> f64 {
        match bound {
            Bound::Min => self.override_min,
            Bound::Max => self.override_max,
        }
        .unwrap_or(UNUSED_SLOT)
    }

    /// Whether the area measures a metric (its ladder has a used slot).
    #[must_use]
    pub fn measures(&self, metric: Metric) -> bool {
        self.thresholds.ladder(metric).is_measured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_index_matches_all_order() {
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), i);
        }
    }

    #[test]
    fn test_metric_from_str_aliases() {
        assert_eq!("C02".parse::<Metric>(), Ok(Metric::Co2));
        assert_eq!("CarbonDioxide".parse::<Metric>(), Ok(Metric::Co2));
        assert_eq!("Temp".parse::<Metric>(), Ok(Metric::Temperature));
        assert_eq!("humidity".parse::<Metric>(), Ok(Metric::Humidity));
        assert_eq!("decibel".parse::<Metric>(), Ok(Metric::SoundLevel));
        assert!(matches!(
            "pressure".parse::<Metric>(),
            Err(ParseError::UnknownMetric(name)) if name == "pressure"
        ));
    }

    #[test]
    fn test_metric_constants() {
        assert_eq!(Metric::Co2.baseline_range(), BaselineRange::new(400.0, 1000.0));
        assert_eq!(Metric::Co2.scale_max(), 2000.0);
        assert_eq!(Metric::Temperature.scale_max(), 30.0);
        for metric in Metric::ALL {
            assert!(metric.scale_max() > 0.0);
            let range = metric.baseline_range();
            assert!(range.min < range.max);
        }
    }

    #[test]
    fn test_threshold_slot_classify() {
        assert_eq!(ThresholdSlot::classify(-1.0), ThresholdSlot::Unused);
        assert_eq!(ThresholdSlot::classify(f64::NAN), ThresholdSlot::Unused);
        assert_eq!(ThresholdSlot::classify(0.0), ThresholdSlot::Fraction(0.0));
        assert_eq!(ThresholdSlot::classify(0.75), ThresholdSlot::Fraction(0.75));
        assert_eq!(ThresholdSlot::classify(1.0), ThresholdSlot::Absolute(1.0));
        assert_eq!(ThresholdSlot::classify(800.0), ThresholdSlot::Absolute(800.0));
    }

    #[test]
    fn test_threshold_slot_cut_point() {
        assert_eq!(ThresholdSlot::Unused.cut_point(100.0), None);
        assert_eq!(ThresholdSlot::Absolute(50.0).cut_point(100.0), Some(50.0));
        assert_eq!(ThresholdSlot::Fraction(0.5).cut_point(200.0), Some(100.0));
    }

    #[test]
    fn test_ladder_set_bounds() {
        let mut ladder = ThresholdLadder::unused();
        assert!(!ladder.is_measured());
        assert!(ladder.set(3, 42.0));
        assert!(!ladder.set(0, 1.0));
        assert!(!ladder.set(7, 1.0));
        assert_eq!(ladder.raw()[2], 42.0);
        assert!(ladder.is_measured());
    }

    #[test]
    fn test_factory_thresholds_leave_sound_unmeasured() {
        let thresholds = Thresholds::factory();
        assert!(thresholds.co2.is_measured());
        assert!(!thresholds.sound_level.is_measured());
        assert_eq!(thresholds.ladder(Metric::Humidity).raw()[5], 80.0);
    }

    #[test]
    fn test_aggregation_window_clamped() {
        assert_eq!(AggregationConfig::new(AggregationMode::Average, 0).effective_window(), 1);
        assert_eq!(AggregationConfig::new(AggregationMode::Average, 4).effective_window(), 4);
        assert_eq!(
            AggregationConfig::new(AggregationMode::Maximum, 50).effective_window(),
            HISTORY_CAPACITY
        );
    }

    #[test]
    fn test_aggregation_mode_from_str() {
        assert_eq!("avg".parse(), Ok(AggregationMode::Average));
        assert_eq!("MAXIMUM".parse(), Ok(AggregationMode::Maximum));
        assert!("median".parse::<AggregationMode>().is_err());
    }

    #[test]
    fn test_area_config_override_clears_on_negative() {
        let mut area = AreaConfig::new("floor11").with_override(Bound::Max, 1500.0);
        assert_eq!(area.name, "FLOOR11");
        assert_eq!(area.override_max, Some(1500.0));
        area.set_override(Bound::Max, -1.0);
        assert_eq!(area.override_max, None);
        assert_eq!(area.override_or_unset(Bound::Max), -1.0);
    }

    #[test]
    fn test_area_config_with_probe_deduplicates() {
        let area = AreaConfig::new("pool").with_probe("a1").with_probe("A1");
        assert_eq!(area.probes, vec![ProbeId::new("A1")]);
    }

    #[test]
    fn test_level_try_from() {
        assert_eq!(Level::try_from(3).map(Level::get), Ok(3));
        assert_eq!(Level::try_from(7), Err(ParseError::LevelOutOfRange(7)));
    }
}
