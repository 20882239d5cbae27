//! Probe telemetry records and the `<PROBE>: KEY:value,...` line format.

use core::fmt;

use time::OffsetDateTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};
use crate::types::{Metric, ProbeId};

/// Per-metric optional values of one telemetry record.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricValues([Option<f64>; Metric::COUNT]);

impl MetricValues {
    /// Value for a metric, if present.
    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0[metric.index()]
    }

    /// Store a value. Non-finite values are ignored.
    pub fn set(&mut self, metric: Metric, value: f64) {
        if value.is_finite() {
            self.0[metric.index()] = Some(value);
        }
    }

    /// Iterate present values in metric order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL
            .into_iter()
            .filter_map(|metric| self.get(metric).map(|value| (metric, value)))
    }

    /// Whether no metric is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

/// One telemetry record: a probe, the metrics it reported and when it arrived.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Telemetry {
    /// Reporting probe.
    pub probe: ProbeId,
    /// Reported values.
    pub values: MetricValues,
    /// Arrival time.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub received_at: OffsetDateTime,
}

impl Telemetry {
    /// Create an empty record.
    pub fn new(probe: impl Into<ProbeId>, received_at: OffsetDateTime) -> Self {
        Self {
            probe: probe.into(),
            values: MetricValues::default(),
            received_at,
        }
    }

    /// Builder-style value. Non-finite values are ignored.
    #[must_use]
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.values.set(metric, value);
        self
    }

    /// Parse a line of the form `A4B2: CO2:812,Temp:22.4,Hum:41,Sound:55`.
    ///
    /// Keys are case-insensitive; `SOUND` and `DB` both map to the sound
    /// level. Unknown keys and values that do not parse to a finite number are
    /// skipped. A line where no metric survives is rejected as a whole.
    ///
    /// ```
    /// use envmon_types::{Metric, Telemetry};
    /// use time::OffsetDateTime;
    ///
    /// let t = Telemetry::parse_line("a4b2: CO2:812,Temp:22.4,Sound:55", OffsetDateTime::UNIX_EPOCH)?;
    /// assert_eq!(t.probe.as_str(), "A4B2");
    /// assert_eq!(t.values.get(Metric::Co2), Some(812.0));
    /// assert_eq!(t.values.get(Metric::SoundLevel), Some(55.0));
    /// assert_eq!(t.values.get(Metric::Humidity), None);
    /// # Ok::<(), envmon_types::ParseError>(())
    /// ```
    pub fn parse_line(line: &str, received_at: OffsetDateTime) -> ParseResult<Self> {
        let (probe, payload) = line.split_once(':').ok_or(ParseError::MissingProbeId)?;
        let probe = ProbeId::new(probe);
        if probe.is_empty() || probe.as_str().contains(char::is_whitespace) {
            return Err(ParseError::MissingProbeId);
        }
        Self::parse_payload(probe, payload, received_at)
    }

    /// Parse the `KEY:value,...` part of a telemetry line for a known probe.
    pub fn parse_payload(
        probe: ProbeId,
        payload: &str,
        received_at: OffsetDateTime,
    ) -> ParseResult<Self> {
        let mut telemetry = Telemetry::new(probe, received_at);
        for token in payload.split(',') {
            let Some((key, value)) = token.split_once(':') else {
                continue;
            };
            let Ok(metric) = key.parse::<Metric>() else {
                continue;
            };
            if let Ok(value) = value.trim().parse::<f64>() {
                telemetry.values.set(metric, value);
            }
        }

        if telemetry.values.is_empty() {
            return Err(ParseError::NoMetrics {
                probe: telemetry.probe.to_string(),
            });
        }
        Ok(telemetry)
    }
}

impl fmt::Display for Telemetry {
    /// Line form accepted by [`Telemetry::parse_line`]; absent metrics are
    /// left out.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.probe)?;
        for (i, (metric, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            let key = match metric {
                Metric::Co2 => "CO2",
                Metric::Temperature => "Temp",
                Metric::Humidity => "Hum",
                Metric::SoundLevel => "Sound",
            };
            write!(f, "{key}:{value}")?;
        }
        Ok(())
    }
}
