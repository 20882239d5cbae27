//! Choosing one area to highlight among several at the top level.
//!
//! When two or more areas sit at [`Level::MAX`] at once, the one with the
//! highest relative severity gets the highlight. Severity is the mean, over
//! the metrics the area measures and has data for, of the aggregate
//! normalized by the metric's scale maximum. Normalizing makes CO2 in ppm
//! comparable with temperature in degrees.

use tracing::debug;

use envmon_types::{Level, Metric, Thresholds};

use crate::aggregate::Aggregate;

/// One area's input to highlight selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightCandidate {
    /// Indicator level this tick; `None` when the area has no display value.
    pub level: Option<Level>,
    /// Severity score; `None` ranks below every scored area.
    pub score: Option<f64>,
}

/// Normalized severity of an area.
///
/// Returns `None` when no measured metric has a value.
///
/// ```
/// use envmon_core::{Aggregate, severity_score};
/// use envmon_types::Thresholds;
///
/// let aggregates = [
///     Aggregate::Value(1000.0), // CO2 / 2000
///     Aggregate::Value(27.0),   // TEMP / 30
///     Aggregate::NoData,
///     Aggregate::NoData,
/// ];
/// let score = severity_score(&Thresholds::factory(), &aggregates).unwrap();
/// assert!((score - 0.7).abs() < 1e-9);
/// ```
pub fn severity_score(thresholds: &Thresholds, aggregates: &[Aggregate; Metric::COUNT]) -> Option<f64> {
    let (sum, count) = Metric::ALL
        .into_iter()
        .filter(|m| thresholds.ladder(*m).is_measured())
        .filter_map(|m| aggregates[m.index()].value().map(|v| v / m.scale_max()))
        .fold((0.0, 0usize), |(sum, count), n| (sum + n, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Index of the area to highlight, in configuration order.
///
/// Only candidates at [`Level::MAX`] qualify and at least two must qualify.
/// The strictly highest score wins; ties keep the earliest candidate.
pub fn select_highlight(candidates: &[HighlightCandidate]) -> Option<usize> {
    let mut qualifying = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.level == Some(Level::MAX));

    let first = qualifying.next()?;
    let mut contenders = 1usize;
    let mut best = first;
    for candidate in qualifying {
        contenders += 1;
        if candidate.1.score > best.1.score {
            best = candidate;
        }
    }

    if contenders < 2 {
        return None;
    }
    debug!(
        index = best.0,
        score = ?best.1.score,
        contenders,
        "Selected highlight"
    );
    Some(best.0)
}
