//! Outbound indicator messages.
//!
//! The display side understands two line formats:
//!
//! - `FLOOR11 4` sets an area's indicator to level 4; a trailing `*`
//!   (`POOL 6*`) marks the highlighted area.
//! - `[LEDS] Pixels: FLOOR11:4, POOL:6` is the periodic diagnostic summary.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use envmon_types::{Level, ParseError, normalize_name};

/// Level update for one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorUpdate {
    /// Area name.
    pub area: String,
    /// Level to display.
    pub level: Level,
    /// Whether the area is highlighted.
    pub highlighted: bool,
}

impl IndicatorUpdate {
    /// Create an update.
    pub fn new(area: impl Into<String>, level: Level, highlighted: bool) -> Self {
        Self {
            area: area.into(),
            level,
            highlighted,
        }
    }
}

impl fmt::Display for IndicatorUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.area, self.level)?;
        if self.highlighted {
            f.write_str("*")?;
        }
        Ok(())
    }
}

impl FromStr for IndicatorUpdate {
    type Err = ParseError;

    /// Parse the wire form, as a display controller would.
    ///
    /// ```
    /// use envmon_core::IndicatorUpdate;
    /// use envmon_types::Level;
    ///
    /// let update: IndicatorUpdate = "POOL 6*".parse().unwrap();
    /// assert_eq!(update, IndicatorUpdate::new("POOL", Level::MAX, true));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (area, level) = s
            .trim()
            .rsplit_once(' ')
            .ok_or_else(|| ParseError::InvalidData(format!("not an indicator line: {s}")))?;
        let (level, highlighted) = match level.strip_suffix('*') {
            Some(level) => (level, true),
            None => (level, false),
        };
        let level: u8 = level
            .parse()
            .map_err(|_| ParseError::InvalidData(format!("bad level in: {s}")))?;
        Ok(Self {
            area: normalize_name(area),
            level: Level::try_from(level)?,
            highlighted,
        })
    }
}

/// Last emitted level of every area, reported on the slow tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticSummary {
    /// `(area, level)` in configuration order.
    pub entries: Vec<(String, Level)>,
}

impl fmt::Display for DiagnosticSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[LEDS] Pixels: ")?;
        for (i, (area, level)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{area}:{level}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_wire_form() {
        let level = Level::new(3).unwrap();
        assert_eq!(IndicatorUpdate::new("FLOOR11", level, false).to_string(), "FLOOR11 3");
        assert_eq!(IndicatorUpdate::new("POOL", Level::MAX, true).to_string(), "POOL 6*");
    }

    #[test]
    fn test_update_parse() {
        let update: IndicatorUpdate = "tearoom 0".parse().unwrap();
        assert_eq!(update, IndicatorUpdate::new("TEAROOM", Level::ZERO, false));
        assert!("POOL".parse::<IndicatorUpdate>().is_err());
        assert!("POOL x".parse::<IndicatorUpdate>().is_err());
        assert_eq!(
            "POOL 9".parse::<IndicatorUpdate>(),
            Err(ParseError::LevelOutOfRange(9))
        );
    }

    #[test]
    fn test_diagnostic_summary() {
        let summary = DiagnosticSummary {
            entries: vec![
                ("A".to_string(), Level::new(3).unwrap()),
                ("B".to_string(), Level::MAX),
            ],
        };
        assert_eq!(summary.to_string(), "[LEDS] Pixels: A:3, B:6");
        assert_eq!(DiagnosticSummary::default().to_string(), "[LEDS] Pixels: ");
    }
}
