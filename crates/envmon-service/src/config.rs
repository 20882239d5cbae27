//! Service configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use envmon_core::{
    AggregationConfig, AreaConfig, DEFAULT_MAX_PROBES, Metric, Monitor, MonitorConfig,
    ProbePolicy, default_areas,
};
use envmon_types::{HISTORY_CAPACITY, normalize_name};

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Metric whose level drives the indicator.
    pub display_metric: Metric,
    /// Timer settings.
    pub scheduler: SchedulerConfig,
    /// Aggregation settings.
    pub aggregation: AggregationConfig,
    /// Probe table settings.
    pub history: HistoryConfig,
    /// Areas in display order.
    pub areas: Vec<AreaConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_metric: Metric::Co2,
            scheduler: SchedulerConfig::default(),
            aggregation: AggregationConfig::default(),
            history: HistoryConfig::default(),
            areas: default_areas(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Timer intervals are within bounds
    /// - The aggregation window is within `1..=10`
    /// - The probe table holds at least one probe
    /// - Area names are non-empty and unique (case-insensitive)
    /// - No probe is bound to more than one area
    /// - Overrides are ordered and thresholds are finite
    ///
    /// # Example
    ///
    /// ```
    /// use envmon_service::Config;
    ///
    /// let config = Config::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        errors.extend(self.scheduler.validate());
        errors.extend(self.history.validate());

        if !(1..=HISTORY_CAPACITY).contains(&self.aggregation.window) {
            errors.push(ValidationError {
                field: "aggregation.window".to_string(),
                message: format!(
                    "window {} is out of range (1-{})",
                    self.aggregation.window, HISTORY_CAPACITY
                ),
            });
        }

        let mut seen_names = HashSet::new();
        let mut seen_probes = HashSet::new();
        for (i, area) in self.areas.iter().enumerate() {
            let prefix = format!("areas[{}]", i);
            errors.extend(validate_area(area, &prefix));

            let name = normalize_name(&area.name);
            if !name.is_empty() && !seen_names.insert(name.clone()) {
                errors.push(ValidationError {
                    field: format!("{}.name", prefix),
                    message: format!("duplicate area name '{}'", name),
                });
            }
            for probe in &area.probes {
                if !seen_probes.insert(probe.clone()) {
                    errors.push(ValidationError {
                        field: format!("{}.probes", prefix),
                        message: format!("probe '{}' is bound to more than one area", probe),
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    ///
    /// This is a convenience method that combines `load()` and `validate()`.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Engine settings derived from this configuration.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            areas: self.areas.clone(),
            aggregation: self.aggregation,
            display_metric: self.display_metric,
            max_probes: self.history.max_probes,
            probe_policy: self.history.policy,
        }
    }

    /// Copy the runtime-adjustable settings of a running monitor back into
    /// this configuration.
    pub fn apply_monitor(&mut self, monitor: &Monitor) {
        self.areas = monitor.area_configs();
        self.aggregation = monitor.aggregation();
        self.display_metric = monitor.display_metric();
    }
}

fn validate_area(area: &AreaConfig, prefix: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if normalize_name(&area.name).is_empty() {
        errors.push(ValidationError {
            field: format!("{}.name", prefix),
            message: "area name cannot be empty".to_string(),
        });
    }

    if let (Some(min), Some(max)) = (area.override_min, area.override_max)
        && min > max
    {
        errors.push(ValidationError {
            field: format!("{}.override_min", prefix),
            message: format!("override_min {} is above override_max {}", min, max),
        });
    }

    for metric in Metric::ALL {
        if area
            .thresholds
            .ladder(metric)
            .raw()
            .iter()
            .any(|v| !v.is_finite())
        {
            errors.push(ValidationError {
                field: format!("{}.thresholds.{}", prefix, metric.as_str()),
                message: "thresholds must be finite numbers".to_string(),
            });
        }
    }

    errors
}

/// Minimum fast tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 100;
/// Maximum fast tick interval in milliseconds (1 minute).
pub const MAX_TICK_INTERVAL_MS: u64 = 60_000;
/// Maximum diagnostic interval in seconds (1 day).
pub const MAX_DIAGNOSTIC_INTERVAL_SECS: u64 = 86_400;
/// Maximum delay between two emitted messages in milliseconds.
pub const MAX_EMIT_PACING_MS: u64 = 1_000;

/// Timer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Fast tick: aggregate, map, highlight, emit.
    pub tick_interval_ms: u64,
    /// Slow tick: diagnostic summary.
    pub diagnostic_interval_secs: u64,
    /// Delay between successive outbound messages.
    pub emit_pacing_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
            diagnostic_interval_secs: 300,
            emit_pacing_ms: 10,
        }
    }
}

impl SchedulerConfig {
    /// Fast tick period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Diagnostic period.
    pub fn diagnostic_interval(&self) -> Duration {
        Duration::from_secs(self.diagnostic_interval_secs)
    }

    /// Emitter pacing delay.
    pub fn emit_pacing(&self) -> Duration {
        Duration::from_millis(self.emit_pacing_ms)
    }

    /// Validate scheduler configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS).contains(&self.tick_interval_ms) {
            errors.push(ValidationError {
                field: "scheduler.tick_interval_ms".to_string(),
                message: format!(
                    "tick interval {} is out of range ({}-{} ms)",
                    self.tick_interval_ms, MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS
                ),
            });
        }

        if !(1..=MAX_DIAGNOSTIC_INTERVAL_SECS).contains(&self.diagnostic_interval_secs) {
            errors.push(ValidationError {
                field: "scheduler.diagnostic_interval_secs".to_string(),
                message: format!(
                    "diagnostic interval {} is out of range (1-{} seconds)",
                    self.diagnostic_interval_secs, MAX_DIAGNOSTIC_INTERVAL_SECS
                ),
            });
        }

        if self.emit_pacing_ms > MAX_EMIT_PACING_MS {
            errors.push(ValidationError {
                field: "scheduler.emit_pacing_ms".to_string(),
                message: format!(
                    "emit pacing {} is too long (maximum {} ms)",
                    self.emit_pacing_ms, MAX_EMIT_PACING_MS
                ),
            });
        }

        errors
    }
}

/// Probe table settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Bound on tracked probes.
    pub max_probes: usize,
    /// Policy when a new probe arrives at the bound.
    pub policy: ProbePolicy,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_probes: DEFAULT_MAX_PROBES,
            policy: ProbePolicy::default(),
        }
    }
}

impl HistoryConfig {
    /// Validate history configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.max_probes == 0 {
            errors.push(ValidationError {
                field: "history.max_probes".to_string(),
                message: "max_probes must be at least 1".to_string(),
            });
        }
        errors
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `scheduler.tick_interval_ms` or `areas[0].name`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("envmon")
        .join("config.toml")
}
