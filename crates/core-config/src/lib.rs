//! Configuration loading and parsing.
//!
//! Parses `length-gauge.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [gauge]
//! max_count = 280
//! warning_cutoff_percent = 92.8
//!
//! [length]
//! metric = "utf16"   # or "weighted"
//! ```
//!
//! Every field is optional. Unknown fields are ignored (TOML deserialization
//! tolerance) and a file that fails to parse falls back to defaults. Values
//! that parse but are unusable are handled in `Config::resolve`: a
//! non-positive max count or an unknown metric is an error, an out-of-range
//! warning cutoff is clamped into `[0, 100]` and logged.

use anyhow::Result;
use core_gauge::{DEFAULT_MAX_COUNT, Gauge, GaugeError, MaxCount, WARNING_CUTOFF_PERCENT};
use core_text::MetricKind;
use core_text::metric::UnknownMetric;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "length-gauge.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("[gauge] {0}")]
    Gauge(#[from] GaugeError),
    #[error("[length] {0}")]
    Metric(#[from] UnknownMetric),
}

#[derive(Debug, Deserialize, Clone)]
pub struct GaugeConfig {
    #[serde(default = "GaugeConfig::default_max_count")]
    pub max_count: i64,
    #[serde(default = "GaugeConfig::default_warning_cutoff")]
    pub warning_cutoff_percent: f64,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            max_count: Self::default_max_count(),
            warning_cutoff_percent: Self::default_warning_cutoff(),
        }
    }
}

impl GaugeConfig {
    const fn default_max_count() -> i64 {
        DEFAULT_MAX_COUNT as i64
    }
    const fn default_warning_cutoff() -> f64 {
        WARNING_CUTOFF_PERCENT
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LengthConfig {
    #[serde(default = "LengthConfig::default_metric")]
    pub metric: String,
}

impl Default for LengthConfig {
    fn default() -> Self {
        Self {
            metric: Self::default_metric(),
        }
    }
}

impl LengthConfig {
    fn default_metric() -> String {
        MetricKind::default().as_str().to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub gauge: GaugeConfig,
    #[serde(default)]
    pub length: LengthConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // file contents as read, when parsing succeeded
    pub file: ConfigFile,    // parsed (or default) data
    pub source: Option<PathBuf>,
}

/// Command line values that take precedence over the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub max_count: Option<i64>,
    pub metric: Option<MetricKind>,
}

/// Validated settings ready to build a gauge from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeSettings {
    pub max_count: MaxCount,
    pub warning_cutoff: f64,
    pub metric: MetricKind,
}

impl GaugeSettings {
    pub fn gauge(&self) -> Gauge {
        Gauge::new(self.max_count).with_warning_cutoff(self.warning_cutoff)
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("length-gauge").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                source: Some(path),
            })
        }
        Err(e) => {
            warn!(
                target: "config",
                path = %path.display(),
                error = %e,
                "config_parse_failed_using_defaults"
            );
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Merge overrides into the file values and validate the result.
    pub fn resolve(&self, overrides: ConfigOverrides) -> Result<GaugeSettings, ConfigError> {
        let raw_max = overrides.max_count.unwrap_or(self.file.gauge.max_count);
        let max_count = MaxCount::try_from(raw_max)?;
        let metric = match overrides.metric {
            Some(metric) => metric,
            None => self.file.length.metric.parse::<MetricKind>()?,
        };
        Ok(GaugeSettings {
            max_count,
            warning_cutoff: self.effective_warning_cutoff(),
            metric,
        })
    }

    /// Warning cutoff clamped into `[0, 100]`; NaN falls back to the default.
    pub fn effective_warning_cutoff(&self) -> f64 {
        let raw = self.file.gauge.warning_cutoff_percent;
        let clamped = if raw.is_nan() {
            WARNING_CUTOFF_PERCENT
        } else {
            raw.clamp(0.0, 100.0)
        };
        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                "warning_cutoff_clamped"
            );
        }
        clamped
    }
}
