//! Scaler configuration: trigger metadata validation and the scaler file.
//!
//! The host hands every trigger a flat string map. [`TriggerConfig`] is the
//! typed form of that map, validated once at construction so that queries
//! never see a half-configured scaler.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{ScalerError, ScalerResult};

/// Timeout applied to the HTTP client when the host does not set one.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(3);

const KEY_THRESHOLD: &str = "threshold";
const KEY_HOST: &str = "host";
const KEY_PREFERENCE: &str = "preference";

/// Which temperature field of the first reading drives the scaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    /// `min_temp`, configured as `MinTemp`.
    MinValue,
    /// `max_temp`, configured as `MaxTemp`.
    MaxValue,
    /// `the_temp`, configured as `TheTemp`.
    CurrentValue,
}

impl Preference {
    /// The literal used in trigger metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MinValue => "MinTemp",
            Self::MaxValue => "MaxTemp",
            Self::CurrentValue => "TheTemp",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preference {
    type Err = ScalerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MinTemp" => Ok(Self::MinValue),
            "MaxTemp" => Ok(Self::MaxValue),
            "TheTemp" => Ok(Self::CurrentValue),
            "" => Err(ScalerError::config("no preference given")),
            other => Err(ScalerError::config(format!(
                "unknown preference {other:?} (expected MinTemp, MaxTemp or TheTemp)"
            ))),
        }
    }
}

/// Validated trigger configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerConfig {
    /// Weather endpoint queried on every call.
    pub endpoint: Url,
    pub preference: Preference,
    /// Values strictly above this make the trigger active. Negative values
    /// are accepted and produce an always-active trigger for most climates.
    pub threshold: i64,
}

impl TriggerConfig {
    /// Parse and validate the host's trigger metadata.
    ///
    /// Recognized keys are `threshold`, `host` and `preference`; all three
    /// are required. Any other key is ignored.
    pub fn from_metadata(metadata: &HashMap<String, String>) -> ScalerResult<Self> {
        let threshold = match metadata.get(KEY_THRESHOLD).map(|v| v.as_str()) {
            Some("") | None => return Err(ScalerError::config("no threshold given")),
            Some(raw) => raw.parse::<i64>().map_err(|e| {
                ScalerError::config(format!("threshold: error parsing threshold {raw:?}: {e}"))
            })?,
        };

        let endpoint = match metadata.get(KEY_HOST) {
            Some(raw) => Url::parse(raw)
                .map_err(|e| ScalerError::config(format!("invalid URL {raw:?}: {e}")))?,
            None => return Err(ScalerError::config("no host URI given")),
        };

        let preference = metadata
            .get(KEY_PREFERENCE)
            .map(String::as_str)
            .unwrap_or_default()
            .parse::<Preference>()?;

        Ok(Self {
            endpoint,
            preference,
            threshold,
        })
    }
}

/// How `get_metrics` reacts when the fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricsErrorPolicy {
    /// Return the error to the host.
    #[default]
    Propagate,
    /// Log the error and report a single zero-valued sample, for hosts
    /// that expect metric queries to never fail.
    ReportZero,
}

/// Everything the host passes when constructing a scaler.
#[derive(Debug, Clone)]
pub struct ScalerConfig {
    /// Raw trigger metadata, validated by [`TriggerConfig::from_metadata`].
    pub trigger_metadata: HashMap<String, String>,
    /// Timeout shared by every request the scaler makes.
    pub global_http_timeout: Duration,
    pub metrics_on_error: MetricsErrorPolicy,
}

impl ScalerConfig {
    pub fn new(trigger_metadata: HashMap<String, String>) -> Self {
        Self {
            trigger_metadata,
            global_http_timeout: DEFAULT_HTTP_TIMEOUT,
            metrics_on_error: MetricsErrorPolicy::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.global_http_timeout = timeout;
        self
    }

    pub fn with_metrics_policy(mut self, policy: MetricsErrorPolicy) -> Self {
        self.metrics_on_error = policy;
        self
    }
}

/// On-disk scaler description used by `weatherctl`.
///
/// ```toml
/// http_timeout = "3s"
/// metrics_on_error = "propagate"
///
/// [metadata]
/// host = "https://api.example/w"
/// threshold = 20
/// preference = "TheTemp"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerFile {
    pub http_timeout: Option<String>,
    pub metrics_on_error: Option<MetricsErrorPolicy>,
    #[serde(default)]
    pub metadata: HashMap<String, toml::Value>,
}

impl ScalerFile {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading scaler file {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Flatten the metadata table into the host's string map.
    ///
    /// Scalars are stringified so that `threshold = 20` and
    /// `threshold = "20"` behave the same; validation still happens in
    /// [`TriggerConfig::from_metadata`].
    pub fn into_scaler_config(self) -> anyhow::Result<ScalerConfig> {
        let mut metadata = HashMap::with_capacity(self.metadata.len());
        for (key, value) in self.metadata {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                other => anyhow::bail!(
                    "metadata.{key}: expected a scalar, got {}",
                    other.type_str()
                ),
            };
            metadata.insert(key, value);
        }

        let timeout = match self.http_timeout.as_deref() {
            Some(raw) => parse_duration(raw)
                .with_context(|| format!("http_timeout: invalid duration {raw:?}"))?,
            None => DEFAULT_HTTP_TIMEOUT,
        };

        Ok(ScalerConfig::new(metadata)
            .with_timeout(timeout)
            .with_metrics_policy(self.metrics_on_error.unwrap_or_default()))
    }
}

/// Parse a duration string like "3s", "500ms", "1m".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
