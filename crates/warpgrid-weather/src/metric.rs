//! Metric types exchanged with the autoscaling host.
//!
//! [`MetricSpec`] mirrors the external-metric shape of the Kubernetes
//! HPA `autoscaling/v2` API so that it serializes to what the host
//! controller expects. [`MetricSample`] is the per-query value.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Base metric name declared in the metric spec.
pub const METRIC_NAME: &str = "weather";

/// A single reported metric value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    pub metric_name: String,
    pub value: i64,
    /// Seconds since the Unix epoch at the time of the query.
    pub timestamp: u64,
}

impl MetricSample {
    /// A sample stamped with the current time.
    pub fn now(metric_name: &str, value: i64) -> Self {
        Self {
            metric_name: metric_name.to_string(),
            value,
            timestamp: epoch_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricSourceType {
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricTargetType {
    AverageValue,
}

/// How the host should interpret the values this scaler reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSpec {
    #[serde(rename = "type")]
    pub source_type: MetricSourceType,
    pub external: ExternalMetricSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalMetricSource {
    pub metric: MetricIdentifier,
    pub target: MetricTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricIdentifier {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTarget {
    #[serde(rename = "type")]
    pub target_type: MetricTargetType,
    pub average_value: i64,
}

impl MetricSpec {
    /// An external metric compared as an average against `target`.
    pub fn external_average(name: &str, target: i64) -> Self {
        Self {
            source_type: MetricSourceType::External,
            external: ExternalMetricSource {
                metric: MetricIdentifier {
                    name: normalize_metric_name(name),
                },
                target: MetricTarget {
                    target_type: MetricTargetType::AverageValue,
                    average_value: target,
                },
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.external.metric.name
    }

    pub fn target_average_value(&self) -> i64 {
        self.external.target.average_value
    }
}

/// Replace characters the host rejects in metric names with `-`.
pub fn normalize_metric_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '.' | ':' | '%' => '-',
            c => c,
        })
        .collect()
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_replaces_reserved_characters() {
        assert_eq!(normalize_metric_name("weather"), "weather");
        assert_eq!(
            normalize_metric_name("ns/api.example:80%"),
            "ns-api-example-80-"
        );
    }

    #[test]
    fn external_average_spec() {
        let spec = MetricSpec::external_average(METRIC_NAME, 42);
        assert_eq!(spec.source_type, MetricSourceType::External);
        assert_eq!(spec.name(), "weather");
        assert_eq!(spec.external.target.target_type, MetricTargetType::AverageValue);
        assert_eq!(spec.target_average_value(), 42);
    }

    #[test]
    fn spec_serializes_in_hpa_shape() {
        let spec = MetricSpec::external_average(METRIC_NAME, 20);
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "External");
        assert_eq!(json["external"]["metric"]["name"], "weather");
        assert_eq!(json["external"]["target"]["type"], "AverageValue");
        assert_eq!(json["external"]["target"]["averageValue"], 20);
    }

    #[test]
    fn sample_is_stamped_now() {
        let before = epoch_secs();
        let sample = MetricSample::now("s0-weather", 25);
        assert_eq!(sample.metric_name, "s0-weather");
        assert_eq!(sample.value, 25);
        assert!(sample.timestamp >= before);
    }
}
