//! The weather scaler and the host-facing [`Scaler`] contract.
//!
//! Each query performs exactly one GET against the configured endpoint,
//! decodes the first reading, and derives a value from it. Nothing is
//! cached between calls, so `is_active` and `get_metrics` may run
//! concurrently on the same instance.

use std::future::Future;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::{MetricsErrorPolicy, ScalerConfig, TriggerConfig};
use crate::error::{ScalerError, ScalerResult};
use crate::metric::{METRIC_NAME, MetricSample, MetricSpec};
use crate::reading::WeatherDataList;

/// What an autoscaling host asks of every trigger.
pub trait Scaler: Send + Sync {
    /// Whether the workload should be scaled up from zero.
    fn is_active(&self) -> impl Future<Output = ScalerResult<bool>> + Send;

    /// Current metric values, reported under `metric_name`.
    fn get_metrics(
        &self,
        metric_name: &str,
    ) -> impl Future<Output = ScalerResult<Vec<MetricSample>>> + Send;

    /// Metric descriptors for the host's autoscaler. Performs no I/O.
    fn metric_spec(&self) -> Vec<MetricSpec>;

    /// Release held resources. Safe to call more than once.
    fn close(&self) -> impl Future<Output = ()> + Send;
}

/// Temperature-threshold scaler backed by a weather endpoint.
pub struct WeatherScaler {
    config: TriggerConfig,
    metrics_on_error: MetricsErrorPolicy,
    /// `None` once closed.
    client: RwLock<Option<reqwest::Client>>,
}

impl WeatherScaler {
    /// Validate the host configuration and build the HTTP client.
    pub fn new(config: ScalerConfig) -> ScalerResult<Self> {
        let trigger = TriggerConfig::from_metadata(&config.trigger_metadata)?;

        let client = reqwest::Client::builder()
            .timeout(config.global_http_timeout)
            .build()
            .map_err(|e| ScalerError::config(format!("building http client: {e}")))?;

        info!(
            endpoint = %trigger.endpoint,
            preference = %trigger.preference,
            threshold = trigger.threshold,
            timeout_ms = config.global_http_timeout.as_millis() as u64,
            "weather scaler created"
        );

        Ok(Self::with_client(trigger, client).with_metrics_policy(config.metrics_on_error))
    }

    /// Build a scaler around an existing client (shared pool, custom TLS).
    pub fn with_client(config: TriggerConfig, client: reqwest::Client) -> Self {
        Self {
            config,
            metrics_on_error: MetricsErrorPolicy::default(),
            client: RwLock::new(Some(client)),
        }
    }

    pub fn with_metrics_policy(mut self, policy: MetricsErrorPolicy) -> Self {
        self.metrics_on_error = policy;
        self
    }

    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    pub async fn is_closed(&self) -> bool {
        self.client.read().await.is_none()
    }

    /// Fetch the endpoint and extract the preferred, truncated value.
    pub async fn current_value(&self) -> ScalerResult<i64> {
        let list = self.fetch().await?;
        let reading = list.first_reading(self.config.endpoint.as_str())?;
        let value = reading.extract(self.config.preference);

        debug!(
            endpoint = %self.config.endpoint,
            preference = %self.config.preference,
            value,
            "weather reading extracted"
        );
        Ok(value)
    }

    async fn fetch(&self) -> ScalerResult<WeatherDataList> {
        // Clone the handle so the lock is not held across the request.
        let client = self.client.read().await.clone().ok_or(ScalerError::Closed)?;

        let response = client.get(self.config.endpoint.clone()).send().await?;

        // The status is not checked: a non-2xx body is still decoded and
        // surfaces as a decode error if it is not a weather document.
        let status = response.status();
        if !status.is_success() {
            debug!(endpoint = %self.config.endpoint, %status, "weather endpoint returned non-2xx");
        }

        let body = response.bytes().await?;
        WeatherDataList::from_slice(&body)
    }
}

impl Scaler for WeatherScaler {
    async fn is_active(&self) -> ScalerResult<bool> {
        let value = self.current_value().await?;
        Ok(value > self.config.threshold)
    }

    async fn get_metrics(&self, metric_name: &str) -> ScalerResult<Vec<MetricSample>> {
        let value = match self.current_value().await {
            Ok(value) => value,
            Err(e) if self.metrics_on_error == MetricsErrorPolicy::ReportZero => {
                warn!(
                    endpoint = %self.config.endpoint,
                    metric = metric_name,
                    error = %e,
                    "weather fetch failed, reporting zero"
                );
                0
            }
            Err(e) => return Err(e),
        };

        Ok(vec![MetricSample::now(metric_name, value)])
    }

    fn metric_spec(&self) -> Vec<MetricSpec> {
        vec![MetricSpec::external_average(METRIC_NAME, self.config.threshold)]
    }

    async fn close(&self) {
        if self.client.write().await.take().is_some() {
            debug!(endpoint = %self.config.endpoint, "weather scaler closed");
        }
    }
}
