//! warpgrid-weather — temperature-threshold scaler for external autoscalers.
//!
//! Polls a weather endpoint, picks one temperature field from the first
//! reading, and answers the two questions an autoscaling host asks of every
//! trigger: "is it active?" and "what is the current metric value?".
//!
//! # Architecture
//!
//! ```text
//! ScalerConfig (metadata map + http timeout + error policy)
//!   └── WeatherScaler::new() ── validates → TriggerConfig
//!         ├── is_active()     GET host → WeatherDataList → value > threshold
//!         ├── get_metrics()   GET host → WeatherDataList → [MetricSample]
//!         ├── metric_spec()   no I/O → [MetricSpec] (External, AverageValue)
//!         └── close()         drops the HTTP client
//! ```
//!
//! Every query is a single, independent round trip. There is no retry,
//! caching, or background polling; the host owns the cadence.

pub mod config;
pub mod error;
pub mod metric;
pub mod reading;
pub mod scaler;

pub use config::{MetricsErrorPolicy, Preference, ScalerConfig, ScalerFile, TriggerConfig};
pub use error::{ScalerError, ScalerResult};
pub use metric::{MetricSample, MetricSpec, normalize_metric_name};
pub use reading::{WeatherData, WeatherDataList};
pub use scaler::{Scaler, WeatherScaler};
