//! Weather endpoint response model and value extraction.

use serde::{Deserialize, Deserializer};

use crate::config::Preference;
use crate::error::{ScalerError, ScalerResult};

/// Top-level response document. Only `consolidated_weather` is read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherDataList {
    /// A missing or `null` list decodes as empty and is reported by
    /// [`WeatherDataList::first_reading`].
    #[serde(rename = "consolidated_weather", default, deserialize_with = "null_as_empty")]
    pub list: Vec<WeatherData>,
}

/// A single reading. Extra fields in the response are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WeatherData {
    pub min_temp: f64,
    pub max_temp: f64,
    pub the_temp: f64,
}

impl WeatherDataList {
    /// Decode a raw response body.
    pub fn from_slice(body: &[u8]) -> ScalerResult<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// The first reading, or `DataAbsent` when the list is empty.
    ///
    /// `source` names the endpoint in the error message.
    pub fn first_reading(&self, source: &str) -> ScalerResult<&WeatherData> {
        self.list
            .first()
            .ok_or_else(|| ScalerError::DataAbsent(source.to_string()))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<WeatherData>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<WeatherData>>::deserialize(deserializer)?.unwrap_or_default())
}

impl WeatherData {
    /// The preferred field, truncated toward zero.
    ///
    /// Truncation (not rounding) is part of the threshold contract:
    /// `5.9` reports as `5` and `-3.7` as `-3`. Out-of-range values
    /// saturate and NaN becomes 0.
    pub fn extract(&self, preference: Preference) -> i64 {
        let raw = match preference {
            Preference::MinValue => self.min_temp,
            Preference::MaxValue => self.max_temp,
            Preference::CurrentValue => self.the_temp,
        };
        raw as i64
    }
}
