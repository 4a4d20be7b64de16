use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{error::ToolError, model::DailyForecast, weather_code};

use super::{ForecastProvider, ProviderId, network_error, success_body};

pub const FORECAST_DAYS: u8 = 7;

const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum,wind_speed_10m_max";

/// Open-Meteo daily forecast client.
#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    endpoint: String,
    http: Client,
}

impl OpenMeteoForecast {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    #[serde(default)]
    daily: Option<OmDaily>,
}

/// Parallel arrays, one slot per day. Any slot may be null.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OmDaily {
    time: Vec<Option<String>>,
    weather_code: Vec<Option<i64>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<Option<f64>>,
}

fn slot<T: Copy>(values: &[Option<T>], i: usize) -> Option<T> {
    values.get(i).copied().flatten()
}

impl OmDaily {
    /// Day `i`, or `None` if any required value is missing.
    fn day(&self, i: usize) -> Option<DailyForecast> {
        let date = self.time.get(i)?.as_deref()?.parse::<NaiveDate>().ok()?;
        let code = slot(&self.weather_code, i)?;

        Some(DailyForecast {
            date,
            weather_code: code,
            weather_description: weather_code::describe(code).to_string(),
            temperature_max: slot(&self.temperature_2m_max, i)?,
            temperature_min: slot(&self.temperature_2m_min, i)?,
            precipitation_sum: slot(&self.precipitation_sum, i)?,
            wind_speed_max: slot(&self.wind_speed_10m_max, i)?,
        })
    }

    fn into_days(self) -> Vec<DailyForecast> {
        let days: Vec<DailyForecast> = (0..self.time.len()).filter_map(|i| self.day(i)).collect();

        let dropped = self.time.len() - days.len();
        if dropped > 0 {
            warn!(dropped, "Skipped forecast days with missing values");
        }
        days
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoForecast {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Vec<DailyForecast>, ToolError> {
        let provider = ProviderId::Forecast;
        debug!("Requesting daily forecast");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", FORECAST_DAYS.to_string()),
            ])
            .send()
            .await
            .map_err(|e| network_error(provider, e))?;

        let body = success_body(provider, res).await?;

        let parsed: OmForecastResponse =
            serde_json::from_str(&body).map_err(|e| ToolError::InvalidResponse {
                provider,
                message: e.to_string(),
            })?;

        let days = parsed.daily.unwrap_or_default().into_days();
        debug!(days = days.len(), "Daily forecast received");
        Ok(days)
    }
}
