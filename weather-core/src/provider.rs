use crate::{
    Config,
    error::ToolError,
    model::{DailyForecast, GeocodingCandidate},
    provider::{forecast::OpenMeteoForecast, geocoding::OpenMeteoGeocoder},
};
use async_trait::async_trait;
use reqwest::Response;
use std::{fmt::Debug, sync::Arc};

pub mod forecast;
pub mod geocoding;

/// Identifies which external API an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Geocoding,
    Forecast,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Geocoding => "geocoding service",
            ProviderId::Forecast => "forecast service",
        }
    }

}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves free text to candidate places, best match first.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn search(&self, query: &str) -> Result<Vec<GeocodingCandidate>, ToolError>;
}

/// Resolves coordinates to a daily forecast, earliest day first.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Vec<DailyForecast>, ToolError>;
}

/// Construct the geocoding client for the configured endpoint.
pub fn geocoder_from_config(config: &Config) -> Arc<dyn Geocoder> {
    Arc::new(OpenMeteoGeocoder::new(config.geocoding_url.clone()))
}

/// Construct the forecast client for the configured endpoint.
pub fn forecast_from_config(config: &Config) -> Arc<dyn ForecastProvider> {
    Arc::new(OpenMeteoForecast::new(config.forecast_url.clone()))
}

/// Read the body of a response, failing with the status on non-success.
pub(crate) async fn success_body(
    provider: ProviderId,
    res: Response,
) -> Result<String, ToolError> {
    let status = res.status();

    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(ToolError::Provider {
            provider,
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    res.text().await.map_err(|e| network_error(provider, e))
}

/// Wrap a transport failure without the request URL, whose query carries coordinates.
pub(crate) fn network_error(provider: ProviderId, source: reqwest::Error) -> ToolError {
    ToolError::Network {
        provider,
        source: source.without_url(),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_ids_have_distinct_names() {
        assert_eq!(ProviderId::Geocoding.to_string(), "geocoding service");
        assert_eq!(ProviderId::Forecast.to_string(), "forecast service");
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("bad request"), "bad request");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(250);
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn clients_are_built_from_config() {
        let cfg = Config::default();

        let geocoder = geocoder_from_config(&cfg);
        let forecast = forecast_from_config(&cfg);

        assert!(format!("{geocoder:?}").contains("geocoding-api.open-meteo.com"));
        assert!(format!("{forecast:?}").contains("api.open-meteo.com"));
    }
}
