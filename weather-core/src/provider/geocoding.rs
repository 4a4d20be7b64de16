use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{error::ToolError, model::GeocodingCandidate};

use super::{Geocoder, ProviderId, network_error, success_body};

/// Upper bound on candidates requested from and returned by the provider.
pub const MAX_RESULTS: usize = 5;

/// Open-Meteo geocoding search client.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    endpoint: String,
    http: Client,
}

impl OpenMeteoGeocoder {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmSearchResponse {
    #[serde(default)]
    results: Option<Vec<OmPlace>>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    admin1: Option<String>,
}

impl From<OmPlace> for GeocodingCandidate {
    fn from(place: OmPlace) -> Self {
        Self {
            name: place.name,
            latitude: place.latitude,
            longitude: place.longitude,
            country: place.country.unwrap_or_default(),
            admin1: place.admin1,
        }
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<GeocodingCandidate>, ToolError> {
        let provider = ProviderId::Geocoding;
        debug!(query, "Geocoding search");

        let count = MAX_RESULTS.to_string();
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("name", query),
                ("count", count.as_str()),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| network_error(provider, e))?;

        let body = success_body(provider, res).await?;

        let parsed: OmSearchResponse =
            serde_json::from_str(&body).map_err(|e| ToolError::InvalidResponse {
                provider,
                message: e.to_string(),
            })?;

        let candidates: Vec<GeocodingCandidate> = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .take(MAX_RESULTS)
            .map(GeocodingCandidate::from)
            .collect();

        debug!(query, matches = candidates.len(), "Geocoding search finished");
        Ok(candidates)
    }
}
