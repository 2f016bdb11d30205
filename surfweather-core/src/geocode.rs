//! City search against the Open-Meteo geocoding service.
//!
//! No API key is required. The response carries an optional `results`
//! collection; its absence means "no matches", not an error.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use std::time::Duration;

use crate::error::{WeatherError, truncate_body};
use crate::model::Location;

const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Fixed cap on returned candidates.
pub const CANDIDATE_LIMIT: u8 = 5;

/// Seam for the geocoding collaborator, stubbed in controller tests.
#[async_trait]
pub trait CitySearch: Send + Sync + Debug {
    async fn search(&self, query: &str) -> Result<Vec<Location>, WeatherError>;
}

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: Client,
    base_url: String,
    language: String,
}

impl GeocodeClient {
    pub fn new(language: impl Into<String>) -> Result<Self, WeatherError> {
        Self::with_base_url(GEOCODING_URL, language)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            language: language.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    #[serde(default)]
    id: u64,
    name: String,
    #[serde(default)]
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl From<GeocodingResult> for Location {
    fn from(raw: GeocodingResult) -> Self {
        Location {
            id: raw.id,
            name: raw.name,
            country: raw.country.unwrap_or_else(|| "Unbekannt".to_string()),
            latitude: raw.latitude,
            longitude: raw.longitude,
        }
    }
}

#[async_trait]
impl CitySearch for GeocodeClient {
    async fn search(&self, query: &str) -> Result<Vec<Location>, WeatherError> {
        let count = CANDIDATE_LIMIT.to_string();
        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("name", query),
                ("count", count.as_str()),
                ("language", self.language.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "geocoding request failed");
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: GeocodingResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::decode(format!("geocoding JSON: {e}")))?;

        let candidates: Vec<Location> = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Location::from)
            .collect();

        tracing::debug!(query, count = candidates.len(), "geocoding completed");
        Ok(candidates)
    }
}
