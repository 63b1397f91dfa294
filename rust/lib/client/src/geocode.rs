//! Reverse geocoding against a Nominatim-compatible service.

use std::sync::Arc;

use async_trait::async_trait;
use scout_core::{EndpointConfig, LatLon, ScoutError};
use serde::{Deserialize, Serialize};

use crate::{parse, ApiError, Endpoint, NoAuth};

pub const UNKNOWN: &str = "Unknown";

/// City and country of a clicked point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub city: String,
    pub country: String,
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync + 'static {
    async fn reverse(&self, at: LatLon) -> Result<Place, ApiError>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReverseResponse {
    address: Address,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
    country: Option<String>,
}

impl Address {
    /// First of city, town, village, county; "Unknown" when none.
    fn into_place(self) -> Place {
        let city = [self.city, self.town, self.village, self.county]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let country = self
            .country
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());
        Place { city, country }
    }
}

pub struct NominatimClient {
    endpoint: Endpoint,
}

impl NominatimClient {
    /// The reqwest client should carry a User-Agent; Nominatim rejects
    /// anonymous clients.
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            endpoint: Endpoint::new(http, base_url, Arc::new(NoAuth)),
        }
    }

    pub fn from_config(cfg: &EndpointConfig) -> Result<Self, ScoutError> {
        let http = crate::http_client(&cfg.user_agent, cfg.timeout())?;
        Ok(Self::new(http, &cfg.geocoder_url))
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, at: LatLon) -> Result<Place, ApiError> {
        let req = self.endpoint.http().get(self.endpoint.url("/reverse")).query(&[
            ("format", "json".to_string()),
            ("lat", at.lat.to_string()),
            ("lon", at.lon.to_string()),
            ("zoom", "10".to_string()),
            ("addressdetails", "1".to_string()),
        ]);
        let resp = req.send().await?;
        let body: ReverseResponse = parse(resp).await?;
        Ok(body.address.into_place())
    }
}
