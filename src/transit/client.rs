//! REST client for the TfL Unified API.
//!
//! Only the fields the dashboard renders are decoded. The flexible
//! `additionalProperties` list is turned into typed optional fields here so
//! nothing downstream has to scan key/value pairs.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::config::{ApiConfig, SecureString};
use crate::transit::error::TransitError;
use crate::transit::model::{Arrival, Coordinates, Stop, StopKind};

const NEARBY_FAILED: &str = "Failed to fetch nearby stops";

/// Source of stops and live arrivals.
#[async_trait]
pub trait TransitApi: Send + Sync {
    /// Stops around `at`, nearest first.
    async fn find_nearby_stops(
        &self,
        at: Coordinates,
        credential: &SecureString,
    ) -> Result<Vec<Stop>, TransitError>;

    /// Predicted arrivals for one stop, soonest first.
    async fn fetch_arrivals(
        &self,
        stop_id: &str,
        credential: &SecureString,
    ) -> Result<Vec<Arrival>, TransitError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StopPointsResponse {
    #[serde(default)]
    stop_points: Option<Vec<RawStopPoint>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStopPoint {
    id: String,
    #[serde(default)]
    common_name: String,
    #[serde(default)]
    stop_type: String,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    status: Option<bool>,
    #[serde(default)]
    stop_letter: Option<String>,
    #[serde(default)]
    additional_properties: Vec<AdditionalProperty>,
}

#[derive(Debug, Deserialize)]
struct AdditionalProperty {
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArrival {
    #[serde(default)]
    line_id: String,
    #[serde(default)]
    line_name: String,
    #[serde(default)]
    platform_name: Option<String>,
    #[serde(default)]
    towards: Option<String>,
    #[serde(default)]
    destination_name: Option<String>,
    #[serde(default)]
    time_to_station: i64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Typed view over the `additionalProperties` fields the dashboard uses.
#[derive(Debug, Default, PartialEq)]
struct StopProperties {
    towards: Option<String>,
    compass_point: Option<String>,
}

impl StopProperties {
    fn extract(properties: &[AdditionalProperty]) -> Self {
        let lookup = |key: &str| {
            properties
                .iter()
                .find(|p| p.key == key)
                .and_then(|p| non_empty(p.value.clone()))
        };
        Self {
            towards: lookup("Towards"),
            compass_point: lookup("CompassPoint"),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<RawStopPoint> for Stop {
    fn from(raw: RawStopPoint) -> Self {
        let properties = StopProperties::extract(&raw.additional_properties);
        Stop {
            id: raw.id,
            name: raw.common_name,
            kind: StopKind::from_stop_type(&raw.stop_type),
            distance: raw.distance,
            towards: properties.towards,
            direction: properties.compass_point,
            stop_letter: non_empty(raw.stop_letter),
            disrupted: raw.status == Some(false),
            arrivals: Vec::new(),
        }
    }
}

impl From<RawArrival> for Arrival {
    fn from(raw: RawArrival) -> Self {
        Arrival {
            line_id: raw.line_id,
            line_name: raw.line_name,
            platform: non_empty(raw.platform_name),
            towards: non_empty(raw.towards),
            destination: raw.destination_name.unwrap_or_default(),
            time_to_station: raw.time_to_station.clamp(0, i64::from(u32::MAX)) as u32,
        }
    }
}

/// Sort by distance (stable) and keep the nearest `limit`.
fn nearest(mut stops: Vec<Stop>, limit: usize) -> Vec<Stop> {
    stops.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    stops.truncate(limit);
    stops
}

/// HTTP client for the TfL `StopPoint` endpoints.
pub struct TflClient {
    http: Client,
    base_url: String,
    app_id: String,
    stop_types: String,
    radius_meters: u32,
    max_stops: usize,
}

impl TflClient {
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_id: config.app_id.clone(),
            stop_types: config
                .stop_types
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(","),
            radius_meters: config.radius_meters,
            max_stops: config.max_stops,
        })
    }

    /// Build `{base_url}/{segments...}?{query}&app_id=..&app_key=..`.
    fn endpoint(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        credential: &SecureString,
    ) -> Result<Url, TransitError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| TransitError::api(format!("Invalid API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| TransitError::api("Invalid API base URL"))?
            .pop_if_empty()
            .extend(segments);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("app_id", &self.app_id);
            pairs.append_pair("app_key", credential.expose().trim());
        }
        Ok(url)
    }

    async fn try_fetch_arrivals(
        &self,
        stop_id: &str,
        credential: &SecureString,
    ) -> Result<Vec<Arrival>, String> {
        let url = self
            .endpoint(&["StopPoint", stop_id, "Arrivals"], &[], credential)
            .map_err(|e| e.to_string())?;
        let response = self.http.get(url).send().await.map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        let raw: Vec<RawArrival> = response.json().await.map_err(|e| e.to_string())?;
        let mut arrivals: Vec<Arrival> = raw.into_iter().map(Arrival::from).collect();
        arrivals.sort_by_key(|a| a.time_to_station);
        Ok(arrivals)
    }
}

#[async_trait]
impl TransitApi for TflClient {
    async fn find_nearby_stops(
        &self,
        at: Coordinates,
        credential: &SecureString,
    ) -> Result<Vec<Stop>, TransitError> {
        if credential.is_blank() {
            return Err(TransitError::CredentialMissing);
        }

        let url = self.endpoint(
            &["StopPoint"],
            &[
                ("stopTypes", self.stop_types.clone()),
                ("radius", self.radius_meters.to_string()),
                ("lat", at.latitude.to_string()),
                ("lon", at.longitude.to_string()),
            ],
            credential,
        )?;

        tracing::debug!(lat = at.latitude, lon = at.longitude, "Querying nearby stops");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| TransitError::api(format!("{}: {}", NEARBY_FAILED, e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| non_empty(body.message))
                .unwrap_or_else(|| NEARBY_FAILED.to_string());
            tracing::warn!(status = status.as_u16(), %message, "Nearby stop query failed");
            return Err(TransitError::Api { message });
        }

        let body: StopPointsResponse = response
            .json()
            .await
            .map_err(|e| TransitError::api(format!("{}: {}", NEARBY_FAILED, e)))?;

        let stops = nearest(
            body.stop_points.unwrap_or_default().into_iter().map(Stop::from).collect(),
            self.max_stops,
        );
        tracing::info!(count = stops.len(), "Discovered nearby stops");
        Ok(stops)
    }

    /// Never fails: every problem is logged and reported as "no arrivals".
    async fn fetch_arrivals(
        &self,
        stop_id: &str,
        credential: &SecureString,
    ) -> Result<Vec<Arrival>, TransitError> {
        if credential.is_blank() {
            tracing::warn!(stop_id, "No API key; skipping arrivals");
            return Ok(Vec::new());
        }

        match self.try_fetch_arrivals(stop_id, credential).await {
            Ok(arrivals) => {
                tracing::debug!(stop_id, count = arrivals.len(), "Fetched arrivals");
                Ok(arrivals)
            }
            Err(reason) => {
                tracing::warn!(stop_id, %reason, "Failed to fetch arrivals");
                Ok(Vec::new())
            }
        }
    }
}
