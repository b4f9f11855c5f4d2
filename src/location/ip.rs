//! Device position from an IP geolocation service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::resolver::{DeviceLocator, LocationError};
use crate::transit::Coordinates;

/// Response of ip-api.com style services. `latitude`/`longitude` spellings
/// (ipapi.co and friends) are accepted too.
#[derive(Debug, Deserialize)]
struct IpFix {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, alias = "latitude")]
    lat: Option<f64>,
    #[serde(default, alias = "longitude")]
    lon: Option<f64>,
}

impl IpFix {
    fn into_coordinates(self) -> Result<Coordinates, LocationError> {
        if self.status.as_deref() == Some("fail") {
            let reason = self.message.unwrap_or_else(|| "lookup failed".to_string());
            return Err(LocationError::Unavailable(format!(
                "Error getting location: {}.",
                reason
            )));
        }
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(LocationError::Unavailable(
                "Error getting location: response had no coordinates.".to_string(),
            )),
        }
    }
}

pub struct IpGeolocator {
    http: Client,
    url: String,
}

impl IpGeolocator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> LocationError {
    if err.is_timeout() {
        LocationError::Timeout
    } else {
        LocationError::Unavailable(format!("Error getting location: {}.", err))
    }
}

#[async_trait]
impl DeviceLocator for IpGeolocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(LocationError::Denied),
            status if !status.is_success() => {
                return Err(LocationError::Unavailable(format!(
                    "Error getting location: HTTP {}.",
                    status.as_u16()
                )))
            }
            _ => {}
        }

        let fix: IpFix = response.json().await.map_err(map_transport_error)?;
        fix.into_coordinates()
    }
}
