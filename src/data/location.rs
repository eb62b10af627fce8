use log::{debug, warn};
use thiserror::Error;

use crate::{data::api::ApiClient, domain::weather::Coordinates};

/// Where the dashboard should look for weather.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationRequest {
    Coordinates(Coordinates),
    Search(String),
    Auto,
}

impl LocationRequest {
    pub fn new(coordinates: Option<Coordinates>, city: Option<&str>) -> Self {
        if let Some(coordinates) = coordinates {
            return Self::Coordinates(coordinates);
        }
        match city.map(str::trim) {
            Some(city) if !city.is_empty() => Self::Search(city.to_string()),
            _ => Self::Auto,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LocationError {
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

fn validate(coordinates: Coordinates) -> Result<Coordinates, LocationError> {
    let lat_ok = (-90.0..=90.0).contains(&coordinates.lat);
    let lon_ok = (-180.0..=180.0).contains(&coordinates.lon);
    if lat_ok && lon_ok {
        Ok(coordinates)
    } else {
        Err(LocationError::Unavailable(format!(
            "coordinates out of range: {}, {}",
            coordinates.lat, coordinates.lon
        )))
    }
}

/// Resolves the preferred location without any fallback.
pub async fn locate(
    client: &ApiClient,
    request: &LocationRequest,
) -> Result<Coordinates, LocationError> {
    match request {
        LocationRequest::Coordinates(coordinates) => validate(*coordinates),
        LocationRequest::Search(query) => client
            .search_location(query)
            .await
            .map_err(|err| LocationError::Unavailable(err.to_string()))
            .and_then(|info| validate(info.coordinates())),
        LocationRequest::Auto => Err(LocationError::Unavailable(
            "no location configured".to_string(),
        )),
    }
}

/// Preferred location, then the IP lookup, then `None` so the server picks.
pub async fn resolve(client: &ApiClient, request: &LocationRequest) -> Option<Coordinates> {
    match locate(client, request).await {
        Ok(coordinates) => return Some(coordinates),
        Err(err) if *request == LocationRequest::Auto => debug!("{err}"),
        Err(err) => warn!("{err}; falling back to IP location"),
    }

    match client.ip_location().await {
        Ok(info) => validate(info.coordinates()).ok(),
        Err(err) => {
            warn!("IP location lookup failed: {err}");
            None
        }
    }
}
