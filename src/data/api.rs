use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use log::{debug, info, warn};
use reqwest::{Client, Request};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use crate::{
    data::cache::ApiCache,
    domain::weather::{Coordinates, LocationInfo, WeatherPayload},
};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("{0}")]
    Api(String),
    #[error("unexpected response: {0}")]
    Shape(String),
}

/// The `{success, data, error}` wrapper every endpoint answers with.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<T, FetchError> {
        if !self.success {
            return Err(FetchError::Api(
                self.error
                    .unwrap_or_else(|| "request was not successful".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| FetchError::Shape("envelope has no data".to_string()))
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, FetchError> {
    serde_json::from_value::<Envelope<T>>(body)
        .map_err(|err| FetchError::Shape(err.to_string()))?
        .into_data()
}

/// Client for the dashboard backend, network first with a cached fallback.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    cache: Arc<Mutex<ApiCache>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_cache(base_url, ApiCache::in_memory())
    }

    pub fn with_cache(base_url: impl Into<String>, cache: ApiCache) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            cache: Arc::new(Mutex::new(cache)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current conditions and forecast; without coordinates the server picks a location.
    pub async fn weather(
        &self,
        coordinates: Option<Coordinates>,
    ) -> Result<WeatherPayload, FetchError> {
        let query: Vec<(&str, String)> = coordinates
            .map(|c| vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())])
            .unwrap_or_default();
        self.get("/api/weather", &query).await
    }

    pub async fn ip_location(&self) -> Result<LocationInfo, FetchError> {
        self.get("/api/location", &[]).await
    }

    pub async fn search_location(&self, query: &str) -> Result<LocationInfo, FetchError> {
        self.get("/api/location/search", &[("q", query.to_string())])
            .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let request = self
            .client
            .get(format!("{}{path}", self.base_url))
            .query(query)
            .build()?;
        let key = request.url().to_string();

        let fresh = match self.fetch_envelope(request).await {
            Ok(body) => decode::<T>(body.clone()).map(|data| (data, body)),
            Err(err) => Err(err),
        };
        match fresh {
            Ok((data, body)) => {
                self.remember(&key, body);
                Ok(data)
            }
            Err(err) => match self.cached(&key) {
                Some(body) => {
                    warn!("serving cached response for {key}: {err}");
                    decode(body)
                }
                None => Err(err),
            },
        }
    }

    async fn fetch_envelope(&self, request: Request) -> Result<Value, FetchError> {
        debug!("GET {}", request.url());
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.json::<Value>().await;

        let body = match body {
            Ok(body) => body,
            Err(_) if !status.is_success() => return Err(FetchError::Status(status.as_u16())),
            Err(err) => return Err(FetchError::Shape(err.to_string())),
        };

        let success = body
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !success {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string);
            return Err(match message {
                Some(message) => FetchError::Api(message),
                None if !status.is_success() => FetchError::Status(status.as_u16()),
                None => FetchError::Shape("envelope reports no success".to_string()),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(body)
    }

    fn remember(&self, key: &str, body: Value) {
        let Ok(mut cache) = self.cache.lock() else {
            return;
        };
        if let Err(err) = cache.put(key, body) {
            warn!("could not persist response cache: {err:#}");
        }
    }

    fn cached(&self, key: &str) -> Option<Value> {
        let body = self.cache.lock().ok()?.get(key)?;
        info!("cache hit for {key}");
        Some(body)
    }
}
