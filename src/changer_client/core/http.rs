use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::types::MonitorError;

use super::super::helpers::join_url;

/// Thin JSON wrapper around reqwest, bound to a list of candidate base URLs.
#[derive(Clone)]
pub struct HttpClient {
    http: Client,
    base_urls: Vec<String>,
    current_idx: usize,
}

impl HttpClient {
    pub fn new(base_urls: Vec<String>, timeout: Duration) -> Result<Self, MonitorError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(MonitorError::Http)?;

        Ok(Self {
            http,
            base_urls,
            current_idx: 0,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_urls[self.current_idx.min(self.base_urls.len().saturating_sub(1))]
    }

    /// GET `path` relative to the active base URL and decode the JSON body.
    /// Absolute URLs are requested as-is.
    pub async fn get_json<T>(&self, path: &str) -> Result<T, MonitorError>
    where
        T: DeserializeOwned,
    {
        let url = join_url(self.base_url(), path);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(MonitorError::Http)?;

        if !response.status().is_success() {
            return Err(MonitorError::Changer(format!(
                "{} returned {}",
                path,
                response.status()
            )));
        }

        response.json::<T>().await.map_err(MonitorError::Http)
    }
}
