use crate::scraper::{Result, ScrapeError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper for the metadata API.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(concat!("ghostvault/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Execute POST request with JSON body and parse the JSON response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(&self, body: &B) -> Result<T> {
        let response = self
            .client
            .post(&self.base_url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(ScrapeError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Http {
                status: status.as_u16(),
                url: self.base_url.clone(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ScrapeError::Parse(format!("JSON parse error: {e}")))
    }
}
