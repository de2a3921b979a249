//! Shared HTTP plumbing for the remote collections

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::ApiError;
use crate::config::Config;

/// Thin wrapper over a reqwest client bound to one API base address
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(&config.http.user_agent);
        if let Some(timeout) = config.http_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.api_base().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the API base
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("GET {}", url);
        self.http.get(url)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("POST {}", url);
        self.http.post(url)
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("PUT {}", url);
        self.http.put(url)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("DELETE {}", url);
        self.http.delete(url)
    }

    /// Send a request and decode its JSON body
    pub async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = successful_body(request.send().await?).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a request whose response body is not needed
    pub async fn fetch_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        successful_body(request.send().await?).await?;
        Ok(())
    }
}

async fn successful_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}
