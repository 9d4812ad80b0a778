//! HTTP implementation of [`ApiResource`].

use async_trait::async_trait;
use log::*;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use secrecy::ExposeSecret;

use super::ApiResource;
use crate::credentials::{Gnp, TokenSource};
use crate::error::{status_error, Error};
use crate::http::HttpClient;

/// Default CAMARA number verification endpoint.
pub const DEFAULT_API_BASE_URL: &str =
    "https://api-eu.vonage.com/camara/number-verification/v031/verify";

/// Posts JSON to a single endpoint with a bearer token from a [`TokenSource`].
pub struct HttpApiResource {
    client: HttpClient,
    base_url: String,
    token_source: Box<dyn TokenSource>,
}

impl HttpApiResource {
    /// Create a new HTTP resource.
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client, see [`Transport`](crate::http::Transport)
    /// * `base_url` - Endpoint the documents are posted to
    /// * `token_source` - Provides the bearer token for each call
    pub fn new(
        client: HttpClient,
        base_url: impl Into<String>,
        token_source: Box<dyn TokenSource>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token_source,
        }
    }
}

#[async_trait]
impl ApiResource for HttpApiResource {
    async fn create(
        &self,
        credentials: &Gnp,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, Error> {
        let token = self.token_source.access_token(credentials).await?;

        debug!("POST {}", self.base_url);

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(token.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(serde_json::to_vec(&body)?)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {:?}", self.base_url, e);
                Error::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Verification API returned {}: {}", status, error_text);
            return Err(status_error(status.as_u16(), error_text));
        }

        let document = response.json::<serde_json::Value>().await?;
        debug!("Verification API responded with {}", status);
        Ok(document)
    }
}
