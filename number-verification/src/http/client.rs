//! HTTP client construction with retry middleware.

use std::time::Duration;

use reqwest_middleware::ClientBuilder;
use reqwest_retry::RetryTransientMiddleware;

use super::BackoffPolicy;
use crate::error::Error;

/// User agent sent with every verification request.
pub const USER_AGENT: &str = concat!("number-verification/", env!("CARGO_PKG_VERSION"));

/// HTTP client used to reach the verification API.
pub type HttpClient = reqwest_middleware::ClientWithMiddleware;

/// Timeout and retry settings for the client behind
/// [`HttpApiResource`](crate::api::HttpApiResource).
///
/// Retries of transient failures live here, in the transport, not in the
/// verification client. `max_retries == 0` disables the retry middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transport {
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

impl Transport {
    /// Build the HTTP client.
    pub fn client(&self) -> Result<HttpClient, Error> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let mut builder = ClientBuilder::new(client);
        if self.max_retries > 0 {
            let retry_policy = BackoffPolicy::new(self.max_retries);
            builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }

        Ok(builder.build())
    }
}
