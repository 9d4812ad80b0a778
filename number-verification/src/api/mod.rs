//! API resource abstraction used by the verification client.

mod resource;

pub use resource::{HttpApiResource, DEFAULT_API_BASE_URL};

use async_trait::async_trait;

use crate::credentials::Gnp;
use crate::error::Error;

/// A REST resource that accepts JSON documents.
///
/// The verification client builds the request body and reads the response;
/// authentication, transport, timeouts and retries belong to implementations.
#[async_trait]
pub trait ApiResource: Send + Sync {
    /// Create (POST) a document on the resource.
    ///
    /// # Arguments
    ///
    /// * `credentials` - GNP credentials carrying the redirect `code` and `state`
    /// * `body` - JSON request body
    ///
    /// # Returns
    ///
    /// The decoded JSON response body.
    async fn create(
        &self,
        credentials: &Gnp,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, Error>;
}
