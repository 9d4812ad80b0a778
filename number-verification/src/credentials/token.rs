//! Access token sources for authenticated API calls.

use async_trait::async_trait;
use log::*;
use secrecy::{ExposeSecret, SecretString};

use super::Gnp;
use crate::error::{credentials_error, CredentialsErrorKind, Error};

/// Produces the bearer token attached to a verification request.
///
/// Exchanging the authorization code carried by [`Gnp`] for a CAMARA access
/// token happens behind this trait. Implementations own any token endpoint
/// calls, caching and refresh.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Obtain an access token for the given credentials.
    ///
    /// # Arguments
    ///
    /// * `credentials` - GNP credentials with the redirect `code` already set
    async fn access_token(&self, credentials: &Gnp) -> Result<SecretString, Error>;
}

/// A bearer token issued ahead of time.
///
/// Useful when the code exchange happens in another service, or for tests.
pub struct StaticToken {
    token: SecretString,
}

impl StaticToken {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self, credentials: &Gnp) -> Result<SecretString, Error> {
        if self.token.expose_secret().is_empty() {
            return Err(credentials_error(
                CredentialsErrorKind::TokenUnavailable,
                "Static access token is empty",
            ));
        }

        debug!(
            "Using pre-issued access token for application {}",
            credentials.application()
        );
        Ok(SecretString::new(self.token.expose_secret().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn gnp() -> Gnp {
        Gnp::new("app-123")
    }

    #[tokio::test]
    async fn test_static_token_returns_token() {
        let source = StaticToken::new(SecretString::new("tok".to_string()));
        let token = source.access_token(&gnp()).await.unwrap();
        assert_eq!(token.expose_secret(), "tok");
    }

    #[tokio::test]
    async fn test_empty_static_token_is_unavailable() {
        let source = StaticToken::new(SecretString::new(String::new()));
        let err = source.access_token(&gnp()).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::Credentials(CredentialsErrorKind::TokenUnavailable)
        );
    }
}
