//! Credential variants accepted by the Vonage APIs.
//!
//! Number verification only works with GNP (network provider) credentials. The
//! other variants exist so configuration code can hold any credential and let
//! [`Credentials::kind`] or `Gnp::try_from` decide whether it fits.

mod token;

pub use token::{StaticToken, TokenSource};

use secrecy::SecretString;

use crate::error::{configuration_error, ConfigurationErrorKind, Error};

/// Discriminant of a [`Credentials`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsKind {
    Basic,
    Keypair,
    Gnp,
}

impl CredentialsKind {
    /// Get the credentials kind identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialsKind::Basic => "basic",
            CredentialsKind::Keypair => "keypair",
            CredentialsKind::Gnp => "gnp",
        }
    }
}

/// Any credential an application may be configured with.
#[derive(Debug, Clone)]
pub enum Credentials {
    Basic(Basic),
    Keypair(Keypair),
    Gnp(Gnp),
}

impl Credentials {
    pub fn kind(&self) -> CredentialsKind {
        match self {
            Credentials::Basic(_) => CredentialsKind::Basic,
            Credentials::Keypair(_) => CredentialsKind::Keypair,
            Credentials::Gnp(_) => CredentialsKind::Gnp,
        }
    }
}

impl From<Gnp> for Credentials {
    fn from(gnp: Gnp) -> Self {
        Credentials::Gnp(gnp)
    }
}

impl TryFrom<Credentials> for Gnp {
    type Error = Error;

    fn try_from(credentials: Credentials) -> Result<Self, Self::Error> {
        match credentials {
            Credentials::Gnp(gnp) => Ok(gnp),
            other => Err(configuration_error(
                ConfigurationErrorKind::WrongCredentials,
                &format!(
                    "You can only use GNP Credentials with the Number Verification API, got {}",
                    other.kind().as_str()
                ),
            )),
        }
    }
}

/// API key and secret pair.
#[derive(Debug, Clone)]
pub struct Basic {
    pub api_key: String,
    pub api_secret: SecretString,
}

/// Application id and private key used to sign application JWTs.
#[derive(Debug, Clone)]
pub struct Keypair {
    pub application: String,
    pub private_key: SecretString,
}

/// Network-provider credentials.
///
/// Carries the application id plus the authorization `code` and `state`
/// delivered by the OIDC redirect. Both are set once per verification
/// attempt, right before the verification call is made. Exchanging the code
/// for an access token is the job of a [`TokenSource`].
#[derive(Debug, Clone)]
pub struct Gnp {
    application: String,
    code: Option<String>,
    state: Option<String>,
}

impl Gnp {
    /// Create GNP credentials for a Vonage application.
    ///
    /// `application` is sent as the OIDC `client_id`.
    pub fn new(application: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            code: None,
            state: None,
        }
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn set_code(&mut self, code: String) {
        self.code = Some(code);
    }

    pub fn set_state(&mut self, state: Option<String>) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn secret(value: &str) -> SecretString {
        SecretString::new(value.to_string())
    }

    #[test]
    fn test_credentials_kind_as_str() {
        assert_eq!(CredentialsKind::Basic.as_str(), "basic");
        assert_eq!(CredentialsKind::Keypair.as_str(), "keypair");
        assert_eq!(CredentialsKind::Gnp.as_str(), "gnp");
    }

    #[test]
    fn test_gnp_starts_without_code_or_state() {
        let gnp = Gnp::new("app-123");
        assert_eq!(gnp.application(), "app-123");
        assert_eq!(gnp.code(), None);
        assert_eq!(gnp.state(), None);
    }

    #[test]
    fn test_gnp_set_code_and_state() {
        let mut gnp = Gnp::new("app-123");
        gnp.set_code("abc".to_string());
        gnp.set_state(Some("s1".to_string()));

        assert_eq!(gnp.code(), Some("abc"));
        assert_eq!(gnp.state(), Some("s1"));

        gnp.set_state(None);
        assert_eq!(gnp.state(), None);
    }

    #[test]
    fn test_try_from_gnp_credentials() {
        let credentials = Credentials::from(Gnp::new("app-123"));
        assert_eq!(credentials.kind(), CredentialsKind::Gnp);

        let gnp = Gnp::try_from(credentials).unwrap();
        assert_eq!(gnp.application(), "app-123");
    }

    #[test]
    fn test_try_from_other_credentials_is_configuration_error() {
        let rejected = [
            Credentials::Basic(Basic {
                api_key: "key".to_string(),
                api_secret: secret("secret"),
            }),
            Credentials::Keypair(Keypair {
                application: "app-123".to_string(),
                private_key: secret("key"),
            }),
        ];

        for credentials in rejected {
            let err = Gnp::try_from(credentials).unwrap_err();
            assert_eq!(
                err.error_kind,
                ErrorKind::Configuration(ConfigurationErrorKind::WrongCredentials)
            );
        }
    }

    #[test]
    fn test_debug_does_not_leak_private_key() {
        let keypair = Keypair {
            application: "app-123".to_string(),
            private_key: secret("super-secret-key"),
        };
        let debug = format!("{:?}", Credentials::Keypair(keypair));
        assert!(!debug.contains("super-secret-key"));
    }
}
