//! Error types for the `number-verification` crate.
//!
//! A root `Error` struct holds the error kind and, where one exists, the
//! underlying error that caused it. Transport errors keep the original
//! `reqwest` error as `source` so callers can inspect it unmodified.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for the number-verification crate.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in number-verification.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    Configuration(ConfigurationErrorKind),
    Protocol(ProtocolErrorKind),
    Credentials(CredentialsErrorKind),
    Http(HttpErrorKind),
}

/// The client was assembled from unusable configuration.
#[derive(Debug, PartialEq)]
pub enum ConfigurationErrorKind {
    /// Only GNP credentials can drive the number verification flow.
    WrongCredentials,
}

/// The redirect payload or the API response did not have the expected shape.
#[derive(Debug, PartialEq)]
pub enum ProtocolErrorKind {
    MissingCode,
    InvalidResponse,
}

/// Errors surfaced by a token source while obtaining an access token.
#[derive(Debug, PartialEq)]
pub enum CredentialsErrorKind {
    TokenUnavailable,
}

/// Errors from HTTP client operations.
#[derive(Debug, PartialEq)]
pub enum HttpErrorKind {
    BuilderFailed,
    RequestFailed,
    Network,
    Status(u16),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Configuration(kind) => write!(f, "Configuration error: {:?}", kind),
            ErrorKind::Protocol(kind) => write!(f, "Protocol error: {:?}", kind),
            ErrorKind::Credentials(kind) => write!(f, "Credentials error: {:?}", kind),
            ErrorKind::Http(HttpErrorKind::Status(status)) => {
                write!(f, "HTTP error: unexpected status {}", status)
            }
            ErrorKind::Http(kind) => write!(f, "HTTP error: {:?}", kind),
        }?;

        if let Some(source) = &self.source {
            write!(f, " ({})", source)?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_builder() {
            ErrorKind::Http(HttpErrorKind::BuilderFailed)
        } else if err.is_request() {
            ErrorKind::Http(HttpErrorKind::RequestFailed)
        } else if err.is_decode() {
            ErrorKind::Protocol(ProtocolErrorKind::InvalidResponse)
        } else {
            ErrorKind::Http(HttpErrorKind::Network)
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(err) => err.into(),
            other => Error {
                source: Some(Box::new(other)),
                error_kind: ErrorKind::Http(HttpErrorKind::Network),
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Protocol(ProtocolErrorKind::InvalidResponse),
        }
    }
}

/// Helper function to create configuration errors.
pub fn configuration_error(kind: ConfigurationErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Configuration(kind),
    }
}

/// Helper function to create protocol errors.
pub fn protocol_error(kind: ProtocolErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Protocol(kind),
    }
}

/// Helper function to create credentials errors.
pub fn credentials_error(kind: CredentialsErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Credentials(kind),
    }
}

/// Helper function to create an error for a non-success HTTP status.
pub fn status_error(status: u16, body: String) -> Error {
    Error {
        source: if body.is_empty() { None } else { Some(body.into()) },
        error_kind: ErrorKind::Http(HttpErrorKind::Status(status)),
    }
}
