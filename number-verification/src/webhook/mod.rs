//! Redirect webhook payload.
//!
//! After the user authenticates on the frontend, the OIDC provider redirects
//! to the application's `redirect_uri` with `code` and `state` parameters. The
//! application's web layer extracts those parameters (query string or form
//! body) into a [`Payload`] and hands it to
//! [`Client::verify_number`](crate::Client::verify_number).

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{protocol_error, Error, ProtocolErrorKind};

pub const CODE: &str = "code";
pub const STATE: &str = "state";

/// Key/value parameters delivered to the redirect webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Payload {
    fields: HashMap<String, String>,
}

impl Payload {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The authorization code, if the redirect carried one.
    pub fn code(&self) -> Option<&str> {
        self.get(CODE)
    }

    pub fn state(&self) -> Option<&str> {
        self.get(STATE)
    }

    /// Returns the authorization code or a protocol error if it is absent.
    pub fn require_code(&self) -> Result<&str, Error> {
        self.code().ok_or_else(|| {
            protocol_error(
                ProtocolErrorKind::MissingCode,
                "Required field code not found in webhook",
            )
        })
    }
}

impl From<HashMap<String, String>> for Payload {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

impl<K, V> FromIterator<(K, V)> for Payload
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
