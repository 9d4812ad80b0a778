//! Number verification client.
//!
//! The flow has two steps:
//!
//! 1. [`Client::build_front_end_url`] produces the OIDC authorization URL the
//!    user's device is sent to. The network provider authenticates the device
//!    and redirects to `redirect_uri` with `code` and `state`.
//! 2. When that redirect arrives, [`Client::verify_number`] attaches the code
//!    to the GNP credentials and asks the API whether the phone number belongs
//!    to the authenticated device.

use log::*;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::api::ApiResource;
use crate::credentials::{Credentials, Gnp};
use crate::error::Error;
use crate::phone;
use crate::webhook::Payload;

/// OIDC authorization endpoint the frontend redirects to.
pub const AUTHORIZATION_URL: &str = "https://oidc.idp.vonage.com/oauth2/auth";

/// Scope requested for the number verification flow.
pub const SCOPE: &str = "openid dpv:FraudPreventionAndDetection#number-verification-verify-read";

/// Body of a verification request, a single key chosen by [`phone::is_hashed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VerifyRequest {
    PhoneNumber(String),
    HashedPhoneNumber(String),
}

impl VerifyRequest {
    pub fn for_phone_number(phone_number: &str) -> Self {
        if phone::is_hashed(phone_number) {
            VerifyRequest::HashedPhoneNumber(phone_number.to_string())
        } else {
            VerifyRequest::PhoneNumber(phone_number.to_string())
        }
    }

    /// JSON key used for this request.
    pub fn key(&self) -> &'static str {
        match self {
            VerifyRequest::PhoneNumber(_) => "phoneNumber",
            VerifyRequest::HashedPhoneNumber(_) => "hashedPhoneNumber",
        }
    }
}

/// Verification response. Fields other than the verdict are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub device_phone_number_verified: bool,
}

/// Client for the Number Verification API.
///
/// Holds GNP credentials for the whole flow. `verify_number` takes `&mut self`
/// because it writes the redirect `code` and `state` into those credentials,
/// so one client serves one verification at a time.
pub struct Client<R: ApiResource> {
    api: R,
    credentials: Gnp,
}

impl<R: ApiResource> Client<R> {
    pub fn new(api: R, credentials: Gnp) -> Self {
        Self { api, credentials }
    }

    /// Create a client from any credential variant.
    ///
    /// Fails with a configuration error unless `credentials` are GNP.
    pub fn with_credentials(api: R, credentials: Credentials) -> Result<Self, Error> {
        let credentials = Gnp::try_from(credentials).map_err(|e| {
            error!("Number verification requires GNP credentials: {}", e);
            e
        })?;
        Ok(Self::new(api, credentials))
    }

    pub fn api_resource(&self) -> &R {
        &self.api
    }

    pub fn credentials(&self) -> &Gnp {
        &self.credentials
    }

    /// Build the frontend authorization URL that starts the verification flow.
    ///
    /// # Arguments
    ///
    /// * `phone_number` - Number to verify, sent as `login_hint`
    /// * `redirect_url` - Where the provider redirects with `code` and `state`
    /// * `state` - Opaque value echoed back on the redirect, empty if `None`
    pub fn build_front_end_url(
        &self,
        phone_number: &str,
        redirect_url: &str,
        state: Option<&str>,
    ) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", self.credentials.application())
            .append_pair("redirect_uri", redirect_url)
            .append_pair("state", state.unwrap_or_default())
            .append_pair("scope", SCOPE)
            .append_pair("response_type", "code")
            .append_pair("login_hint", phone_number)
            .finish();

        debug!(
            "Built authorization URL for application {} and number {}",
            self.credentials.application(),
            phone::redact(phone_number)
        );

        format!("{}?{}", AUTHORIZATION_URL, query)
    }

    /// Returns true if `phone_number` will be sent as `hashedPhoneNumber`.
    pub fn is_hashed_phone_number(&self, phone_number: &str) -> bool {
        phone::is_hashed(phone_number)
    }

    /// Verify that `phone_number` belongs to the device that completed the
    /// frontend authorization.
    ///
    /// Call this from the redirect handler with the parameters it received.
    /// `code` is required; `state` is optional and, when absent, clears any
    /// state left on the credentials by an earlier attempt.
    pub async fn verify_number(
        &mut self,
        phone_number: &str,
        payload: &Payload,
    ) -> Result<bool, Error> {
        let code = payload.require_code().map_err(|e| {
            warn!("Redirect payload without an authorization code");
            e
        })?;

        self.credentials.set_code(code.to_string());
        self.credentials.set_state(payload.state().map(str::to_string));

        let request = VerifyRequest::for_phone_number(phone_number);
        info!(
            "Verifying {} using {}",
            phone::redact(phone_number),
            request.key()
        );

        let body = serde_json::to_value(&request)?;
        let response = self.api.create(&self.credentials, body).await?;
        let response: VerifyResponse = serde_json::from_value(response)?;

        info!(
            "Number verification result for {}: {}",
            phone::redact(phone_number),
            response.device_phone_number_verified
        );
        Ok(response.device_phone_number_verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{Basic, Keypair};
    use crate::error::{
        status_error, ConfigurationErrorKind, ErrorKind, HttpErrorKind, ProtocolErrorKind,
    };
    use async_trait::async_trait;
    use secrecy::SecretString;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct RecordedCall {
        code: Option<String>,
        state: Option<String>,
        body: Value,
    }

    /// Records every `create` call and replies with a canned result.
    struct RecordingResource {
        replies: Mutex<Vec<Result<Value, Error>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl RecordingResource {
        fn replying(reply: Result<Value, Error>) -> Self {
            Self::replying_in_order(vec![reply])
        }

        fn replying_in_order(mut replies: Vec<Result<Value, Error>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApiResource for RecordingResource {
        async fn create(&self, credentials: &Gnp, body: Value) -> Result<Value, Error> {
            self.calls.lock().unwrap().push(RecordedCall {
                code: credentials.code().map(str::to_string),
                state: credentials.state().map(str::to_string),
                body,
            });
            self.replies
                .lock()
                .unwrap()
                .pop()
                .expect("create called more often than replies were queued")
        }
    }

    fn gnp() -> Gnp {
        Gnp::new("app-123")
    }

    fn client(reply: Result<Value, Error>) -> Client<RecordingResource> {
        Client::new(RecordingResource::replying(reply), gnp())
    }

    fn payload(pairs: &[(&str, &str)]) -> Payload {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_with_credentials_rejects_non_gnp() {
        let rejected = [
            Credentials::Basic(Basic {
                api_key: "key".to_string(),
                api_secret: SecretString::new("secret".to_string()),
            }),
            Credentials::Keypair(Keypair {
                application: "app-123".to_string(),
                private_key: SecretString::new("k".to_string()),
            }),
        ];

        for credentials in rejected {
            let resource = RecordingResource::replying(Ok(json!({})));
            let result = Client::with_credentials(resource, credentials);
            let err = match result {
                Ok(_) => panic!("non-GNP credentials were accepted"),
                Err(err) => err,
            };
            assert_eq!(
                err.error_kind,
                ErrorKind::Configuration(ConfigurationErrorKind::WrongCredentials)
            );
        }
    }

    #[test]
    fn test_with_credentials_accepts_gnp() {
        let resource = RecordingResource::replying(Ok(json!({})));
        let client = Client::with_credentials(resource, Credentials::Gnp(gnp())).unwrap();
        assert_eq!(client.credentials().application(), "app-123");
        assert!(client.api_resource().calls().is_empty());
    }

    #[test]
    fn test_build_front_end_url() {
        let client = client(Ok(json!({})));
        let url = client.build_front_end_url("+15555550100", "https://app.example/cb", Some("xyz"));

        assert!(url.starts_with("https://oidc.idp.vonage.com/oauth2/auth?"));
        let query = url.split_once('?').unwrap().1;
        let params: Vec<&str> = query.split('&').collect();
        assert_eq!(
            params,
            vec![
                "client_id=app-123",
                "redirect_uri=https%3A%2F%2Fapp.example%2Fcb",
                "state=xyz",
                "scope=openid+dpv%3AFraudPreventionAndDetection%23number-verification-verify-read",
                "response_type=code",
                "login_hint=%2B15555550100",
            ]
        );
    }

    #[test]
    fn test_build_front_end_url_decodes_to_inputs() {
        let client = client(Ok(json!({})));
        let url = client.build_front_end_url("+15555550100", "https://app.example/cb", Some("xyz"));

        let parsed = url::Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("client_id".to_string(), "app-123".to_string()),
                ("redirect_uri".to_string(), "https://app.example/cb".to_string()),
                ("state".to_string(), "xyz".to_string()),
                ("scope".to_string(), SCOPE.to_string()),
                ("response_type".to_string(), "code".to_string()),
                ("login_hint".to_string(), "+15555550100".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_front_end_url_without_state() {
        let client = client(Ok(json!({})));
        let url = client.build_front_end_url("+15555550100", "https://app.example/cb", None);
        assert!(url.contains("&state=&"));
    }

    #[test]
    fn test_is_hashed_phone_number() {
        let client = client(Ok(json!({})));
        assert!(!client.is_hashed_phone_number("1234567890"));
        assert!(!client.is_hashed_phone_number("123456789012"));
        assert!(client.is_hashed_phone_number("1234567890123"));
        assert!(client.is_hashed_phone_number("a1b2c3d4e5f6g7h8"));
    }

    #[test]
    fn test_verify_request_serializes_single_key() {
        assert_eq!(
            serde_json::to_value(VerifyRequest::for_phone_number("1234567890")).unwrap(),
            json!({ "phoneNumber": "1234567890" })
        );
        assert_eq!(
            serde_json::to_value(VerifyRequest::for_phone_number("a1b2c3d4e5f6g7h8")).unwrap(),
            json!({ "hashedPhoneNumber": "a1b2c3d4e5f6g7h8" })
        );
    }

    #[tokio::test]
    async fn test_verify_number_sets_credentials_before_call() {
        let mut client = client(Ok(json!({ "devicePhoneNumberVerified": true })));

        let verified = client
            .verify_number("1234567890", &payload(&[("code", "abc"), ("state", "s1")]))
            .await
            .unwrap();

        assert!(verified);
        assert_eq!(
            client.api_resource().calls(),
            vec![RecordedCall {
                code: Some("abc".to_string()),
                state: Some("s1".to_string()),
                body: json!({ "phoneNumber": "1234567890" }),
            }]
        );
        assert_eq!(client.credentials().code(), Some("abc"));
        assert_eq!(client.credentials().state(), Some("s1"));
    }

    #[tokio::test]
    async fn test_verify_number_uses_hashed_key_for_long_input() {
        let mut client = client(Ok(json!({ "devicePhoneNumberVerified": false })));

        let verified = client
            .verify_number("a1b2c3d4e5f6g7h8", &payload(&[("code", "abc")]))
            .await
            .unwrap();

        assert!(!verified);
        let calls = client.api_resource().calls();
        assert_eq!(calls[0].body, json!({ "hashedPhoneNumber": "a1b2c3d4e5f6g7h8" }));
        assert_eq!(calls[0].state, None);
    }

    #[tokio::test]
    async fn test_verify_number_missing_state_clears_previous_state() {
        let resource = RecordingResource::replying_in_order(vec![
            Ok(json!({ "devicePhoneNumberVerified": true })),
            Ok(json!({ "devicePhoneNumberVerified": true })),
        ]);
        let mut client = Client::new(resource, gnp());

        client
            .verify_number("1234567890", &payload(&[("code", "abc"), ("state", "s1")]))
            .await
            .unwrap();
        client
            .verify_number("1234567890", &payload(&[("code", "def")]))
            .await
            .unwrap();

        let calls = client.api_resource().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].state.as_deref(), Some("s1"));
        assert_eq!(calls[1].code.as_deref(), Some("def"));
        assert_eq!(calls[1].state, None);
        assert_eq!(client.credentials().state(), None);
    }

    #[tokio::test]
    async fn test_verify_number_without_code_makes_no_call() {
        let mut client = client(Ok(json!({ "devicePhoneNumberVerified": true })));

        let err = client
            .verify_number("1234567890", &payload(&[("state", "s1")]))
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            ErrorKind::Protocol(ProtocolErrorKind::MissingCode)
        );
        assert!(client.api_resource().calls().is_empty());
        assert_eq!(client.credentials().code(), None);
    }

    #[tokio::test]
    async fn test_verify_number_propagates_transport_error() {
        let mut client = client(Err(status_error(503, "unavailable".to_string())));

        let err = client
            .verify_number("1234567890", &payload(&[("code", "abc")]))
            .await
            .unwrap_err();

        assert_eq!(err.error_kind, ErrorKind::Http(HttpErrorKind::Status(503)));
        assert_eq!(client.api_resource().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_verify_number_missing_verdict_is_invalid_response() {
        let mut client = client(Ok(json!({ "somethingElse": true })));

        let err = client
            .verify_number("1234567890", &payload(&[("code", "abc")]))
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            ErrorKind::Protocol(ProtocolErrorKind::InvalidResponse)
        );
    }
}
