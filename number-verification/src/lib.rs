//! # number-verification
//!
//! Client for the CAMARA Number Verification API:
//! - Frontend authorization URL construction (OIDC, `login_hint` = phone number)
//! - Redirect webhook payload handling (`code`, `state`)
//! - GNP credentials and the token source seam used to authenticate calls
//! - The verification call itself, over a swappable API resource
//!
//! ## Usage
//!
//! ```rust,ignore
//! use number_verification::{
//!     api::HttpApiResource,
//!     credentials::{Gnp, StaticToken},
//!     http::Transport,
//!     webhook::Payload,
//!     Client,
//! };
//!
//! let resource = HttpApiResource::new(
//!     Transport::default().client()?,
//!     number_verification::api::DEFAULT_API_BASE_URL,
//!     Box::new(StaticToken::new(access_token)),
//! );
//! let mut client = Client::new(resource, Gnp::new(application_id));
//!
//! let url = client.build_front_end_url("+15555550100", "https://app.example/cb", Some("xyz"));
//! // ... user's device follows `url`, provider redirects back with code/state ...
//! let verified = client.verify_number("+15555550100", &payload).await?;
//! ```

pub mod api;
pub mod client;
pub mod credentials;
pub mod error;
pub mod http;
pub mod phone;
pub mod webhook;

// Re-export commonly used types
pub use client::Client;
pub use error::{Error, ErrorKind};
