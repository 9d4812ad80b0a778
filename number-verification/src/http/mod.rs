//! HTTP transport for the verification API.

mod client;
mod retry;

pub use client::{HttpClient, Transport};
pub(crate) use retry::BackoffPolicy;
