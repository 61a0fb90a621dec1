//! Network transport for the chain gateway.
//!
//! The transport is chain-agnostic: it receives a [`WireCall`] an adapter has
//! already built and returns the [`RawResponse`] untouched. Two layers are
//! provided:
//!
//! - [`HttpClient`]: one attempt, one timeout. [`ReqwestClient`] is the
//!   production implementation and owns the shared connection pool.
//! - [`Transport`]: the retrying execute used by the gateway.
//!   [`RetryTransport`] wraps any `HttpClient` with exponential backoff.

pub mod client;
pub mod error;
pub mod retry;

pub use client::ReqwestClient;
pub use error::{AttemptError, ClientBuildError, TransportError};
pub use retry::{RetryPolicy, RetryTransport};

use async_trait::async_trait;
use gateway_types::{RawResponse, WireCall};
use std::time::Duration;

/// A single HTTP attempt.
#[async_trait]
pub trait HttpClient: Send + Sync {
	/// Sends `call` once. Any status code is a successful attempt; only
	/// failures to obtain a response are errors.
	async fn send(&self, call: &WireCall, timeout: Duration) -> Result<RawResponse, AttemptError>;
}

/// Executes a wire call with retries.
#[async_trait]
pub trait Transport: Send + Sync {
	/// Executes `call`, retrying connection failures, attempt timeouts and
	/// 5xx responses up to `max_retries` times.
	///
	/// # Errors
	///
	/// Returns [`TransportError`] once every attempt has failed. Non-5xx
	/// responses are returned as `Ok` on the first attempt that sees them.
	async fn execute(
		&self,
		call: &WireCall,
		timeout: Duration,
		max_retries: u32,
	) -> Result<RawResponse, TransportError>;
}
