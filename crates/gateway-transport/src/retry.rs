//! Retry wrapper with exponential backoff.

use crate::{error::AttemptError, error::TransportError, HttpClient, Transport};
use async_trait::async_trait;
use backoff::{backoff::Backoff, ExponentialBackoff};
use gateway_types::{RawResponse, WireCall};
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff schedule between attempts.
///
/// Delays grow exponentially from `base_delay`, are jittered by
/// `randomization_factor`, and are never longer than `max_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
	pub base_delay: Duration,
	pub max_delay: Duration,
	pub multiplier: f64,
	pub randomization_factor: f64,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			base_delay: Duration::from_millis(200),
			max_delay: Duration::from_secs(5),
			multiplier: 2.0,
			randomization_factor: 0.5,
		}
	}
}

impl RetryPolicy {
	pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
		Self {
			base_delay,
			max_delay,
			..Default::default()
		}
	}

	/// Fresh backoff state for one `execute` call.
	pub fn backoff(&self) -> ExponentialBackoff {
		ExponentialBackoff {
			current_interval: self.base_delay,
			initial_interval: self.base_delay,
			randomization_factor: self.randomization_factor,
			multiplier: self.multiplier,
			max_interval: self.max_delay,
			max_elapsed_time: None,
			..Default::default()
		}
	}

	/// Next delay from `backoff`, clamped to `max_delay`.
	pub fn next_delay(&self, backoff: &mut ExponentialBackoff) -> Duration {
		backoff
			.next_backoff()
			.unwrap_or(self.max_delay)
			.min(self.max_delay)
	}
}

/// Retries connection failures, attempt timeouts and 5xx responses.
///
/// 4xx and 2xx responses are handed back on the first attempt that sees
/// them: a client error will not improve on retry, and a 2xx carrying an
/// RPC error is a logical failure for the adapter to report. Attempts are
/// independent; nothing from a failed attempt is carried into the next.
#[derive(Debug, Clone)]
pub struct RetryTransport<C> {
	inner: C,
	policy: RetryPolicy,
}

impl<C> RetryTransport<C> {
	pub fn new(inner: C) -> Self {
		Self {
			inner,
			policy: RetryPolicy::default(),
		}
	}

	pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn policy(&self) -> &RetryPolicy {
		&self.policy
	}

	pub fn inner(&self) -> &C {
		&self.inner
	}
}

#[async_trait]
impl<C: HttpClient> Transport for RetryTransport<C> {
	async fn execute(
		&self,
		call: &WireCall,
		timeout: Duration,
		max_retries: u32,
	) -> Result<RawResponse, TransportError> {
		let mut backoff = self.policy.backoff();
		let mut attempts: u32 = 0;
		let mut last_status = None;

		loop {
			attempts += 1;

			// Enforced here as well so that clients which ignore their timeout
			// argument cannot stall the retry loop.
			let outcome = match tokio::time::timeout(timeout, self.inner.send(call, timeout)).await {
				Ok(outcome) => outcome,
				Err(_) => Err(AttemptError::Timeout(timeout)),
			};

			let reason = match outcome {
				Ok(response) if response.is_server_error() => {
					last_status = Some(response.status);
					format!("HTTP {}", response.status)
				}
				Ok(response) => {
					debug!(
						url = %call.url,
						attempt = attempts,
						status = response.status,
						"Wire call completed"
					);
					return Ok(response);
				}
				Err(e) if !e.is_retryable() => {
					return Err(TransportError {
						attempts,
						last_status,
						reason: e.to_string(),
					});
				}
				Err(e) => e.to_string(),
			};

			if attempts > max_retries {
				warn!(
					url = %call.url,
					attempts,
					"Wire call failed after {} attempts, giving up: {}",
					attempts,
					reason
				);
				return Err(TransportError {
					attempts,
					last_status,
					reason,
				});
			}

			let delay = self.policy.next_delay(&mut backoff);
			warn!(
				url = %call.url,
				attempt = attempts,
				delay_ms = delay.as_millis() as u64,
				"Wire call failed, attempt {}/{}, retrying: {}",
				attempts,
				max_retries + 1,
				reason
			);
			tokio::time::sleep(delay).await;
		}
	}
}
