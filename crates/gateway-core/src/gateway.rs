//! Request dispatch and batch fan-out.

use futures::stream::{self, StreamExt};
use gateway_chains::normalizer::{self, Condition};
use gateway_chains::ChainRegistry;
use gateway_transport::Transport;
use gateway_types::{NormalizedResult, Request};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::builder::GatewayBuilder;
use crate::settings::GatewaySettings;

/// Lifecycle of a single invocation, as reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
	Created,
	Dispatched,
	Succeeded,
	Failed,
}

impl InvocationState {
	fn settled(result: &NormalizedResult) -> Self {
		if result.is_success() {
			InvocationState::Succeeded
		} else {
			InvocationState::Failed
		}
	}
}

/// Chain-agnostic entry point for read operations.
///
/// Cheap to clone; clones share the registry and the transport (and with it
/// the connection pool).
#[derive(Clone)]
pub struct Gateway {
	registry: Arc<ChainRegistry>,
	transport: Arc<dyn Transport>,
	settings: GatewaySettings,
}

impl Gateway {
	pub fn new(
		registry: Arc<ChainRegistry>,
		transport: Arc<dyn Transport>,
		settings: GatewaySettings,
	) -> Self {
		Self {
			registry,
			transport,
			settings,
		}
	}

	pub fn builder() -> GatewayBuilder {
		GatewayBuilder::new()
	}

	pub fn registry(&self) -> &ChainRegistry {
		&self.registry
	}

	pub fn settings(&self) -> &GatewaySettings {
		&self.settings
	}

	/// Executes one request.
	///
	/// Uses the configured request deadline, if any.
	pub async fn invoke(&self, request: &Request) -> NormalizedResult {
		match self.settings.request_deadline {
			Some(deadline) => {
				self.invoke_with_deadline(request, Instant::now() + deadline)
					.await
			}
			None => self.execute(request).await,
		}
	}

	/// Executes one request, abandoning it at `deadline`.
	///
	/// An abandoned call's eventual response is discarded and the result
	/// reports `Timeout`.
	pub async fn invoke_with_deadline(&self, request: &Request, deadline: Instant) -> NormalizedResult {
		let started = Instant::now();
		match tokio::time::timeout_at(deadline, self.execute(request)).await {
			Ok(result) => result,
			Err(_) => settle(
				request,
				normalizer::failure(
					&request.chain_id,
					request.operation,
					Condition::Timeout(started.elapsed()),
				),
			),
		}
	}

	/// Executes every request concurrently and returns one result per
	/// request, in input order.
	///
	/// A failing request never affects the others.
	pub async fn invoke_batch(&self, requests: &[Request]) -> Vec<NormalizedResult> {
		let deadline = self
			.settings
			.request_deadline
			.map(|deadline| Instant::now() + deadline);
		self.run_batch(requests, deadline).await
	}

	/// [`Gateway::invoke_batch`] with one deadline shared by every item.
	pub async fn invoke_batch_with_deadline(
		&self,
		requests: &[Request],
		deadline: Instant,
	) -> Vec<NormalizedResult> {
		self.run_batch(requests, Some(deadline)).await
	}

	async fn run_batch(&self, requests: &[Request], deadline: Option<Instant>) -> Vec<NormalizedResult> {
		if requests.is_empty() {
			return Vec::new();
		}

		let concurrency = requests.len().min(self.settings.max_concurrency.max(1));
		debug!(size = requests.len(), concurrency, "Dispatching batch");

		let mut slots: Vec<Option<NormalizedResult>> = vec![None; requests.len()];
		let mut completions = stream::iter(requests.iter().enumerate())
			.map(|(index, request)| async move {
				let result = match deadline {
					Some(deadline) => self.invoke_with_deadline(request, deadline).await,
					None => self.execute(request).await,
				};
				(index, result)
			})
			.buffer_unordered(concurrency);

		while let Some((index, result)) = completions.next().await {
			slots[index] = Some(result);
		}

		// Every slot is filled once the stream is drained.
		slots
			.into_iter()
			.zip(requests)
			.map(|(slot, request)| {
				slot.unwrap_or_else(|| {
					normalizer::failure(
						&request.chain_id,
						request.operation,
						Condition::Timeout(Duration::ZERO),
					)
				})
			})
			.collect()
	}

	async fn execute(&self, request: &Request) -> NormalizedResult {
		let chain_id = &request.chain_id;
		let operation = request.operation;
		debug!(
			chain = %chain_id,
			operation = %operation,
			state = ?InvocationState::Created,
			"Invocation created"
		);

		let adapter = match self.registry.lookup(chain_id) {
			Ok(adapter) => adapter,
			Err(_) => {
				return settle(
					request,
					normalizer::failure(chain_id, operation, Condition::UnknownChain),
				)
			}
		};

		if !adapter.supports(operation) {
			return settle(
				request,
				normalizer::failure(chain_id, operation, Condition::UnsupportedOperation),
			);
		}

		let call = match adapter.build_request(operation, &request.params) {
			Ok(call) => call,
			Err(e) => return settle(request, normalizer::failure(chain_id, operation, e.into())),
		};

		let spec = adapter.spec();
		let timeout = spec.timeout_for(operation, self.settings.default_timeout);
		let max_retries = spec.max_retries.unwrap_or(self.settings.max_retries);
		debug!(
			chain = %chain_id,
			operation = %operation,
			state = ?InvocationState::Dispatched,
			method = %call.method,
			url = %call.url,
			timeout_ms = timeout.as_millis() as u64,
			max_retries,
			"Invocation dispatched"
		);

		let result = match self.transport.execute(&call, timeout, max_retries).await {
			Ok(raw) => adapter.parse_response(operation, raw),
			Err(e) => normalizer::failure(chain_id, operation, e.into()),
		};

		settle(request, result)
	}
}

impl fmt::Debug for Gateway {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Gateway")
			.field("registry", &self.registry)
			.field("settings", &self.settings)
			.finish()
	}
}

fn settle(request: &Request, result: NormalizedResult) -> NormalizedResult {
	let state = InvocationState::settled(&result);
	match result.error() {
		None => debug!(
			chain = %request.chain_id,
			operation = %request.operation,
			state = ?state,
			"Invocation succeeded"
		),
		Some(error) => warn!(
			chain = %request.chain_id,
			operation = %request.operation,
			state = ?state,
			kind = %error.kind,
			"Invocation failed: {}",
			error.message
		),
	}
	result
}
