//! Reqwest-backed HTTP client.

use crate::{error::AttemptError, error::ClientBuildError, HttpClient};
use async_trait::async_trait;
use gateway_types::{HttpMethod, RawResponse, WireCall};
use std::time::Duration;
use tracing::debug;

/// Single-attempt client over a pooled `reqwest::Client`.
///
/// Cloning is cheap and clones share the same connection pool, so one
/// instance serves every adapter in the process.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
	client: reqwest::Client,
}

impl ReqwestClient {
	/// Creates a client with a connection pool sized for fan-out.
	pub fn new() -> Result<Self, ClientBuildError> {
		let client = reqwest::Client::builder()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(32)
			.build()?;

		Ok(Self { client })
	}

	/// Wraps an existing client, e.g. one configured with a proxy.
	pub fn with_client(client: reqwest::Client) -> Self {
		Self { client }
	}

	fn classify(error: reqwest::Error, timeout: Duration) -> AttemptError {
		if error.is_timeout() {
			AttemptError::Timeout(timeout)
		} else if error.is_builder() {
			AttemptError::Invalid(error.to_string())
		} else if error.is_connect() {
			AttemptError::Connect(error.to_string())
		} else {
			AttemptError::Request(error.to_string())
		}
	}
}

#[async_trait]
impl HttpClient for ReqwestClient {
	async fn send(&self, call: &WireCall, timeout: Duration) -> Result<RawResponse, AttemptError> {
		let method = match call.method {
			HttpMethod::Get => reqwest::Method::GET,
			HttpMethod::Post => reqwest::Method::POST,
		};

		let mut builder = self.client.request(method, &call.url).timeout(timeout);
		for (name, value) in &call.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}
		if let Some(body) = &call.body {
			builder = builder.body(body.clone());
		}

		let response = builder
			.send()
			.await
			.map_err(|e| Self::classify(e, timeout))?;

		let status = response.status().as_u16();
		let headers = response
			.headers()
			.iter()
			.filter_map(|(name, value)| {
				value
					.to_str()
					.ok()
					.map(|v| (name.as_str().to_string(), v.to_string()))
			})
			.collect();
		let body = response
			.bytes()
			.await
			.map_err(|e| Self::classify(e, timeout))?;

		debug!(url = %call.url, status, bytes = body.len(), "HTTP attempt completed");

		Ok(RawResponse {
			status,
			body,
			headers,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use wiremock::matchers::{body_json, header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	#[tokio::test]
	async fn test_post_sends_body_and_headers() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/rpc"))
			.and(header("x-api-key", "secret"))
			.and(body_json(json!({"jsonrpc": "2.0", "method": "eth_blockNumber", "params": [], "id": 1})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "0x10"})))
			.expect(1)
			.mount(&server)
			.await;

		let client = ReqwestClient::new().unwrap();
		let call = WireCall::post_json(
			format!("{}/rpc", server.uri()),
			&json!({"jsonrpc": "2.0", "method": "eth_blockNumber", "params": [], "id": 1}),
		)
		.with_headers([("x-api-key", "secret")]);

		let response = client.send(&call, Duration::from_secs(5)).await.unwrap();
		assert_eq!(response.status, 200);
		let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
		assert_eq!(body, json!({"result": "0x10"}));
	}

	#[tokio::test]
	async fn test_error_status_is_not_an_attempt_error() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/accounts/0x1"))
			.respond_with(ResponseTemplate::new(404).set_body_string("missing"))
			.mount(&server)
			.await;

		let client = ReqwestClient::new().unwrap();
		let call = WireCall::get(format!("{}/accounts/0x1", server.uri()));

		let response = client.send(&call, Duration::from_secs(5)).await.unwrap();
		assert_eq!(response.status, 404);
		assert_eq!(&response.body[..], b"missing");
	}

	#[tokio::test]
	async fn test_slow_response_times_out() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
			.mount(&server)
			.await;

		let client = ReqwestClient::new().unwrap();
		let call = WireCall::get(server.uri());

		let err = client
			.send(&call, Duration::from_millis(50))
			.await
			.unwrap_err();
		assert_eq!(err, AttemptError::Timeout(Duration::from_millis(50)));
		assert!(err.is_retryable());
	}

	#[tokio::test]
	async fn test_refused_connection_is_retryable() {
		let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
		let addr = listener.local_addr().unwrap();
		drop(listener);

		let client = ReqwestClient::new().unwrap();
		let call = WireCall::get(format!("http://{}", addr));

		let err = client.send(&call, Duration::from_secs(2)).await.unwrap_err();
		assert!(err.is_retryable());
	}

	#[tokio::test]
	async fn test_bad_url_is_invalid() {
		let client = ReqwestClient::new().unwrap();
		let call = WireCall::get("not a url");

		let err = client.send(&call, Duration::from_secs(1)).await.unwrap_err();
		assert!(matches!(err, AttemptError::Invalid(_)));
		assert!(!err.is_retryable());
	}
}
