//! Upstream address provider client
//!
//! The gateway issues exactly one outbound call type: POST with a JSON body
//! to the configured provider endpoint. The provider owns the response
//! shape; everything that comes back is handed to the service layer as raw
//! JSON. Failures are classified here, at the raise site: transport errors,
//! non-OK statuses and timeouts are "unavailable", an unparseable body is a
//! contract violation.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{trace, warn};
use ureq::Agent;

use crate::errors::{AddrGateError, Result};

/// Outbound seam of the gateway. Production uses [`HttpUpstreamClient`];
/// tests inject a mock.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// POST `body` to the provider and return its decoded JSON payload.
    async fn query(&self, body: Value) -> Result<Value>;
}

/// ureq-backed provider client.
///
/// ureq is synchronous; calls run on the blocking pool so a request task
/// only ever suspends while the upstream round-trip is in flight. The
/// agent carries a global timeout covering connect, send and read.
pub struct HttpUpstreamClient {
    endpoint: String,
    agent: Agent,
}

impl HttpUpstreamClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            endpoint: endpoint.to_string(),
            agent,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Synchronous POST, called inside `spawn_blocking`.
    fn post_sync(agent: Agent, endpoint: String, body: Value) -> Result<Value> {
        let response = match agent.post(&endpoint).send_json(&body) {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(code)) => {
                warn!("Address provider returned bad response: {}", code);
                return Err(AddrGateError::upstream_unavailable(format!(
                    "Address provider returned status {}",
                    code
                )));
            }
            Err(e) => {
                warn!("Address provider request to \"{}\" failed: {}", endpoint, e);
                return Err(AddrGateError::upstream_unavailable(
                    "Failed to reach address provider",
                ));
            }
        };

        response.into_body().read_json::<Value>().map_err(|e| {
            warn!("Address provider response parse failed: {}", e);
            AddrGateError::upstream_contract("Unexpected response from address provider")
        })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn query(&self, body: Value) -> Result<Value> {
        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();
        trace!("Dispatching upstream query to {}", endpoint);

        tokio::task::spawn_blocking(move || Self::post_sync(agent, endpoint, body))
            .await
            .unwrap_or_else(|e| {
                warn!("Upstream query task failed: {}", e);
                Err(AddrGateError::upstream_unavailable(
                    "Failed to reach address provider",
                ))
            })
    }
}
