use crate::utils::error::{BookingError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 over HTTP, shared by the ledger node and the signing agent.
pub struct JsonRpcClient {
    endpoint: String,
    client: Client,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("JSON-RPC #{} {} -> {}", id, method, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&RpcRequest {
                jsonrpc: "2.0",
                id,
                method,
                params,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BookingError::RpcError {
                code: i64::from(status.as_u16()),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let body: RpcResponse = response.json().await?;
        if let Some(error) = body.error {
            tracing::debug!("JSON-RPC #{} {} failed: {} {}", id, method, error.code, error.message);
            return Err(BookingError::RpcError {
                code: error.code,
                message: error.message,
            });
        }

        Ok(serde_json::from_value(body.result.unwrap_or(Value::Null))?)
    }
}
