//! Polygon RPC client for chain parameters.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Polygon JSON-RPC client.
pub struct PolygonClient {
    rpc_url: String,
    http_client: reqwest::Client,
}

impl PolygonClient {
    /// Create a new Polygon client with a custom RPC URL.
    pub fn new(rpc_url: String) -> Self {
        Self {
            rpc_url,
            http_client: reqwest::Client::new(),
        }
    }

    /// Chain ID reported by the node.
    pub async fn get_chain_id(&self) -> Result<u64> {
        let response: JsonRpcResponse<String> =
            self.rpc_call("eth_chainId", serde_json::json!([])).await?;

        let chain_hex = response.result.ok_or_else(|| Error::Api {
            message: response
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| "No result in response".to_string()),
            status: None,
        })?;

        u64::from_str_radix(chain_hex.trim_start_matches("0x"), 16).map_err(|e| Error::Api {
            message: format!("Failed to parse chain id {chain_hex:?}: {e}"),
            status: None,
        })
    }

    async fn rpc_call<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<JsonRpcResponse<T>> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                message: format!("RPC request failed: {}", response.status()),
                status: Some(response.status().as_u16()),
            });
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'a str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcError {
    code: i64,
    message: String,
}
