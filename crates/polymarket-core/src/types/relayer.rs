//! Relayer submission and transaction status types.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::signing::Deployment;

/// Relayer transaction type that deploys a proxy wallet.
pub const SAFE_CREATE: &str = "SAFE-CREATE";

/// Payment parameters covered by the CreateProxy signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureParams {
    pub payment_token: String,
    pub payment: String,
    pub payment_receiver: String,
}

impl SignatureParams {
    /// No payment: zero token, zero amount, zero receiver.
    pub fn unpaid() -> Self {
        Self {
            payment_token: Address::ZERO.to_string(),
            payment: "0".to_string(),
            payment_receiver: Address::ZERO.to_string(),
        }
    }
}

/// Body of `POST /submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub from: String,
    pub to: String,
    pub proxy_wallet: String,
    pub data: String,
    pub signature: String,
    pub signature_params: SignatureParams,
    #[serde(rename = "type")]
    pub kind: String,
}

impl SubmitRequest {
    /// Proxy wallet deployment authorized by a CreateProxy signature.
    pub fn safe_create(
        owner: Address,
        proxy: Address,
        signature: impl Into<String>,
        deployment: &Deployment,
    ) -> Self {
        Self {
            from: owner.to_checksum(None),
            to: deployment.proxy_factory.to_checksum(None),
            proxy_wallet: proxy.to_checksum(None),
            data: "0x".to_string(),
            signature: signature.into(),
            signature_params: SignatureParams::unpaid(),
            kind: SAFE_CREATE.to_string(),
        }
    }
}

/// Relayer reply to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    #[serde(rename = "transactionID")]
    pub transaction_id: String,
    #[serde(rename = "transactionHash", default)]
    pub transaction_hash: Option<String>,
    pub state: TransactionState,
}

/// One record of `GET /transaction?id=`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelayerTransaction {
    #[serde(rename = "transactionID")]
    pub transaction_id: String,
    #[serde(rename = "transactionHash", default)]
    pub transaction_hash: Option<String>,
    #[serde(rename = "proxyAddress", default)]
    pub proxy_address: Option<String>,
    pub state: TransactionState,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Relayer-reported transaction state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionState {
    New,
    Executed,
    Mined,
    Confirmed,
    Failed,
    Invalid,
    Other(String),
}

impl TransactionState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "STATE_NEW",
            Self::Executed => "STATE_EXECUTED",
            Self::Mined => "STATE_MINED",
            Self::Confirmed => "STATE_CONFIRMED",
            Self::Failed => "STATE_FAILED",
            Self::Invalid => "STATE_INVALID",
            Self::Other(raw) => raw,
        }
    }

    /// Whether the poller may stop. Only `STATE_MINED` counts.
    pub fn is_mined(&self) -> bool {
        matches!(self, Self::Mined)
    }
}

impl From<String> for TransactionState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "STATE_NEW" => Self::New,
            "STATE_EXECUTED" => Self::Executed,
            "STATE_MINED" => Self::Mined,
            "STATE_CONFIRMED" => Self::Confirmed,
            "STATE_FAILED" => Self::Failed,
            "STATE_INVALID" => Self::Invalid,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for TransactionState {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<TransactionState> for String {
    fn from(state: TransactionState) -> Self {
        state.as_str().to_string()
    }
}

impl std::fmt::Display for TransactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
