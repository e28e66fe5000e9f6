//! Sign-in challenge text and the self-issued bearer token.
//!
//! The platform verifies the personal signature against the exact challenge
//! text, so the layout and timestamp format here are part of the protocol.

use alloy_primitives::Address;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use polymarket_core::signing::SignInDomain;
use polymarket_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Challenge validity window.
pub const CHALLENGE_TTL_DAYS: i64 = 7;

/// Separator between the claims and the signature inside a bearer token.
pub const TOKEN_SEPARATOR: &str = ":::";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// ISO-8601 UTC with millisecond precision and a literal `Z`.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// A sign-in-with-Ethereum challenge for one nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningChallenge {
    pub domain: SignInDomain,
    pub chain_id: u64,
    pub address: Address,
    pub nonce: String,
    pub issued_at: DateTime<Utc>,
    pub expiration_time: DateTime<Utc>,
}

impl SigningChallenge {
    pub fn new(
        domain: &SignInDomain,
        chain_id: u64,
        address: Address,
        nonce: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            domain: domain.clone(),
            chain_id,
            address,
            nonce: nonce.into(),
            issued_at,
            expiration_time: issued_at + Duration::days(CHALLENGE_TTL_DAYS),
        }
    }

    pub fn issued_at_str(&self) -> String {
        format_timestamp(&self.issued_at)
    }

    pub fn expiration_time_str(&self) -> String {
        format_timestamp(&self.expiration_time)
    }

    /// The exact text the wallet signs.
    pub fn message(&self) -> String {
        format!(
            "{domain} wants you to sign in with your Ethereum account:\n\
            {address}\n\n\
            {statement}\n\n\
            URI: {uri}\n\
            Version: {version}\n\
            Chain ID: {chain_id}\n\
            Nonce: {nonce}\n\
            Issued At: {issued_at}\n\
            Expiration Time: {expiration_time}",
            domain = self.domain.domain,
            address = self.address.to_checksum(None),
            statement = self.domain.statement,
            uri = self.domain.uri,
            version = self.domain.version,
            chain_id = self.chain_id,
            nonce = self.nonce,
            issued_at = self.issued_at_str(),
            expiration_time = self.expiration_time_str(),
        )
    }

    /// Claims mirroring this challenge.
    pub fn claims(&self) -> BearerClaims {
        BearerClaims {
            address: self.address.to_checksum(None),
            chain_id: self.chain_id,
            nonce: self.nonce.clone(),
            domain: self.domain.domain.clone(),
            issued_at: self.issued_at_str(),
            expiration_time: self.expiration_time_str(),
            uri: self.domain.uri.clone(),
            statement: self.domain.statement.clone(),
            version: self.domain.version.clone(),
        }
    }
}

/// Claims carried by the bearer token. Field order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BearerClaims {
    pub address: String,
    pub chain_id: u64,
    pub nonce: String,
    pub domain: String,
    pub issued_at: String,
    pub expiration_time: String,
    pub uri: String,
    pub statement: String,
    pub version: String,
}

/// `base64({claims json}:::{signature})`.
pub struct BearerToken;

impl BearerToken {
    pub fn encode(claims: &BearerClaims, signature: &str) -> Result<String> {
        let json = serde_json::to_string(claims)?;
        let joined = format!("{json}{TOKEN_SEPARATOR}{signature}");
        Ok(base64::engine::general_purpose::STANDARD.encode(joined))
    }

    /// Split a token back into its claims and signature.
    pub fn decode(token: &str) -> Result<(BearerClaims, String)> {
        let malformed = |message: String| Error::Login {
            message: format!("malformed bearer token: {message}"),
            status: None,
        };

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(token.trim())
            .map_err(|e| malformed(e.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|e| malformed(e.to_string()))?;

        let (json, signature) = text
            .rsplit_once(TOKEN_SEPARATOR)
            .ok_or_else(|| malformed("missing separator".to_string()))?;
        let claims: BearerClaims =
            serde_json::from_str(json).map_err(|e| malformed(e.to_string()))?;

        Ok((claims, signature.to_string()))
    }
}
