//! Wallet identity for platform sign-in and typed-data authorization.
//!
//! Provides wallet loading from environment variables, EIP-191 personal
//! signatures for the sign-in challenge and EIP-712 signatures for relayer
//! actions.

use alloy_primitives::{Address, Signature, B256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use polymarket_core::signing::{eip712_digest, TypedData};
use polymarket_core::{Error, Result};
use std::str::FromStr;
use tracing::debug;

/// Offset the platform expects on the recovery byte of typed-data signatures.
const TYPED_DATA_V_OFFSET: u8 = 27;

/// A wallet identity backed by a secp256k1 private key.
///
/// The address is derived once at construction and never changes.
#[derive(Clone)]
pub struct WalletIdentity {
    signer: PrivateKeySigner,
    address: Address,
}

impl WalletIdentity {
    /// Load wallet from the `WALLET_PRIVATE_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the variable is not set and `InvalidKey` if it does
    /// not hold a valid key.
    pub fn from_env() -> Result<Self> {
        let private_key = std::env::var("WALLET_PRIVATE_KEY")
            .map_err(|_| Error::config("WALLET_PRIVATE_KEY environment variable not set"))?;

        Self::from_private_key(&private_key)
    }

    /// Create a wallet from a hex-encoded private key.
    ///
    /// # Arguments
    ///
    /// * `key` - A 64-character hex string, optionally prefixed with "0x"
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the string is not hex, has the wrong length or
    /// is not a valid secp256k1 scalar.
    pub fn from_private_key(key: &str) -> Result<Self> {
        let key = key.trim();
        let key_clean = key.strip_prefix("0x").unwrap_or(key);

        if key_clean.len() != 64 {
            return Err(Error::InvalidKey {
                message: format!("expected 64 hex characters, got {}", key_clean.len()),
            });
        }

        // The underlying error may echo input; keep the message generic.
        let signer = PrivateKeySigner::from_str(key_clean).map_err(|_| Error::InvalidKey {
            message: "not a valid secp256k1 private key".to_string(),
        })?;

        let address = signer.address();

        Ok(Self { signer, address })
    }

    /// Get the wallet's Ethereum address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the wallet address as a checksummed hex string.
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }

    /// Sign a message with the EIP-191 personal-message prefix.
    ///
    /// The final byte is the raw recovery id (0 or 1), the encoding the
    /// platform's login verifier expects.
    pub async fn sign_personal_message(&self, message: &str) -> Result<String> {
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| Error::Signing {
                message: e.to_string(),
            })?;

        debug!(message_len = message.len(), "Signed personal message");
        Ok(encode_signature(&signature, 0))
    }

    /// Sign `keccak256(0x1901 || domain_separator || struct_hash)`.
    ///
    /// The final byte is the raw recovery id plus 27.
    pub async fn sign_typed_data(
        &self,
        domain_separator: B256,
        struct_hash: B256,
    ) -> Result<String> {
        let digest = eip712_digest(domain_separator, struct_hash);
        let signature = self
            .signer
            .sign_hash(&digest)
            .await
            .map_err(|e| Error::Signing {
                message: e.to_string(),
            })?;

        Ok(encode_signature(&signature, TYPED_DATA_V_OFFSET))
    }

    /// Hash and sign a complete EIP-712 payload.
    ///
    /// # Errors
    ///
    /// Returns `TypedDataParse` if the payload cannot be hashed.
    pub async fn sign_typed_payload(&self, payload: &TypedData) -> Result<String> {
        let domain_separator = payload.domain_separator();
        let struct_hash = payload.struct_hash()?;

        debug!(primary_type = payload.primary_type(), "Signing typed data");
        self.sign_typed_data(domain_separator, struct_hash).await
    }
}

/// `0x` hex of `r || s || v`, with `v` the recovery id plus `v_offset`.
fn encode_signature(signature: &Signature, v_offset: u8) -> String {
    let mut bytes = [0u8; 65];
    bytes[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
    bytes[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
    bytes[64] = u8::from(signature.v()) + v_offset;
    format!("0x{}", hex::encode(bytes))
}

impl std::fmt::Debug for WalletIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose the private key in debug output
        f.debug_struct("WalletIdentity")
            .field("address", &self.address_string())
            .finish()
    }
}
