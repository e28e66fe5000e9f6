//! EIP-712 typed structured data hashing.
//!
//! Payloads arrive as JSON documents (`types`, `primaryType`, `domain`,
//! `message`) and are hashed by `alloy-dyn-abi`'s EIP-712 resolver:
//!
//! ```text
//! hashStruct(s)  = keccak256(typeHash(s) ++ encodeData(s))
//! signing hash   = keccak256(0x19 ++ 0x01 ++ domainSeparator ++ hashStruct(message))
//! ```

use alloy_dyn_abi::{PropertyDef, Resolver, TypeDef, TypedData as DynTypedData};
use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::Eip712Domain;
use serde::Serialize;
use serde_json::{json, Value};
use std::borrow::Cow;

use super::domain::Deployment;
use crate::{Error, Result};

/// Name of the domain struct type.
pub const EIP712_DOMAIN_TYPE: &str = "EIP712Domain";

/// Primary type of the trading-enablement payload.
pub const CREATE_PROXY_TYPE: &str = "CreateProxy";

const REQUIRED_FIELDS: [&str; 4] = ["types", "primaryType", "domain", "message"];

/// EIP-712 typed data payload.
///
/// The domain separator is always computed from the domain fields present,
/// so a payload that omits `EIP712Domain` from `types` hashes the same as one
/// that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypedData {
    inner: DynTypedData,
}

impl TypedData {
    /// Parse and validate a payload from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| Error::typed_data(e.to_string()))?;
        Self::from_value(value)
    }

    /// Parse and validate a payload from a JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::typed_data("typed data must be a JSON object"))?;
        for field in REQUIRED_FIELDS {
            if !object.contains_key(field) {
                return Err(Error::typed_data(format!("missing field `{field}`")));
            }
        }

        let inner: DynTypedData =
            serde_json::from_value(value).map_err(|e| Error::typed_data(e.to_string()))?;
        if inner.primary_type.is_empty() {
            return Err(Error::typed_data("primaryType is empty"));
        }
        // Every type reachable from the primary type must be declared.
        inner
            .resolver
            .resolve(&inner.primary_type)
            .map_err(|e| Error::typed_data(e.to_string()))?;

        Ok(Self { inner })
    }

    /// The `CreateProxy` authorization that enables trading for a new account.
    ///
    /// Payment token, payment and receiver are all zero: the relayer pays for
    /// the deployment.
    pub fn create_proxy(deployment: &Deployment) -> Self {
        let domain = Eip712Domain::new(
            Some(Cow::Owned(deployment.proxy_factory_name.clone())),
            None,
            Some(U256::from(deployment.chain_id)),
            Some(deployment.proxy_factory),
            None,
        );

        let mut resolver = Resolver::default();
        resolver.ingest(TypeDef::new_unchecked(
            CREATE_PROXY_TYPE.to_string(),
            vec![
                PropertyDef::new_unchecked("address", "paymentToken"),
                PropertyDef::new_unchecked("uint256", "payment"),
                PropertyDef::new_unchecked("address", "paymentReceiver"),
            ],
        ));

        let zero = Address::ZERO.to_string();
        let message = json!({
            "paymentToken": zero,
            "payment": "0",
            "paymentReceiver": zero,
        });

        Self {
            inner: DynTypedData {
                domain,
                resolver,
                primary_type: CREATE_PROXY_TYPE.to_string(),
                message,
            },
        }
    }

    pub fn primary_type(&self) -> &str {
        &self.inner.primary_type
    }

    pub fn domain(&self) -> &Eip712Domain {
        self.inner.domain()
    }

    pub fn message(&self) -> &Value {
        &self.inner.message
    }

    /// `encodeType` of the primary type: its signature followed by its
    /// dependencies in alphabetical order.
    pub fn encode_type(&self) -> Result<String> {
        self.inner
            .encode_type()
            .map_err(|e| Error::typed_data(e.to_string()))
    }

    pub fn type_hash(&self) -> Result<B256> {
        self.encode_type().map(keccak256)
    }

    /// Hash of the domain under the `EIP712Domain` type.
    pub fn domain_separator(&self) -> B256 {
        self.inner.domain().separator()
    }

    /// Hash of the message under the primary type.
    pub fn struct_hash(&self) -> Result<B256> {
        self.inner.hash_struct().map_err(|e| {
            Error::typed_data(format!("{}: {e}", self.inner.primary_type))
        })
    }

    /// The digest a wallet signs for this payload.
    pub fn signing_hash(&self) -> Result<B256> {
        Ok(eip712_digest(self.domain_separator(), self.struct_hash()?))
    }
}

/// Compute the EIP-712 typed data hash.
pub fn eip712_digest(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut data = [0u8; 66];
    data[0] = 0x19;
    data[1] = 0x01;
    data[2..34].copy_from_slice(domain_separator.as_slice());
    data[34..66].copy_from_slice(struct_hash.as_slice());
    keccak256(data)
}
