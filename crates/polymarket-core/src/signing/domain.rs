//! Deployment parameters for Polymarket account onboarding.
//!
//! The proxy factory address, its init-code hash and the sign-in domain are
//! fixed for a given deployment. They are grouped into value objects so that
//! tests can target an alternate deployment without touching the logic that
//! consumes them.

use alloy_primitives::{address, b256, Address, B256};

/// Chain ID for Polygon mainnet.
pub const POLYGON_CHAIN_ID: u64 = 137;

/// Chain ID for Polygon Amoy testnet.
pub const POLYGON_AMOY_CHAIN_ID: u64 = 80002;

/// Safe proxy factory on Polygon mainnet.
pub const PROXY_FACTORY_ADDRESS: Address = address!("aacFeEa03eb1561C4e67d661e40682Bd20E3541b");

/// keccak256 of the Safe proxy creation code deployed by the factory.
pub const PROXY_INIT_CODE_HASH: B256 =
    b256!("2bce2127ff07fb632d16c8347c4ebf501f4841168bed00d9e6ef715ddb6fcecf");

/// EIP-712 domain name of the proxy factory.
pub const PROXY_FACTORY_NAME: &str = "Polymarket Contract Proxy Factory";

/// On-chain deployment the onboarding flow targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    /// Chain ID.
    pub chain_id: u64,
    /// CREATE2 deployer of the proxy wallets.
    pub proxy_factory: Address,
    /// Init-code hash used in the CREATE2 derivation.
    pub proxy_init_code_hash: B256,
    /// EIP-712 domain name of the factory.
    pub proxy_factory_name: String,
}

impl Deployment {
    /// Polygon mainnet deployment.
    pub fn polygon() -> Self {
        Self {
            chain_id: POLYGON_CHAIN_ID,
            proxy_factory: PROXY_FACTORY_ADDRESS,
            proxy_init_code_hash: PROXY_INIT_CODE_HASH,
            proxy_factory_name: PROXY_FACTORY_NAME.to_string(),
        }
    }

    /// Deployment with custom parameters.
    pub fn custom(
        chain_id: u64,
        proxy_factory: Address,
        proxy_init_code_hash: B256,
        proxy_factory_name: impl Into<String>,
    ) -> Self {
        Self {
            chain_id,
            proxy_factory,
            proxy_init_code_hash,
            proxy_factory_name: proxy_factory_name.into(),
        }
    }
}

impl Default for Deployment {
    fn default() -> Self {
        Self::polygon()
    }
}

/// Sign-in-with-Ethereum parameters presented by the web app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInDomain {
    pub domain: String,
    pub uri: String,
    pub statement: String,
    pub version: String,
}

impl SignInDomain {
    /// polymarket.com sign-in parameters.
    pub fn polymarket() -> Self {
        Self {
            domain: "polymarket.com".to_string(),
            uri: "https://polymarket.com".to_string(),
            statement: "Welcome to Polymarket! Sign to connect.".to_string(),
            version: "1".to_string(),
        }
    }
}

impl Default for SignInDomain {
    fn default() -> Self {
        Self::polymarket()
    }
}
