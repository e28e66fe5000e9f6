//! Counterfactual proxy wallet address derivation.
//!
//! The proxy factory deploys each user's wallet with CREATE2, salted by the
//! keccak256 of the ABI-encoded owner address. The address is therefore known
//! (and fundable) before the wallet is ever deployed.

use alloy_primitives::{keccak256, Address};
use alloy_sol_types::SolValue;
use std::str::FromStr;

use super::domain::Deployment;
use crate::{Error, Result};

/// Derive the proxy wallet address owned by `owner`.
///
/// `keccak256(0xff ++ factory ++ keccak256(abi.encode(owner)) ++ initCodeHash)[12..]`
pub fn derive_proxy_address(owner: Address, deployment: &Deployment) -> Address {
    let salt = keccak256(owner.abi_encode());
    deployment
        .proxy_factory
        .create2(salt, deployment.proxy_init_code_hash)
}

/// Derive the proxy wallet address from a hex-encoded owner address.
pub fn derive_proxy_address_str(owner: &str, deployment: &Deployment) -> Result<Address> {
    let owner = Address::from_str(owner.trim()).map_err(|e| Error::ProxyDerivation {
        message: format!("invalid owner address {owner:?}: {e}"),
    })?;
    Ok(derive_proxy_address(owner, deployment))
}
