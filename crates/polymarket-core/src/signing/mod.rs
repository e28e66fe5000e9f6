//! Signing primitives for Polymarket account onboarding.
//!
//! This module holds the parts of the onboarding handshake that are pure
//! functions of their inputs: deployment parameters, EIP-712 typed data
//! hashing, and the counterfactual proxy wallet address.
//!
//! # Architecture
//!
//! ```text
//! WalletIdentity (auth crate)
//!       │
//!       ├── personal_sign ──► sign-in challenge ──► bearer token
//!       │
//!       └── sign_typed_data ◄── TypedData::create_proxy(Deployment)
//!                                        │
//!                                        ▼
//!                               relayer SAFE-CREATE
//!
//! owner address ── derive_proxy_address(Deployment) ──► proxy wallet
//! ```
//!
//! # Example
//!
//! ```ignore
//! use polymarket_core::signing::{derive_proxy_address, Deployment, TypedData};
//!
//! let deployment = Deployment::polygon();
//! let proxy = derive_proxy_address(owner, &deployment);
//!
//! let payload = TypedData::create_proxy(&deployment);
//! let digest = payload.signing_hash()?;
//! ```

pub mod domain;
pub mod proxy;
pub mod typed_data;

pub use domain::{
    Deployment, SignInDomain, POLYGON_AMOY_CHAIN_ID, POLYGON_CHAIN_ID, PROXY_FACTORY_ADDRESS,
    PROXY_FACTORY_NAME, PROXY_INIT_CODE_HASH,
};

pub use proxy::{derive_proxy_address, derive_proxy_address_str};

pub use typed_data::{eip712_digest, TypedData, CREATE_PROXY_TYPE, EIP712_DOMAIN_TYPE};
