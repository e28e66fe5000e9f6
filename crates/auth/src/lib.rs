//! Wallet Authentication
//!
//! Wallet identity, the sign-in challenge and bearer token, and the nonce
//! handshake that turns them into a platform session.

pub mod handshake;
pub mod siwe;
pub mod wallet;

pub use handshake::AuthHandshake;
pub use siwe::{BearerClaims, BearerToken, SigningChallenge};
pub use wallet::WalletIdentity;
