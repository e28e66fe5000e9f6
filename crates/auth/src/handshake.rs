//! Nonce challenge-response sign-in.
//!
//! 1. fetch a nonce (and its scoping cookie) from the platform
//! 2. build the sign-in challenge for that nonce
//! 3. personal-sign the challenge
//! 4. wrap claims and signature into a bearer token
//! 5. exchange the token for a session
//!
//! Each step fails fast; nothing is retried here.

use chrono::{DateTime, Utc};
use polymarket_core::api::PlatformApi;
use polymarket_core::signing::SignInDomain;
use polymarket_core::types::{NonceGrant, Session};
use polymarket_core::{Error, Result};
use tracing::{debug, info};

use crate::siwe::{BearerToken, SigningChallenge};
use crate::wallet::WalletIdentity;

/// Drives the sign-in handshake for one wallet.
pub struct AuthHandshake<'a> {
    wallet: &'a WalletIdentity,
    domain: &'a SignInDomain,
    chain_id: u64,
}

impl<'a> AuthHandshake<'a> {
    pub fn new(wallet: &'a WalletIdentity, domain: &'a SignInDomain, chain_id: u64) -> Self {
        Self {
            wallet,
            domain,
            chain_id,
        }
    }

    /// Sign in using the current time.
    pub async fn authenticate(&self, api: &dyn PlatformApi) -> Result<Session> {
        self.authenticate_at(api, Utc::now()).await
    }

    /// Sign in with an explicit issuance time.
    pub async fn authenticate_at(
        &self,
        api: &dyn PlatformApi,
        issued_at: DateTime<Utc>,
    ) -> Result<Session> {
        info!(address = %self.wallet.address_string(), "Requesting sign-in nonce");

        let grant = api.get_nonce().await.map_err(|e| match e {
            Error::NonceFetch { .. } => e,
            other => Error::NonceFetch {
                message: other.to_string(),
            },
        })?;

        let (challenge, token) = self.prepare(&grant, issued_at).await?;
        debug!(
            nonce = %challenge.nonce,
            expires = %challenge.expiration_time_str(),
            "Challenge signed"
        );

        let session = api.login(&grant, &token).await.map_err(|e| match e {
            Error::Login { .. } => e,
            other => Error::Login {
                message: other.to_string(),
                status: None,
            },
        })?;

        info!(address = %self.wallet.address_string(), "Signed in");
        Ok(session)
    }

    /// Build, sign and wrap the challenge for `grant`.
    pub async fn prepare(
        &self,
        grant: &NonceGrant,
        issued_at: DateTime<Utc>,
    ) -> Result<(SigningChallenge, String)> {
        let challenge = SigningChallenge::new(
            self.domain,
            self.chain_id,
            self.wallet.address(),
            grant.nonce.clone(),
            issued_at,
        );

        let signature = self
            .wallet
            .sign_personal_message(&challenge.message())
            .await?;
        let token = BearerToken::encode(&challenge.claims(), &signature)?;

        Ok((challenge, token))
    }
}
