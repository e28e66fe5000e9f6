//! API clients for external services.
//!
//! The onboarding flow talks to two HTTP services through the collaborator
//! traits defined here, so that tests can substitute mocks:
//!
//! - [`PlatformApi`]: nonce issuance, login and profile management
//!   (`gamma-api.polymarket.com`).
//! - [`RelayerApi`]: gasless transaction submission and status
//!   (`relayer-v2.polymarket.com`).

pub mod gamma;
pub mod polygon;
pub mod relayer;

use async_trait::async_trait;

use crate::types::{
    CreateProfileRequest, DisplayNameUpdate, NonceGrant, PreferencesUpdate, ProfileRecord,
    Session, SubmitRequest, SubmitResponse, TransactionState,
};
use crate::Result;

pub use gamma::GammaClient;
pub use polygon::PolygonClient;
pub use relayer::RelayerClient;

/// Platform account service.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Obtain a one-time nonce and the cookie that scopes it.
    async fn get_nonce(&self) -> Result<NonceGrant>;

    /// Exchange a bearer token for a session.
    async fn login(&self, grant: &NonceGrant, bearer_token: &str) -> Result<Session>;

    async fn create_profile(
        &self,
        session: &Session,
        request: &CreateProfileRequest,
    ) -> Result<ProfileRecord>;

    async fn update_preferences(
        &self,
        session: &Session,
        preference_id: &str,
        update: &PreferencesUpdate,
    ) -> Result<()>;

    async fn update_display_name(
        &self,
        session: &Session,
        profile_id: &str,
        update: &DisplayNameUpdate,
    ) -> Result<()>;
}

/// Gasless transaction relayer.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait RelayerApi: Send + Sync {
    async fn submit(&self, session: &Session, request: &SubmitRequest) -> Result<SubmitResponse>;

    /// Current state of a submitted transaction.
    async fn transaction_state(
        &self,
        session: &Session,
        transaction_id: &str,
    ) -> Result<TransactionState>;
}
