//! End-to-end account onboarding.
//!
//! The flow is strictly sequential: every step consumes the previous step's
//! output, and the first failure aborts the run. Side effects already made on
//! the platform (a created profile, for instance) are not rolled back.

use alloy_primitives::Address;
use auth::{AuthHandshake, WalletIdentity};
use chrono::Utc;
use polymarket_core::api::{PlatformApi, PolygonClient, RelayerApi};
use polymarket_core::config::OnboardingConfig;
use polymarket_core::signing::{derive_proxy_address, Deployment, SignInDomain, TypedData};
use polymarket_core::types::{
    CreateProfileRequest, DisplayNameUpdate, PreferencesUpdate, SubmitRequest,
};
use polymarket_core::{ConfirmationPoller, Error, PollPolicy, PollReport, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::names::generate_display_name;

/// Bounded retry for calls that depend on freshly created server state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlePolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            interval: Duration::from_secs(2),
        }
    }
}

impl From<&OnboardingConfig> for SettlePolicy {
    fn from(config: &OnboardingConfig) -> Self {
        Self {
            attempts: config.settle_attempts,
            interval: config.settle_interval,
        }
    }
}

/// Whether a failure may clear once the server catches up.
fn not_yet_settled(error: &Error) -> bool {
    error.is_retryable()
        || matches!(
            error,
            Error::Api {
                status: Some(404),
                ..
            }
        )
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct OnboardingReport {
    pub address: Address,
    pub proxy_wallet: Address,
    pub profile_id: String,
    pub display_name: String,
    pub transaction_id: String,
    pub poll: PollReport,
}

/// Runs the onboarding sequence for one wallet.
pub struct Onboarder<'a> {
    wallet: &'a WalletIdentity,
    platform: &'a dyn PlatformApi,
    relayer: &'a dyn RelayerApi,
    deployment: Deployment,
    sign_in: SignInDomain,
    settle: SettlePolicy,
    poller: ConfirmationPoller,
}

impl<'a> Onboarder<'a> {
    pub fn new(
        wallet: &'a WalletIdentity,
        platform: &'a dyn PlatformApi,
        relayer: &'a dyn RelayerApi,
    ) -> Self {
        Self {
            wallet,
            platform,
            relayer,
            deployment: Deployment::default(),
            sign_in: SignInDomain::default(),
            settle: SettlePolicy::default(),
            poller: ConfirmationPoller::default(),
        }
    }

    pub fn with_deployment(mut self, deployment: Deployment) -> Self {
        self.deployment = deployment;
        self
    }

    pub fn with_sign_in_domain(mut self, sign_in: SignInDomain) -> Self {
        self.sign_in = sign_in;
        self
    }

    pub fn with_settle_policy(mut self, settle: SettlePolicy) -> Self {
        self.settle = settle;
        self
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poller = ConfirmationPoller::new(policy);
        self
    }

    /// Run the flow, aborting with `Timeout` once `deadline` elapses.
    pub async fn run_with_deadline(&self, deadline: Duration) -> Result<OnboardingReport> {
        tokio::time::timeout(deadline, self.run())
            .await
            .map_err(|_| Error::Timeout { deadline })?
    }

    pub async fn run(&self) -> Result<OnboardingReport> {
        let owner = self.wallet.address();
        let proxy_wallet = derive_proxy_address(owner, &self.deployment);
        info!(address = %owner, proxy_wallet = %proxy_wallet, "Starting onboarding");

        let session = AuthHandshake::new(self.wallet, &self.sign_in, self.deployment.chain_id)
            .authenticate(self.platform)
            .await?;

        let request =
            CreateProfileRequest::for_wallet(owner, proxy_wallet, Utc::now().timestamp_millis());
        let profile = self.platform.create_profile(&session, &request).await?;
        let profile_id = profile.id.clone();
        let preference_id = profile
            .preference_id()
            .ok_or_else(|| Error::Api {
                message: format!("profile {profile_id} has no preference record"),
                status: None,
            })?
            .to_string();

        let preferences = PreferencesUpdate::opt_in_all();
        self.settle("update preferences", || {
            self.platform
                .update_preferences(&session, &preference_id, &preferences)
        })
        .await?;

        let display_name = generate_display_name(&mut rand::rng());
        let name_update = DisplayNameUpdate::new(display_name.clone());
        self.settle("update display name", || {
            self.platform
                .update_display_name(&session, &profile_id, &name_update)
        })
        .await?;
        info!(profile_id = %profile_id, display_name = %display_name, "Profile configured");

        let payload = TypedData::create_proxy(&self.deployment);
        let signature = self.wallet.sign_typed_payload(&payload).await?;
        let submission =
            SubmitRequest::safe_create(owner, proxy_wallet, signature, &self.deployment);
        let submitted = self.relayer.submit(&session, &submission).await?;
        info!(
            transaction_id = %submitted.transaction_id,
            state = %submitted.state,
            "Trading enablement submitted"
        );

        let poll = self
            .poller
            .poll(self.relayer, &session, &submitted.transaction_id)
            .await
            .into_result()?;

        Ok(OnboardingReport {
            address: owner,
            proxy_wallet,
            profile_id,
            display_name,
            transaction_id: submitted.transaction_id,
            poll,
        })
    }

    /// Retry `call` while the server has not caught up with earlier writes.
    async fn settle<F, Fut>(&self, step: &str, mut call: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let attempts = self.settle.attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match call().await {
                Ok(()) => {
                    debug!(step = step, attempt = attempt, "Step settled");
                    return Ok(());
                }
                Err(e) if attempt < attempts && not_yet_settled(&e) => {
                    warn!(
                        step = step,
                        attempt = attempt,
                        max_attempts = attempts,
                        error = %e,
                        "Step not settled yet, retrying"
                    );
                    tokio::time::sleep(self.settle.interval).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Fail unless the RPC node serves the deployment's chain.
pub async fn check_chain_id(client: &PolygonClient, deployment: &Deployment) -> Result<()> {
    let chain_id = client.get_chain_id().await?;
    if chain_id != deployment.chain_id {
        return Err(Error::config(format!(
            "RPC node serves chain {chain_id}, expected {}",
            deployment.chain_id
        )));
    }
    info!(chain_id = chain_id, "RPC chain verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use mockall::Sequence;
    use polymarket_core::api::{MockPlatformApi, MockRelayerApi};
    use polymarket_core::types::{
        NonceGrant, PreferenceRecord, ProfileRecord, Session, SubmitResponse, TransactionState,
        UserRecord,
    };
    use polymarket_core::PollState;
    use serde_json::json;
    use tokio_test::assert_ok;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";
    const KEY_ONE_PROXY: Address = address!("51b7C68A71dCcBc0b7FA4400934a293D8f4d3Ba8");
    const CREATE_PROXY_SIGNATURE: &str = "0x322e4c2085396e24dbab26880bf2ccb8ab9182754f6e5921ccf03f271a1422a3\
         7f2c01891e773519d150d431119fc3ca6587fbcb70b8cfc1ef7f373ec26dddb01b";

    fn wallet() -> WalletIdentity {
        WalletIdentity::from_private_key(KEY_ONE).unwrap()
    }

    fn fast_settle() -> SettlePolicy {
        SettlePolicy {
            attempts: 3,
            interval: Duration::from_millis(1),
        }
    }

    fn fast_poll() -> PollPolicy {
        PollPolicy {
            max_attempts: 5,
            attempt_delay: Duration::from_millis(1),
            backoff: Duration::from_millis(1),
        }
    }

    fn profile() -> ProfileRecord {
        ProfileRecord {
            id: "profile-1".to_string(),
            name: None,
            proxy_wallet: None,
            users: vec![UserRecord {
                id: Some("user-1".to_string()),
                address: None,
                proxy_wallet: None,
                preferences: vec![PreferenceRecord {
                    id: "pref-1".to_string(),
                    market_interests: None,
                    preferences_status: None,
                }],
            }],
        }
    }

    /// A platform that signs in and accepts every profile call.
    fn signed_in_platform() -> MockPlatformApi {
        let mut platform = MockPlatformApi::new();
        platform
            .expect_get_nonce()
            .times(1)
            .returning(|| Ok(NonceGrant::new("nonce-1", "nonce-cookie")));
        platform
            .expect_login()
            .times(1)
            .returning(|grant, _| Ok(Session::new(grant.nonce_cookie.clone(), "session-1")));
        platform
    }

    fn submitted() -> SubmitResponse {
        SubmitResponse {
            transaction_id: "tx-1".to_string(),
            transaction_hash: None,
            state: TransactionState::New,
        }
    }

    #[tokio::test]
    async fn test_full_flow() {
        let wallet = wallet();
        let mut platform = signed_in_platform();
        platform
            .expect_create_profile()
            .withf(|session, request| {
                session.session_cookie() == "session-1"
                    && request.proxy_wallet == KEY_ONE_PROXY.to_checksum(None)
                    && request.users[0].address == "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
            })
            .times(1)
            .returning(|_, _| Ok(profile()));
        platform
            .expect_update_preferences()
            .withf(|_, preference_id, _| preference_id == "pref-1")
            .times(1)
            .returning(|_, _, _| Ok(()));
        platform
            .expect_update_display_name()
            .withf(|_, profile_id, update| profile_id == "profile-1" && update.name.contains('-'))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut relayer = MockRelayerApi::new();
        relayer
            .expect_submit()
            .withf(|_, request| {
                request.kind == "SAFE-CREATE"
                    && request.proxy_wallet == KEY_ONE_PROXY.to_checksum(None)
                    && request.signature == CREATE_PROXY_SIGNATURE
            })
            .times(1)
            .returning(|_, _| Ok(submitted()));
        relayer
            .expect_transaction_state()
            .withf(|_, id| id == "tx-1")
            .times(1)
            .returning(|_, _| Ok(TransactionState::Mined));

        let report = assert_ok!(
            Onboarder::new(&wallet, &platform, &relayer)
                .with_settle_policy(fast_settle())
                .with_poll_policy(fast_poll())
                .run()
                .await
        );

        assert_eq!(report.address, wallet.address());
        assert_eq!(report.proxy_wallet, KEY_ONE_PROXY);
        assert_eq!(report.profile_id, "profile-1");
        assert_eq!(report.transaction_id, "tx-1");
        assert_eq!(report.poll.state, PollState::Mined);
        assert_eq!(report.poll.attempts, 1);
    }

    #[tokio::test]
    async fn test_login_failure_aborts_before_profile() {
        let wallet = wallet();
        let mut platform = MockPlatformApi::new();
        platform
            .expect_get_nonce()
            .returning(|| Ok(NonceGrant::new("nonce-1", "nonce-cookie")));
        platform.expect_login().returning(|_, _| {
            Err(Error::Login {
                message: "unexpected status 403 Forbidden".to_string(),
                status: Some(403),
            })
        });
        platform.expect_create_profile().never();
        platform.expect_update_preferences().never();
        platform.expect_update_display_name().never();

        let mut relayer = MockRelayerApi::new();
        relayer.expect_submit().never();
        relayer.expect_transaction_state().never();

        let err = Onboarder::new(&wallet, &platform, &relayer)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Login { .. }));
    }

    #[tokio::test]
    async fn test_settle_retries_until_profile_visible() {
        let wallet = wallet();
        let mut platform = signed_in_platform();
        platform
            .expect_create_profile()
            .returning(|_, _| Ok(profile()));

        let mut seq = Sequence::new();
        platform
            .expect_update_preferences()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _, _| {
                Err(Error::Api {
                    message: "preference not found".to_string(),
                    status: Some(404),
                })
            });
        platform
            .expect_update_preferences()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        platform
            .expect_update_display_name()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut relayer = MockRelayerApi::new();
        relayer.expect_submit().returning(|_, _| Ok(submitted()));
        relayer
            .expect_transaction_state()
            .returning(|_, _| Ok(TransactionState::Mined));

        let report = Onboarder::new(&wallet, &platform, &relayer)
            .with_settle_policy(fast_settle())
            .with_poll_policy(fast_poll())
            .run()
            .await
            .unwrap();
        assert!(report.poll.is_mined());
    }

    #[tokio::test]
    async fn test_settle_does_not_retry_client_errors() {
        let wallet = wallet();
        let mut platform = signed_in_platform();
        platform
            .expect_create_profile()
            .returning(|_, _| Ok(profile()));
        platform
            .expect_update_preferences()
            .times(1)
            .returning(|_, _, _| {
                Err(Error::Api {
                    message: "bad request".to_string(),
                    status: Some(400),
                })
            });
        platform.expect_update_display_name().never();

        let mut relayer = MockRelayerApi::new();
        relayer.expect_submit().never();

        let err = Onboarder::new(&wallet, &platform, &relayer)
            .with_settle_policy(fast_settle())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api { status: Some(400), .. }));
    }

    #[tokio::test]
    async fn test_settle_gives_up_after_budget() {
        let wallet = wallet();
        let mut platform = signed_in_platform();
        platform
            .expect_create_profile()
            .returning(|_, _| Ok(profile()));
        platform
            .expect_update_preferences()
            .times(3)
            .returning(|_, _, _| {
                Err(Error::Api {
                    message: "service unavailable".to_string(),
                    status: Some(503),
                })
            });
        platform.expect_update_display_name().never();

        let relayer = MockRelayerApi::new();

        let err = Onboarder::new(&wallet, &platform, &relayer)
            .with_settle_policy(fast_settle())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api { status: Some(503), .. }));
    }

    #[tokio::test]
    async fn test_profile_without_preferences_is_an_error() {
        let wallet = wallet();
        let mut platform = signed_in_platform();
        platform.expect_create_profile().returning(|_, _| {
            Ok(ProfileRecord {
                users: vec![],
                ..profile()
            })
        });
        platform.expect_update_preferences().never();

        let relayer = MockRelayerApi::new();

        let err = Onboarder::new(&wallet, &platform, &relayer)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api { status: None, .. }));
    }

    #[tokio::test]
    async fn test_unconfirmed_transaction_is_reported() {
        let wallet = wallet();
        let mut platform = signed_in_platform();
        platform
            .expect_create_profile()
            .returning(|_, _| Ok(profile()));
        platform
            .expect_update_preferences()
            .returning(|_, _, _| Ok(()));
        platform
            .expect_update_display_name()
            .returning(|_, _, _| Ok(()));

        let mut relayer = MockRelayerApi::new();
        relayer.expect_submit().returning(|_, _| Ok(submitted()));
        relayer
            .expect_transaction_state()
            .times(5)
            .returning(|_, _| Ok(TransactionState::Executed));

        let err = Onboarder::new(&wallet, &platform, &relayer)
            .with_settle_policy(fast_settle())
            .with_poll_policy(fast_poll())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PollExhausted { attempts: 5, .. }));
    }

    #[tokio::test]
    async fn test_deadline_aborts_run() {
        let wallet = wallet();
        let mut platform = signed_in_platform();
        platform
            .expect_create_profile()
            .returning(|_, _| Ok(profile()));
        platform
            .expect_update_preferences()
            .returning(|_, _, _| Ok(()));
        platform
            .expect_update_display_name()
            .returning(|_, _, _| Ok(()));

        let mut relayer = MockRelayerApi::new();
        relayer.expect_submit().returning(|_, _| Ok(submitted()));
        relayer
            .expect_transaction_state()
            .returning(|_, _| Ok(TransactionState::New));

        let slow_poll = PollPolicy {
            max_attempts: 5,
            attempt_delay: Duration::from_secs(30),
            backoff: Duration::from_secs(30),
        };

        let err = Onboarder::new(&wallet, &platform, &relayer)
            .with_settle_policy(fast_settle())
            .with_poll_policy(slow_poll)
            .run_with_deadline(Duration::from_millis(200))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Onboarding timed out after 200ms");
        match err {
            Error::Timeout { deadline } => assert_eq!(deadline, Duration::from_millis(200)),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_settle_policy_from_config() {
        let config = OnboardingConfig::default();
        assert_eq!(SettlePolicy::from(&config), SettlePolicy::default());
    }

    #[tokio::test]
    async fn test_check_chain_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": "0x13882"
            })))
            .mount(&server)
            .await;

        let client = PolygonClient::new(server.uri());
        let err = check_chain_id(&client, &Deployment::polygon())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let amoy = Deployment::custom(
            80002,
            Address::ZERO,
            alloy_primitives::B256::ZERO,
            "Test Factory",
        );
        check_chain_id(&client, &amoy).await.unwrap();
    }
}
