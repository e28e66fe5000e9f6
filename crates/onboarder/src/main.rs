//! Account Onboarder
//!
//! Signs a wallet in to Polymarket, provisions its profile and proxy wallet,
//! and waits for the relayer to confirm trading enablement.

use anyhow::Result;
use auth::WalletIdentity;
use onboarder::{check_chain_id, Onboarder, SettlePolicy};
use polymarket_core::api::{GammaClient, PolygonClient, RelayerClient};
use polymarket_core::config::Config;
use polymarket_core::signing::Deployment;
use polymarket_core::Error;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "onboarder=info,polymarket_core=info,auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting account onboarding");

    // Load configuration
    let config = Config::from_env()?;
    let wallet = WalletIdentity::from_private_key(&config.wallet.private_key)?;
    let deployment = Deployment::polygon();

    if let Some(rpc_url) = &config.polygon.rpc_url {
        check_chain_id(&PolygonClient::new(rpc_url.clone()), &deployment).await?;
    }

    let platform = GammaClient::new(Some(config.polymarket.gamma_url.clone()))?;
    let relayer = RelayerClient::new(Some(config.polymarket.relayer_url.clone()))?;

    let onboarder = Onboarder::new(&wallet, &platform, &relayer)
        .with_deployment(deployment)
        .with_settle_policy(SettlePolicy::from(&config.onboarding))
        .with_poll_policy(config.onboarding.poll);

    let report = tokio::select! {
        result = onboarder.run_with_deadline(config.onboarding.timeout) => result?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, abandoning onboarding");
            return Err(Error::Cancelled.into());
        }
    };

    info!(
        address = %report.address,
        proxy_wallet = %report.proxy_wallet,
        profile_id = %report.profile_id,
        display_name = %report.display_name,
        transaction_id = %report.transaction_id,
        attempts = report.poll.attempts,
        "Onboarding complete"
    );

    Ok(())
}
