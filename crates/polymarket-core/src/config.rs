//! Configuration management for the onboarding tool.

use crate::confirmation::PollPolicy;
use crate::{Error, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GAMMA_URL: &str = "https://gamma-api.polymarket.com";
pub const DEFAULT_RELAYER_URL: &str = "https://relayer-v2.polymarket.com";

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    pub wallet: WalletConfig,
    pub polymarket: PolymarketConfig,
    pub polygon: PolygonConfig,
    pub onboarding: OnboardingConfig,
}

#[derive(Clone)]
pub struct WalletConfig {
    pub private_key: String,
}

impl std::fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletConfig")
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct PolymarketConfig {
    pub gamma_url: String,
    pub relayer_url: String,
}

#[derive(Debug, Clone)]
pub struct PolygonConfig {
    pub rpc_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    pub poll: PollPolicy,
    pub settle_attempts: u32,
    pub settle_interval: Duration,
    pub timeout: Duration,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            poll: PollPolicy::default(),
            settle_attempts: 3,
            settle_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(300),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("wallet", &self.wallet)
            .field("polymarket", &self.polymarket)
            .field("polygon", &self.polygon)
            .field("onboarding", &self.onboarding)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = OnboardingConfig::default();
        let parsed = |name: &str| lookup(name).and_then(|s| s.trim().parse::<u64>().ok());

        let private_key = lookup("WALLET_PRIVATE_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::config("WALLET_PRIVATE_KEY environment variable not set"))?;

        Ok(Self {
            wallet: WalletConfig { private_key },
            polymarket: PolymarketConfig {
                gamma_url: lookup("POLYMARKET_GAMMA_URL")
                    .unwrap_or_else(|| DEFAULT_GAMMA_URL.to_string()),
                relayer_url: lookup("POLYMARKET_RELAYER_URL")
                    .unwrap_or_else(|| DEFAULT_RELAYER_URL.to_string()),
            },
            polygon: PolygonConfig {
                rpc_url: lookup("POLYGON_RPC_URL").filter(|url| !url.trim().is_empty()),
            },
            onboarding: OnboardingConfig {
                poll: PollPolicy {
                    max_attempts: parse_or(
                        &lookup,
                        "RELAYER_POLL_ATTEMPTS",
                        defaults.poll.max_attempts,
                    ),
                    attempt_delay: parsed("RELAYER_POLL_DELAY_MS")
                        .map(Duration::from_millis)
                        .unwrap_or(defaults.poll.attempt_delay),
                    backoff: parsed("RELAYER_POLL_BACKOFF_MS")
                        .map(Duration::from_millis)
                        .unwrap_or(defaults.poll.backoff),
                },
                settle_attempts: parse_or(&lookup, "SETTLE_ATTEMPTS", defaults.settle_attempts),
                settle_interval: parsed("SETTLE_INTERVAL_MS")
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.settle_interval),
                timeout: parsed("ONBOARDING_TIMEOUT_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
            },
        })
    }

    /// Load configuration for testing (with defaults).
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            wallet: WalletConfig {
                private_key: "0000000000000000000000000000000000000000000000000000000000000001"
                    .to_string(),
            },
            polymarket: PolymarketConfig {
                gamma_url: "http://127.0.0.1:9000".to_string(),
                relayer_url: "http://127.0.0.1:9001".to_string(),
            },
            polygon: PolygonConfig { rpc_url: None },
            onboarding: OnboardingConfig::default(),
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(name)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
