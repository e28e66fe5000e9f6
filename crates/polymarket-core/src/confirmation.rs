//! Relayer transaction confirmation polling.
//!
//! A submitted proxy deployment is only useful once the relayer reports it as
//! mined. The poller queries the relayer a bounded number of times, treating
//! every failed or non-mined attempt as non-terminal.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::RelayerApi;
use crate::types::{Session, TransactionState};
use crate::{Error, Result};

/// Polling bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    /// Wait before each query.
    pub attempt_delay: Duration,
    /// Extra wait after a query that did not report mined.
    pub backoff: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            attempt_delay: Duration::from_secs(2),
            backoff: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Pending,
    Mined,
    Exhausted,
}

/// Outcome of a polling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub transaction_id: String,
    pub state: PollState,
    pub attempts: u32,
    /// Last state the relayer reported, if any query succeeded.
    pub last_state: Option<TransactionState>,
}

impl PollReport {
    pub fn is_mined(&self) -> bool {
        self.state == PollState::Mined
    }

    /// Treat an exhausted run as an error.
    pub fn into_result(self) -> Result<Self> {
        match self.state {
            PollState::Mined => Ok(self),
            _ => Err(Error::PollExhausted {
                transaction_id: self.transaction_id,
                attempts: self.attempts,
            }),
        }
    }
}

/// Polls the relayer until a transaction is mined or attempts run out.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationPoller {
    policy: PollPolicy,
}

impl ConfirmationPoller {
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    pub async fn poll(
        &self,
        relayer: &dyn RelayerApi,
        session: &Session,
        transaction_id: &str,
    ) -> PollReport {
        let mut report = PollReport {
            transaction_id: transaction_id.to_string(),
            state: PollState::Pending,
            attempts: 0,
            last_state: None,
        };

        while report.attempts < self.policy.max_attempts {
            report.attempts += 1;
            tokio::time::sleep(self.policy.attempt_delay).await;

            match relayer.transaction_state(session, transaction_id).await {
                Ok(state) if state.is_mined() => {
                    info!(
                        transaction_id = %transaction_id,
                        attempt = report.attempts,
                        "Transaction mined"
                    );
                    report.last_state = Some(state);
                    report.state = PollState::Mined;
                    return report;
                }
                Ok(state) => {
                    debug!(
                        transaction_id = %transaction_id,
                        attempt = report.attempts,
                        state = %state,
                        "Transaction not mined yet"
                    );
                    report.last_state = Some(state);
                }
                Err(e) => {
                    warn!(
                        transaction_id = %transaction_id,
                        attempt = report.attempts,
                        max_attempts = self.policy.max_attempts,
                        retryable = e.is_retryable(),
                        error = %e,
                        "Transaction status query failed"
                    );
                    continue;
                }
            }

            if report.attempts < self.policy.max_attempts {
                tokio::time::sleep(self.policy.backoff).await;
            }
        }

        warn!(
            transaction_id = %transaction_id,
            attempts = report.attempts,
            "Transaction not mined within polling bounds"
        );
        report.state = PollState::Exhausted;
        report
    }
}
