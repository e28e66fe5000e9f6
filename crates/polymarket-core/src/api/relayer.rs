//! Polymarket relayer client.

use async_trait::async_trait;
use reqwest::header::COOKIE;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::RelayerApi;
use crate::types::{RelayerTransaction, Session, SubmitRequest, SubmitResponse, TransactionState};
use crate::{Error, Result};

/// Client for the gasless transaction relayer.
pub struct RelayerClient {
    base_url: Url,
    http_client: reqwest::Client,
}

impl RelayerClient {
    /// Default relayer base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://relayer-v2.polymarket.com";

    pub fn new(base_url: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let base_url = base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());

        Ok(Self {
            base_url: Url::parse(&base_url)?,
            http_client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// All records the relayer holds for a transaction id.
    pub async fn get_transaction(
        &self,
        session: &Session,
        transaction_id: &str,
    ) -> Result<Vec<RelayerTransaction>> {
        let mut url = self.endpoint("transaction")?;
        url.query_pairs_mut().append_pair("id", transaction_id);

        let response = self
            .http_client
            .get(url)
            .header(COOKIE, session.cookie_header())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                message: format!("transaction lookup failed: {status}"),
                status: Some(status.as_u16()),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl RelayerApi for RelayerClient {
    async fn submit(&self, session: &Session, request: &SubmitRequest) -> Result<SubmitResponse> {
        let response = self
            .http_client
            .post(self.endpoint("submit")?)
            .header(COOKIE, session.cookie_header())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                message: format!("relayer submission failed: {status} {text}"),
                status: Some(status.as_u16()),
            });
        }

        let submitted: SubmitResponse = response.json().await?;
        info!(
            transaction_id = %submitted.transaction_id,
            state = %submitted.state,
            kind = %request.kind,
            "Submitted to relayer"
        );
        Ok(submitted)
    }

    async fn transaction_state(
        &self,
        session: &Session,
        transaction_id: &str,
    ) -> Result<TransactionState> {
        let records = self.get_transaction(session, transaction_id).await?;
        debug!(
            transaction_id = %transaction_id,
            records = records.len(),
            "Relayer transaction lookup"
        );

        records
            .into_iter()
            .next()
            .map(|record| record.state)
            .ok_or_else(|| Error::Api {
                message: format!("relayer has no record of transaction {transaction_id}"),
                status: None,
            })
    }
}
