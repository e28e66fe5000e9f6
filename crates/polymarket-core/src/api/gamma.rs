//! Polymarket Gamma API client.
//!
//! Handles the account side of onboarding: nonce issuance, bearer-token
//! login and profile management. Session state travels in cookies, which are
//! read from `Set-Cookie` headers by exact name.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION, COOKIE, SET_COOKIE};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::PlatformApi;
use crate::types::{
    CreateProfileRequest, DisplayNameUpdate, NonceGrant, PreferencesUpdate, ProfileRecord,
    Session, NONCE_COOKIE, SESSION_COOKIE,
};
use crate::{Error, Result};

/// Polymarket Gamma API client.
pub struct GammaClient {
    base_url: Url,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct NonceResponse {
    nonce: String,
}

impl GammaClient {
    /// Default Gamma API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://gamma-api.polymarket.com";

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

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    async fn put_json<T: serde::Serialize + Sync>(
        &self,
        session: &Session,
        path: &str,
        body: &T,
    ) -> Result<()> {
        let response = self
            .http_client
            .put(self.endpoint(path)?)
            .header(COOKIE, session.cookie_header())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                message: format!("PUT /{path} failed: {status} {text}"),
                status: Some(status.as_u16()),
            });
        }

        debug!(path = path, status = %status, "Profile update accepted");
        Ok(())
    }
}

/// Value of the cookie called `name` among the response's `Set-Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
}

#[async_trait]
impl PlatformApi for GammaClient {
    async fn get_nonce(&self) -> Result<NonceGrant> {
        let nonce_fetch = |message: String| Error::NonceFetch { message };

        let response = self
            .http_client
            .get(self.endpoint("nonce")?)
            .send()
            .await
            .map_err(|e| nonce_fetch(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(nonce_fetch(format!("unexpected status {status}")));
        }

        let nonce_cookie = cookie_value(response.headers(), NONCE_COOKIE)
            .ok_or_else(|| nonce_fetch(format!("response did not set {NONCE_COOKIE}")))?;

        let body: NonceResponse = response
            .json()
            .await
            .map_err(|e| nonce_fetch(format!("malformed body: {e}")))?;

        debug!(nonce_len = body.nonce.len(), "Nonce issued");
        Ok(NonceGrant::new(body.nonce, nonce_cookie))
    }

    async fn login(&self, grant: &NonceGrant, bearer_token: &str) -> Result<Session> {
        let response = self
            .http_client
            .get(self.endpoint("login")?)
            .header(AUTHORIZATION, format!("Bearer {bearer_token}"))
            .header(COOKIE, format!("{NONCE_COOKIE}={}", grant.nonce_cookie))
            .send()
            .await
            .map_err(|e| Error::Login {
                message: format!("request failed: {e}"),
                status: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Login {
                message: format!("unexpected status {status}"),
                status: Some(status.as_u16()),
            });
        }

        let session_cookie =
            cookie_value(response.headers(), SESSION_COOKIE).ok_or_else(|| Error::Login {
                message: format!("response did not set {SESSION_COOKIE}"),
                status: Some(status.as_u16()),
            })?;

        info!("Logged in");
        Ok(Session::new(grant.nonce_cookie.clone(), session_cookie))
    }

    async fn create_profile(
        &self,
        session: &Session,
        request: &CreateProfileRequest,
    ) -> Result<ProfileRecord> {
        let response = self
            .http_client
            .post(self.endpoint("profiles")?)
            .header(COOKIE, session.cookie_header())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                message: format!("profile creation failed: {status} {text}"),
                status: Some(status.as_u16()),
            });
        }

        let profile: ProfileRecord = response.json().await?;
        info!(profile_id = %profile.id, "Profile created");
        Ok(profile)
    }

    async fn update_preferences(
        &self,
        session: &Session,
        preference_id: &str,
        update: &PreferencesUpdate,
    ) -> Result<()> {
        self.put_json(session, &format!("preferences/{preference_id}"), update)
            .await
    }

    async fn update_display_name(
        &self,
        session: &Session,
        profile_id: &str,
        update: &DisplayNameUpdate,
    ) -> Result<()> {
        self.put_json(session, &format!("profiles/{profile_id}"), update)
            .await
    }
}
