//! Error types for the Polymarket onboarding system.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("API error: {message}")]
    Api { message: String, status: Option<u16> },

    #[error("Invalid private key: {message}")]
    InvalidKey { message: String },

    #[error("Nonce fetch failed: {message}")]
    NonceFetch { message: String },

    #[error("Login failed: {message}")]
    Login { message: String, status: Option<u16> },

    #[error("Typed data parse error: {message}")]
    TypedDataParse { message: String },

    #[error("Signing error: {message}")]
    Signing { message: String },

    #[error("Proxy address derivation failed: {message}")]
    ProxyDerivation { message: String },

    #[error("Transaction {transaction_id} not mined after {attempts} attempts")]
    PollExhausted {
        transaction_id: String,
        attempts: u32,
    },

    #[error("Onboarding timed out after {deadline:?}")]
    Timeout { deadline: Duration },

    #[error("Onboarding cancelled")]
    Cancelled,
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    pub fn typed_data(message: impl Into<String>) -> Self {
        Error::TypedDataParse {
            message: message.into(),
        }
    }

    /// Transport-level failures that may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::Timeout { .. } => true,
            Error::Api {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
