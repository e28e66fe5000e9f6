//! Polymarket Core Library
//!
//! Shared types, signing primitives, API clients and the relayer confirmation
//! poller for Polymarket account onboarding.

pub mod api;
pub mod config;
pub mod confirmation;
pub mod error;
pub mod signing;
pub mod types;

pub use config::Config;
pub use confirmation::{ConfirmationPoller, PollPolicy, PollReport, PollState};
pub use error::{Error, Result};
