//! Account Onboarding
//!
//! Orchestrates sign-in, profile setup and trading enablement for a new
//! Polymarket account.

pub mod flow;
pub mod names;

pub use flow::{check_chain_id, Onboarder, OnboardingReport, SettlePolicy};
pub use names::generate_display_name;
