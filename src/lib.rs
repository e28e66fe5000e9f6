//! Poly-Onboard: Polymarket account onboarding
//!
//! This is the root crate that provides benchmark and integration-test access
//! to the internal crates. For actual functionality, use the individual
//! crates directly:
//!
//! - `polymarket-core`: Signing primitives, API clients, confirmation poller
//! - `auth`: Wallet identity, sign-in challenge, bearer token handshake
//! - `onboarder`: Onboarding flow and the `onboarder` binary

// Re-export for benchmarks
pub use auth;
pub use onboarder;
pub use polymarket_core;
