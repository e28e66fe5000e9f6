//! Core domain types for Polymarket account onboarding.

pub mod profile;
pub mod relayer;
pub mod session;

pub use profile::*;
pub use relayer::*;
pub use session::*;
