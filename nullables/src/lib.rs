//! Nullable infrastructure for deterministic testing.
//!
//! Every host collaborator (clock, asset transfer, governance token, event
//! log) is abstracted behind a trait in `quorum-host`. This crate provides
//! in-memory implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod bank;
pub mod clock;
pub mod event_log;
pub mod token;

pub use bank::NullBank;
pub use clock::NullClock;
pub use event_log::NullEventLog;
pub use token::NullToken;
