//! Treasury ledger primitives.
//!
//! - [`TreasuryLedger`]: per-(entity, beneficiary) `assigned / unlocked /
//!   claimed` accounting with `claimed <= unlocked <= assigned` held after
//!   every operation.
//! - [`SettlementLedger`]: one-shot payout flags keyed by
//!   `(entity, beneficiary, kind)`, the single place the at-most-once
//!   guarantee is enforced.
//! - [`prorata`]: floor-rounded proportional split with an explicit,
//!   never-redistributed remainder.
//!
//! Both ledgers record their mutation before the caller-supplied transfer
//! runs and roll it back if the transfer fails.

pub mod book;
pub mod entry;
pub mod error;
pub mod prorata;
pub mod settlement;

pub use book::TreasuryLedger;
pub use entry::LedgerEntry;
pub use error::LedgerError;
pub use prorata::{share, split, Split};
pub use settlement::{SettlementLedger, SettlementRecord};
