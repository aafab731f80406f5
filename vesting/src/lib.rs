//! Vesting and dividends for the quorum treasury.
//!
//! - [`Lockup`]: locked DAO tokens per beneficiary. Amounts enter either by
//!   an accepted deposit proposal or by a holder locking their own tokens,
//!   and unlock through one of two [`UnlockSource`]s feeding the same
//!   `unlocked` counter of the treasury ledger.
//! - [`DividendPool`]: revenue deposits that holders claim by burning DAO
//!   tokens, priced against the circulating supply at withdrawal time.

pub mod dividend;
pub mod error;
pub mod lockup;
pub mod schedule;

pub use dividend::DividendPool;
pub use error::VestingError;
pub use lockup::Lockup;
pub use schedule::{ReleaseSchedule, Tranches, UnlockSource};
