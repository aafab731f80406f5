//! Treasury wallet.
//!
//! Funds swept from campaigns and sales land in the treasury account. Moving
//! them out again takes an accepted committee proposal that binds the asset,
//! the recipient, and the amount.

pub mod error;
pub mod treasury;

pub use error::WalletError;
pub use treasury::TreasuryWallet;
