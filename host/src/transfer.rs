//! Asset transfer primitive.
//!
//! The treasury owns a single custody account per deployment. Native-asset
//! payments arrive as value attached to the call; fungible-token payments are
//! pulled against an allowance the payer granted beforehand. Both paths are
//! selected by the [`AssetId`] and both surface refusals as [`TransferError`].

use crate::error::TransferError;
use quorum_types::{AccountId, AssetId};

pub trait AssetTransfer {
    /// Move `amount` of `asset` from `from` into custody.
    fn receive(&mut self, asset: &AssetId, from: &AccountId, amount: u128)
        -> Result<(), TransferError>;

    /// Pay `amount` of `asset` out of custody to `to`.
    fn send(&mut self, asset: &AssetId, to: &AccountId, amount: u128) -> Result<(), TransferError>;

    /// Move `amount` of `asset` between two accounts the treasury controls.
    fn transfer(
        &mut self,
        asset: &AssetId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TransferError>;

    fn balance_of(&self, asset: &AssetId, who: &AccountId) -> u128;

    /// Balance of `asset` held in custody.
    fn custody_balance(&self, asset: &AssetId) -> u128;
}
