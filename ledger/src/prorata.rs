//! Pro-rata split.
//!
//! Each participant receives `floor(pool * weight / total_weight)`. The
//! rounding remainder is reported, never redistributed; it stays in the pool
//! until an explicit sweep.

use crate::error::LedgerError;
use quorum_types::mul_div;
use std::collections::BTreeMap;

/// One participant's share of `pool`.
pub fn share(pool: u128, weight: u128, total_weight: u128) -> Result<u128, LedgerError> {
    if total_weight == 0 {
        return Err(LedgerError::ZeroTotalWeight);
    }
    mul_div(pool, weight, total_weight).ok_or(LedgerError::Overflow)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split<K: Ord> {
    pub shares: BTreeMap<K, u128>,
    /// `pool - sum(shares)`.
    pub remainder: u128,
}

/// Split `pool` across `weights`.
pub fn split<K: Ord + Clone>(pool: u128, weights: &BTreeMap<K, u128>) -> Result<Split<K>, LedgerError> {
    let total = weights
        .values()
        .try_fold(0u128, |acc, w| acc.checked_add(*w))
        .ok_or(LedgerError::Overflow)?;
    let mut shares = BTreeMap::new();
    let mut distributed = 0u128;
    for (key, weight) in weights {
        let amount = share(pool, *weight, total)?;
        distributed = distributed.checked_add(amount).ok_or(LedgerError::Overflow)?;
        shares.insert(key.clone(), amount);
    }
    Ok(Split {
        shares,
        remainder: pool - distributed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_weights_split_evenly() {
        let weights: BTreeMap<u8, u128> = (0..5).map(|k| (k, 10)).collect();
        let result = split(100, &weights).unwrap();
        assert!(result.shares.values().all(|s| *s == 20));
        assert_eq!(result.remainder, 0);
    }

    #[test]
    fn floor_leaves_remainder_in_pool() {
        let weights: BTreeMap<u8, u128> = (0..3).map(|k| (k, 1)).collect();
        let result = split(100, &weights).unwrap();
        assert!(result.shares.values().all(|s| *s == 33));
        assert_eq!(result.remainder, 1);
    }

    #[test]
    fn zero_total_weight_is_an_error() {
        let weights: BTreeMap<u8, u128> = BTreeMap::from([(0, 0)]);
        assert!(matches!(split(10, &weights), Err(LedgerError::ZeroTotalWeight)));
        assert!(matches!(share(10, 0, 0), Err(LedgerError::ZeroTotalWeight)));
    }
}
