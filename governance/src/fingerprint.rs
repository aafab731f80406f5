//! Proposal fingerprints.
//!
//! `Blake2b-256(bincode(params))`. The engine verifies payloads by structural
//! equality; the digest is what observers and off-chain indexers key on.

use crate::error::GovernanceError;
use crate::params::ProposalParams;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

type Blake2b256 = Blake2b<U32>;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(params: &ProposalParams) -> Result<Self, GovernanceError> {
        let encoded =
            bincode::serialize(params).map_err(|e| GovernanceError::Encoding(e.to_string()))?;
        let mut hasher = Blake2b256::new();
        hasher.update(&encoded);
        let mut output = [0u8; 32];
        output.copy_from_slice(&hasher.finalize());
        Ok(Self(output))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
