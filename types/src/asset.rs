//! Asset identifiers for native and fungible-token transfers.

use crate::account::AccountId;
use crate::error::ParseAssetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which asset a transfer moves.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssetId {
    /// The host environment's native asset.
    Native,
    /// An external fungible token, identified by its contract account.
    Token(AccountId),
}

impl AssetId {
    /// The zero-address sentinel external tooling uses for the native asset.
    pub const NATIVE_SENTINEL: &'static str = "0x0000000000000000000000000000000000000000";

    pub fn token(id: impl Into<String>) -> Self {
        Self::Token(AccountId::new(id))
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }
}

impl FromStr for AssetId {
    type Err = ParseAssetError;

    /// Parse an externally supplied identifier.
    ///
    /// `native`, the empty string, and any all-zero hex address map to
    /// [`AssetId::Native`].
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("native") {
            return Ok(Self::Native);
        }
        if let Some(hex) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ParseAssetError(raw.to_string()));
            }
            if hex.chars().all(|c| c == '0') {
                return Ok(Self::Native);
            }
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ParseAssetError(raw.to_string()));
        }
        Ok(Self::token(trimmed))
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Token(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_address_is_native() {
        assert_eq!(AssetId::from_str(AssetId::NATIVE_SENTINEL).unwrap(), AssetId::Native);
        assert_eq!(AssetId::from_str("0x0").unwrap(), AssetId::Native);
        assert_eq!(AssetId::from_str("").unwrap(), AssetId::Native);
    }

    #[test]
    fn nonzero_address_is_token() {
        let asset = AssetId::from_str("0x00000000000000000000000000000000000000a1").unwrap();
        assert_eq!(asset, AssetId::token("0x00000000000000000000000000000000000000a1"));
        assert!(!asset.is_native());
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(AssetId::from_str("0xzz").is_err());
        assert!(AssetId::from_str("usd coin").is_err());
    }
}
