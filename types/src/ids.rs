//! Monotonic identifiers for proposals and module-owned entities.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// The first identifier handed out by a fresh registry.
            pub const FIRST: Self = Self(1);

            pub fn new(value: u64) -> Self {
                Self(value)
            }

            pub fn value(&self) -> u64 {
                self.0
            }

            /// The identifier following this one, or `None` on exhaustion.
            pub fn next(self) -> Option<Self> {
                self.0.checked_add(1).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a proposal held by the proposal engine.
    ProposalId,
    "proposal"
);
define_id!(
    /// Identifier of a fundraising campaign.
    CampaignId,
    "campaign"
);
define_id!(
    /// Identifier of a two-phase whitelist sale.
    SaleId,
    "sale"
);
define_id!(
    /// Identifier of a marketing activity.
    ActivityId,
    "activity"
);
define_id!(
    /// Identifier of a development project.
    ProjectId,
    "project"
);
