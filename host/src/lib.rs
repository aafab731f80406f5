//! Abstract host-environment traits for the quorum treasury.
//!
//! The host serializes every operation, attests caller identity, keeps the
//! clock, and settles asset movements. Modules depend only on these traits;
//! deterministic in-memory implementations live in `quorum-nullables`.

pub mod clock;
pub mod error;
pub mod event;
pub mod sink;
pub mod token;
pub mod transfer;

pub use clock::{Clock, SystemClock};
pub use error::{SinkError, TransferError};
pub use event::Event;
pub use sink::{EventSink, JsonLinesSink};
pub use token::{ClassBalances, GovernanceToken, WeightSource};
pub use transfer::AssetTransfer;
