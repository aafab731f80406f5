//! Composition root for the quorum treasury.
//!
//! [`DaoConfig`] is loaded from TOML; [`Dao::new`] builds the committee and
//! every module from it and takes ownership of the host collaborators.

pub mod config;
pub mod dao;
pub mod error;

pub use config::DaoConfig;
pub use dao::{Dao, Host};
pub use error::DaoError;
