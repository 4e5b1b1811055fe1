//! Read-only registry of restaking positions, validators and rewards.
//!
//! The crate is split the usual way: [`models`] holds the records served to
//! callers, [`repositories`] the storage traits and their SQLite
//! implementations, [`api`] the actix-web surface on top of them.

pub mod api;
pub mod config;
pub mod models;
pub mod repositories;
pub mod utils;

pub use config::AppConfig;
pub use utils::{RegistryError, Result};
