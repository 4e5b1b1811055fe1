pub mod address;
pub mod errors;

pub use errors::{RegistryError, Result};
