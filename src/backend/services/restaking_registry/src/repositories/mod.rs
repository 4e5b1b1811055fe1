pub mod sqlite;
pub mod traits;

pub use traits::{RestakerRepository, RewardRepository, ValidatorLookup, ValidatorRepository};
