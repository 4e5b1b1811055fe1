pub mod error;
pub mod params;
pub mod response;
pub mod routes;

pub use error::ApiError;
pub use routes::api_routes;

use std::sync::Arc;

use crate::repositories::sqlite::{
    Database, SqliteRestakerRepository, SqliteRewardRepository, SqliteValidatorRepository,
};
use crate::repositories::{RestakerRepository, RewardRepository, ValidatorRepository};

/// Repositories shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub restakers: Arc<dyn RestakerRepository>,
    pub validators: Arc<dyn ValidatorRepository>,
    pub rewards: Arc<dyn RewardRepository>,
}

impl AppState {
    pub fn new(
        restakers: Arc<dyn RestakerRepository>,
        validators: Arc<dyn ValidatorRepository>,
        rewards: Arc<dyn RewardRepository>,
    ) -> Self {
        Self {
            restakers,
            validators,
            rewards,
        }
    }

    /// Wires the SQLite repositories over one database handle. The validator
    /// repository doubles as the lookup used for enrichment.
    pub fn from_database(db: Database) -> Self {
        let validators = Arc::new(SqliteValidatorRepository::new(db.clone()));

        Self {
            restakers: Arc::new(SqliteRestakerRepository::new(db.clone(), validators.clone())),
            rewards: Arc::new(SqliteRewardRepository::new(db, validators.clone())),
            validators,
        }
    }
}
