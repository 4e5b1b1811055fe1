use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_models::{PageRequest, Paginated};

use super::validator::ValidatorSummary;

/// One (user, validator) delegation position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaker {
    pub user_address: String,
    pub amount_restaked: f64,
    pub validator_address: String,
    pub restaked_at: DateTime<Utc>,
    /// `None` when the validator address does not resolve.
    pub validator: Option<ValidatorSummary>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestakerFilters {
    pub page: PageRequest,
    /// Inclusive lower bound on `amount_restaked`.
    pub min_amount: Option<f64>,
    /// Exact validator address.
    pub validator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestakerListing {
    pub restakers: Vec<Restaker>,
    pub total: i64,
    pub total_staked: f64,
    pub unique_validators: i64,
}

impl Paginated for RestakerListing {
    fn total(&self) -> i64 {
        self.total
    }
}
