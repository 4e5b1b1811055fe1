use std::collections::HashMap;

use async_trait::async_trait;
use shared_models::PageRequest;

use crate::models::{
    Restaker, RestakerFilters, RestakerListing, RewardBreakdown, RewardFilters, RewardHistory,
    RewardSummary, SlashEvent, Timeframe, Validator, ValidatorFilters, ValidatorListing,
    ValidatorSummary,
};
use crate::utils::Result;

/// Resolves validator addresses referenced by restaker and reward rows.
///
/// The relationship is by address equality only, so a miss is expected and
/// is reported as `None` / an absent map entry rather than an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ValidatorLookup: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<Option<ValidatorSummary>>;
    async fn lookup_many(&self, addresses: &[String]) -> Result<HashMap<String, ValidatorSummary>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestakerRepository: Send + Sync {
    async fn list_restakers(&self, filters: &RestakerFilters) -> Result<RestakerListing>;
    async fn get_restaker_by_address(&self, address: &str) -> Result<Option<Restaker>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ValidatorRepository: Send + Sync {
    async fn list_validators(&self, filters: &ValidatorFilters) -> Result<ValidatorListing>;
    /// Matches either the operator id or the operator address.
    async fn get_validator_by_id(&self, id: &str) -> Result<Option<Validator>>;
    async fn get_slash_history(&self, operator_id: &str) -> Result<Vec<SlashEvent>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardRepository: Send + Sync {
    /// `None` when no reward falls inside the window.
    async fn get_rewards_summary(
        &self,
        address: &str,
        filters: &RewardFilters,
    ) -> Result<Option<RewardSummary>>;
    async fn get_reward_breakdown(
        &self,
        address: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<RewardBreakdown>>;
    async fn get_reward_history(&self, address: &str, page: PageRequest) -> Result<RewardHistory>;
}
