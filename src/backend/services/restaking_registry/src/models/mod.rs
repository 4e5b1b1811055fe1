pub mod restaker;
pub mod reward;
pub mod validator;

pub use restaker::{Restaker, RestakerFilters, RestakerListing};
pub use reward::{
    RewardAggregate, RewardBreakdown, RewardEvent, RewardFilters, RewardHistory, RewardSummary,
    Timeframe, UNKNOWN_VALIDATOR_NAME,
};
pub use validator::{
    SlashEvent, StatusGroup, Validator, ValidatorFilters, ValidatorListing, ValidatorMetadata,
    ValidatorStats, ValidatorStatus, ValidatorSummary,
};
