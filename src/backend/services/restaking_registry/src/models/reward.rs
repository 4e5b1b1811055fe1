use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared_models::Paginated;

pub const UNKNOWN_VALIDATOR_NAME: &str = "Unknown Validator";

/// Lookback window for reward aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
    #[serde(rename = "all")]
    All,
}

impl Timeframe {
    /// Resolves a caller token. Anything unrecognized is treated as `30d`.
    pub fn parse(token: &str) -> Self {
        match token {
            "7d" => Timeframe::Week,
            "30d" => Timeframe::Month,
            "90d" => Timeframe::Quarter,
            "1y" => Timeframe::Year,
            "all" => Timeframe::All,
            _ => Timeframe::Month,
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            Timeframe::Week => 7,
            Timeframe::Month => 30,
            Timeframe::Quarter => 90,
            Timeframe::Year => 365,
            // ten years stands in for "unbounded"
            Timeframe::All => 3650,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Week => "7d",
            Timeframe::Month => "30d",
            Timeframe::Quarter => "90d",
            Timeframe::Year => "1y",
            Timeframe::All => "all",
        }
    }

    /// Earliest `received_at` that falls inside the window ending at `now`.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardFilters {
    pub timeframe: Timeframe,
    pub validator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardSummary {
    pub user_address: String,
    pub total_rewards: f64,
    pub total_transactions: i64,
    pub validators_count: i64,
    pub timeframe: Timeframe,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

/// Raw aggregate over the reward window. Every column is null when no row matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardAggregate {
    pub total_rewards: Option<f64>,
    pub total_transactions: i64,
    pub validators_count: i64,
    pub first_reward: Option<DateTime<Utc>>,
    pub last_reward: Option<DateTime<Utc>>,
}

impl RewardSummary {
    /// `None` means "no data", which is not the same thing as zero rewards.
    pub fn from_aggregate(
        user_address: &str,
        timeframe: Timeframe,
        agg: RewardAggregate,
    ) -> Option<Self> {
        let total_rewards = agg.total_rewards?;
        let (period_start, period_end) = (agg.first_reward?, agg.last_reward?);

        Some(Self {
            user_address: user_address.to_string(),
            total_rewards,
            total_transactions: agg.total_transactions,
            validators_count: agg.validators_count,
            timeframe,
            period_start,
            period_end,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardBreakdown {
    pub validator_address: String,
    pub validator_name: String,
    pub operator_id: Option<String>,
    pub total_rewards: f64,
    pub transaction_count: i64,
    pub average_reward: f64,
    pub first_reward: DateTime<Utc>,
    pub last_reward: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardEvent {
    pub id: String,
    pub amount: f64,
    pub validator_address: String,
    pub validator_name: String,
    pub operator_id: Option<String>,
    pub received_at: DateTime<Utc>,
    pub transaction_hash: Option<String>,
    pub block_number: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardHistory {
    pub rewards: Vec<RewardEvent>,
    pub total: i64,
}

impl Paginated for RewardHistory {
    fn total(&self) -> i64 {
        self.total
    }
}
