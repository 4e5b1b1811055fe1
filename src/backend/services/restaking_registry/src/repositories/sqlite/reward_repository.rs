use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_models::PageRequest;
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::{debug, instrument};

use super::filters::{distinct_addresses, push_page, RewardScope, SqlFilter, RECEIVED_RANGE};
use super::Database;
use crate::models::{
    RewardAggregate, RewardBreakdown, RewardEvent, RewardFilters, RewardHistory, RewardSummary,
    Timeframe, ValidatorSummary, UNKNOWN_VALIDATOR_NAME,
};
use crate::repositories::traits::{RewardRepository, ValidatorLookup};
use crate::utils::{address, Result};

/// Source of "now" for reward windows.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(sqlx::FromRow)]
struct BreakdownRow {
    validator_address: String,
    total_rewards: f64,
    transaction_count: i64,
    average_reward: f64,
    first_reward: DateTime<Utc>,
    last_reward: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct RewardRow {
    id: String,
    amount: f64,
    validator_address: String,
    received_at: DateTime<Utc>,
    transaction_hash: Option<String>,
    block_number: Option<i64>,
}

fn display_name(summary: Option<&ValidatorSummary>) -> String {
    summary
        .and_then(|s| s.name.clone())
        .unwrap_or_else(|| UNKNOWN_VALIDATOR_NAME.to_string())
}

pub struct SqliteRewardRepository {
    db: Database,
    validators: Arc<dyn ValidatorLookup>,
    clock: Clock,
}

impl SqliteRewardRepository {
    pub fn new(db: Database, validators: Arc<dyn ValidatorLookup>) -> Self {
        Self {
            db,
            validators,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn scope(&self, user_address: &str, timeframe: Timeframe, validator: Option<String>) -> RewardScope {
        RewardScope {
            user_address: address::normalize(user_address),
            since: Some(timeframe.window_start((self.clock)())),
            validator,
        }
    }
}

#[async_trait]
impl RewardRepository for SqliteRewardRepository {
    #[instrument(skip(self))]
    async fn get_rewards_summary(
        &self,
        user_address: &str,
        filters: &RewardFilters,
    ) -> Result<Option<RewardSummary>> {
        let scope = self.scope(user_address, filters.timeframe, filters.validator.clone());

        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT SUM(amount) AS total_rewards, COUNT(*) AS total_transactions, \
             COUNT(DISTINCT validator_address) AS validators_count, \
             {RECEIVED_RANGE} FROM rewards"
        ));
        scope.push_where(&mut qb);

        let row = self
            .db
            .run("rewards_summary", qb.build().fetch_one(self.db.pool()))
            .await?;

        let aggregate = RewardAggregate {
            total_rewards: row.try_get("total_rewards")?,
            total_transactions: row.try_get("total_transactions")?,
            validators_count: row.try_get("validators_count")?,
            first_reward: row.try_get("first_reward")?,
            last_reward: row.try_get("last_reward")?,
        };

        let summary = RewardSummary::from_aggregate(&scope.user_address, filters.timeframe, aggregate);
        debug!(found = summary.is_some(), "Computed reward summary");
        Ok(summary)
    }

    #[instrument(skip(self))]
    async fn get_reward_breakdown(
        &self,
        user_address: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<RewardBreakdown>> {
        let scope = self.scope(user_address, timeframe, None);

        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT validator_address, SUM(amount) AS total_rewards, COUNT(*) AS transaction_count, \
             AVG(amount) AS average_reward, {RECEIVED_RANGE} FROM rewards"
        ));
        scope.push_where(&mut qb);
        qb.push(" GROUP BY validator_address ORDER BY total_rewards DESC, validator_address ASC");

        let rows = self
            .db
            .run(
                "reward_breakdown",
                qb.build_query_as::<BreakdownRow>().fetch_all(self.db.pool()),
            )
            .await?;

        let addresses = distinct_addresses(rows.iter().map(|r| r.validator_address.as_str()));
        let summaries = self.validators.lookup_many(&addresses).await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let summary = summaries.get(&r.validator_address);
                RewardBreakdown {
                    validator_name: display_name(summary),
                    operator_id: summary.map(|s| s.operator_id.clone()),
                    validator_address: r.validator_address,
                    total_rewards: r.total_rewards,
                    transaction_count: r.transaction_count,
                    average_reward: r.average_reward,
                    first_reward: r.first_reward,
                    last_reward: r.last_reward,
                }
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_reward_history(&self, user_address: &str, page: PageRequest) -> Result<RewardHistory> {
        let scope = RewardScope {
            user_address: address::normalize(user_address),
            since: None,
            validator: None,
        };

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM rewards");
        scope.push_where(&mut count);
        let total: i64 = self
            .db
            .run(
                "reward_history_count",
                count.build_query_scalar::<i64>().fetch_one(self.db.pool()),
            )
            .await?;

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT id, amount, validator_address, received_at, transaction_hash, block_number \
             FROM rewards",
        );
        scope.push_where(&mut qb);
        qb.push(" ORDER BY julianday(received_at) DESC, id DESC");
        push_page(&mut qb, page);

        let rows = self
            .db
            .run(
                "reward_history",
                qb.build_query_as::<RewardRow>().fetch_all(self.db.pool()),
            )
            .await?;

        let addresses = distinct_addresses(rows.iter().map(|r| r.validator_address.as_str()));
        let summaries = self.validators.lookup_many(&addresses).await?;

        let rewards = rows
            .into_iter()
            .map(|r| {
                let summary = summaries.get(&r.validator_address);
                RewardEvent {
                    validator_name: display_name(summary),
                    operator_id: summary.map(|s| s.operator_id.clone()),
                    id: r.id,
                    amount: r.amount,
                    validator_address: r.validator_address,
                    received_at: r.received_at,
                    transaction_hash: r.transaction_hash,
                    block_number: r.block_number,
                }
            })
            .collect::<Vec<_>>();

        debug!(total, returned = rewards.len(), "Loaded reward history");

        Ok(RewardHistory { rewards, total })
    }
}
