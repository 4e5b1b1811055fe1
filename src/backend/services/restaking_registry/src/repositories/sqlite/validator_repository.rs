use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::{debug, instrument};

use super::filters::{push_page, SqlFilter};
use super::Database;
use crate::models::{
    SlashEvent, StatusGroup, Validator, ValidatorFilters, ValidatorListing, ValidatorMetadata,
    ValidatorStats, ValidatorStatus, ValidatorSummary,
};
use crate::repositories::traits::{ValidatorLookup, ValidatorRepository};
use crate::utils::{RegistryError, Result};

const VALIDATOR_COLUMNS: &str = "operator_id, operator_address, total_delegated_stake, status, \
     commission_rate, name, description, logo, website, created_at";

const SUMMARY_COLUMNS: &str =
    "operator_id, operator_address, name, total_delegated_stake, status, commission_rate";

#[derive(sqlx::FromRow)]
struct ValidatorRow {
    operator_id: String,
    operator_address: String,
    total_delegated_stake: Option<f64>,
    status: Option<String>,
    commission_rate: Option<f64>,
    name: Option<String>,
    description: Option<String>,
    logo: Option<String>,
    website: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ValidatorRow> for Validator {
    type Error = RegistryError;

    fn try_from(r: ValidatorRow) -> Result<Self> {
        Ok(Validator {
            status: parse_status(r.status.as_deref(), &r.operator_id)?,
            operator_id: r.operator_id,
            operator_address: r.operator_address,
            total_delegated_stake: r.total_delegated_stake.unwrap_or(0.0),
            commission_rate: r.commission_rate.unwrap_or(0.0),
            created_at: r.created_at,
            metadata: ValidatorMetadata {
                name: r.name,
                description: r.description,
                logo: r.logo,
                website: r.website,
            },
        })
    }
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    operator_id: String,
    operator_address: String,
    name: Option<String>,
    total_delegated_stake: Option<f64>,
    status: Option<String>,
    commission_rate: Option<f64>,
}

impl SummaryRow {
    fn into_summary(self) -> Result<(String, ValidatorSummary)> {
        let status = parse_status(self.status.as_deref(), &self.operator_id)?;
        Ok((
            self.operator_address,
            ValidatorSummary {
                operator_id: self.operator_id,
                name: self.name,
                total_delegated_stake: self.total_delegated_stake.unwrap_or(0.0),
                status,
                commission_rate: self.commission_rate.unwrap_or(0.0),
            },
        ))
    }
}

/// A missing status takes the column default.
fn parse_status(raw: Option<&str>, operator_id: &str) -> Result<ValidatorStatus> {
    match raw {
        None => Ok(ValidatorStatus::Active),
        Some(s) => s.parse().map_err(|_| {
            RegistryError::Decode(format!("validator {operator_id} has unknown status `{s}`"))
        }),
    }
}

pub struct SqliteValidatorRepository {
    db: Database,
}

impl SqliteValidatorRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn status_groups(&self, filters: &ValidatorFilters) -> Result<Vec<StatusGroup>> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT status, COUNT(*) AS count, SUM(total_delegated_stake) AS stake FROM validators",
        );
        filters.push_where(&mut qb);
        qb.push(" GROUP BY status");

        let rows = self
            .db
            .run("validator_status_groups", qb.build().fetch_all(self.db.pool()))
            .await?;

        rows.iter()
            .map(|row| {
                let status: Option<String> = row.try_get("status")?;
                Ok(StatusGroup {
                    status: parse_status(status.as_deref(), "<aggregate>")?,
                    count: row.try_get("count")?,
                    stake: row.try_get("stake")?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl ValidatorRepository for SqliteValidatorRepository {
    #[instrument(skip(self))]
    async fn list_validators(&self, filters: &ValidatorFilters) -> Result<ValidatorListing> {
        let stats = ValidatorStats::from_groups(&self.status_groups(filters).await?);

        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {VALIDATOR_COLUMNS} FROM validators"));
        filters.push_where(&mut qb);
        qb.push(" ORDER BY total_delegated_stake DESC, julianday(created_at) DESC, id DESC");
        push_page(&mut qb, filters.page);

        let rows = self
            .db
            .run(
                "list_validators",
                qb.build_query_as::<ValidatorRow>().fetch_all(self.db.pool()),
            )
            .await?;

        let validators = rows
            .into_iter()
            .map(Validator::try_from)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            total = stats.total,
            returned = validators.len(),
            "Listed validators"
        );

        Ok(ValidatorListing {
            validators,
            total: stats.total,
            total_delegated_stake: stats.total_delegated_stake,
            status_breakdown: stats.status_breakdown,
        })
    }

    #[instrument(skip(self))]
    async fn get_validator_by_id(&self, id: &str) -> Result<Option<Validator>> {
        // An operator id match wins over an address match on another row.
        let sql = format!(
            "SELECT {VALIDATOR_COLUMNS} FROM validators \
             WHERE operator_id = ? OR operator_address = ? \
             ORDER BY CASE WHEN operator_id = ? THEN 0 ELSE 1 END \
             LIMIT 1"
        );

        let row = self
            .db
            .run(
                "get_validator_by_id",
                sqlx::query_as::<_, ValidatorRow>(&sql)
                    .bind(id)
                    .bind(id)
                    .bind(id)
                    .fetch_optional(self.db.pool()),
            )
            .await?;

        row.map(Validator::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn get_slash_history(&self, operator_id: &str) -> Result<Vec<SlashEvent>> {
        let records = self
            .db
            .run(
                "get_slash_history",
                sqlx::query(
                    r#"
                    SELECT id, validator_operator_id, slashed_at, amount_slashed, reason,
                           block_number, transaction_hash
                    FROM slash_events
                    WHERE validator_operator_id = ?
                    ORDER BY julianday(slashed_at) DESC, id DESC
                    "#,
                )
                .bind(operator_id)
                .fetch_all(self.db.pool()),
            )
            .await?;

        let mut events = Vec::with_capacity(records.len());
        for r in records {
            events.push(SlashEvent {
                id: r.try_get("id")?,
                validator_operator_id: r.try_get("validator_operator_id")?,
                slashed_at: r.try_get("slashed_at")?,
                amount_slashed: r.try_get("amount_slashed")?,
                reason: r.try_get("reason")?,
                block_number: r.try_get("block_number")?,
                transaction_hash: r.try_get("transaction_hash")?,
            });
        }

        Ok(events)
    }
}

#[async_trait]
impl ValidatorLookup for SqliteValidatorRepository {
    async fn lookup(&self, address: &str) -> Result<Option<ValidatorSummary>> {
        let sql = format!("SELECT {SUMMARY_COLUMNS} FROM validators WHERE operator_address = ?");
        let row = self
            .db
            .run(
                "lookup_validator",
                sqlx::query_as::<_, SummaryRow>(&sql)
                    .bind(address)
                    .fetch_optional(self.db.pool()),
            )
            .await?;

        Ok(row.map(SummaryRow::into_summary).transpose()?.map(|(_, s)| s))
    }

    async fn lookup_many(&self, addresses: &[String]) -> Result<HashMap<String, ValidatorSummary>> {
        if addresses.is_empty() {
            return Ok(HashMap::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {SUMMARY_COLUMNS} FROM validators WHERE operator_address IN ("
        ));
        let mut separated = qb.separated(", ");
        for address in addresses {
            separated.push_bind(address.clone());
        }
        separated.push_unseparated(")");

        let rows = self
            .db
            .run(
                "lookup_validators",
                qb.build_query_as::<SummaryRow>().fetch_all(self.db.pool()),
            )
            .await?;

        rows.into_iter().map(SummaryRow::into_summary).collect()
    }
}
