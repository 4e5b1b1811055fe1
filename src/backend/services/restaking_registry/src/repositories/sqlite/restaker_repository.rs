use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::{debug, instrument};

use super::filters::{distinct_addresses, push_page, SqlFilter};
use super::Database;
use crate::models::{Restaker, RestakerFilters, RestakerListing};
use crate::repositories::traits::{RestakerRepository, ValidatorLookup};
use crate::utils::{address, Result};

#[derive(sqlx::FromRow)]
struct RestakerRow {
    user_address: String,
    amount_restaked: f64,
    validator_address: String,
    restaked_at: DateTime<Utc>,
}

impl RestakerRow {
    fn into_restaker(self) -> Restaker {
        Restaker {
            user_address: self.user_address,
            amount_restaked: self.amount_restaked,
            validator_address: self.validator_address,
            restaked_at: self.restaked_at,
            validator: None,
        }
    }
}

pub struct SqliteRestakerRepository {
    db: Database,
    validators: Arc<dyn ValidatorLookup>,
}

impl SqliteRestakerRepository {
    pub fn new(db: Database, validators: Arc<dyn ValidatorLookup>) -> Self {
        Self { db, validators }
    }

    async fn enrich(&self, rows: Vec<RestakerRow>) -> Result<Vec<Restaker>> {
        let addresses = distinct_addresses(rows.iter().map(|r| r.validator_address.as_str()));
        let summaries = self.validators.lookup_many(&addresses).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let validator = summaries.get(&row.validator_address).cloned();
                Restaker {
                    validator,
                    ..row.into_restaker()
                }
            })
            .collect())
    }
}

#[async_trait]
impl RestakerRepository for SqliteRestakerRepository {
    #[instrument(skip(self))]
    async fn list_restakers(&self, filters: &RestakerFilters) -> Result<RestakerListing> {
        let mut totals = QueryBuilder::<Sqlite>::new(
            "SELECT COUNT(*) AS total, SUM(amount_restaked) AS total_staked, \
             COUNT(DISTINCT validator_address) AS unique_validators FROM restakers",
        );
        filters.push_where(&mut totals);

        let row = self
            .db
            .run("restaker_totals", totals.build().fetch_one(self.db.pool()))
            .await?;
        let total: i64 = row.try_get("total")?;
        let total_staked: Option<f64> = row.try_get("total_staked")?;
        let unique_validators: i64 = row.try_get("unique_validators")?;

        let mut page = QueryBuilder::<Sqlite>::new(
            "SELECT user_address, amount_restaked, validator_address, restaked_at FROM restakers",
        );
        filters.push_where(&mut page);
        page.push(" ORDER BY amount_restaked DESC, julianday(restaked_at) DESC, id DESC");
        push_page(&mut page, filters.page);

        let rows = self
            .db
            .run(
                "list_restakers",
                page.build_query_as::<RestakerRow>().fetch_all(self.db.pool()),
            )
            .await?;

        let restakers = self.enrich(rows).await?;

        debug!(total, returned = restakers.len(), "Listed restakers");

        Ok(RestakerListing {
            restakers,
            total,
            total_staked: total_staked.unwrap_or(0.0),
            unique_validators,
        })
    }

    #[instrument(skip(self))]
    async fn get_restaker_by_address(&self, user_address: &str) -> Result<Option<Restaker>> {
        let row = self
            .db
            .run(
                "get_restaker_by_address",
                sqlx::query_as::<_, RestakerRow>(
                    r#"
                    SELECT user_address, amount_restaked, validator_address, restaked_at
                    FROM restakers
                    WHERE LOWER(user_address) = ?
                    ORDER BY amount_restaked DESC, julianday(restaked_at) DESC, id DESC
                    LIMIT 1
                    "#,
                )
                .bind(address::normalize(user_address))
                .fetch_optional(self.db.pool()),
            )
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let validator = self.validators.lookup(&row.validator_address).await?;
        Ok(Some(Restaker {
            validator,
            ..row.into_restaker()
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::TimeZone;

    use super::*;
    use crate::models::{ValidatorStatus, ValidatorSummary};
    use crate::repositories::sqlite::initialize_schema;
    use crate::repositories::traits::MockValidatorLookup;
    use crate::utils::RegistryError;

    const USER: &str = "0xabcdef1234567890abcdef1234567890abcdef12";
    const KNOWN: &str = "0x1111111111111111111111111111111111111111";
    const ORPHAN: &str = "0x9999999999999999999999999999999999999999";

    async fn insert(db: &Database, user: &str, amount: f64, validator: &str) {
        sqlx::query(
            "INSERT INTO restakers (user_address, amount_restaked, validator_address, restaked_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user)
        .bind(amount)
        .bind(validator)
        .bind(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .execute(db.pool())
        .await
        .unwrap();
    }

    fn summary() -> ValidatorSummary {
        ValidatorSummary {
            operator_id: "val_001".into(),
            name: Some("Known".into()),
            total_delegated_stake: 100.0,
            status: ValidatorStatus::Active,
            commission_rate: 0.05,
        }
    }

    #[tokio::test]
    async fn test_orphan_positions_have_no_validator() {
        let db = Database::in_memory().await.unwrap();
        initialize_schema(&db).await.unwrap();
        insert(&db, USER, 10.0, KNOWN).await;
        insert(&db, USER, 5.0, ORPHAN).await;

        let mut lookup = MockValidatorLookup::new();
        lookup
            .expect_lookup_many()
            .times(1)
            .returning(|addresses| {
                assert_eq!(addresses.len(), 2);
                Ok(HashMap::from([(KNOWN.to_string(), summary())]))
            });

        let repo = SqliteRestakerRepository::new(db, Arc::new(lookup));
        let listing = repo.list_restakers(&RestakerFilters::default()).await.unwrap();

        assert_eq!(listing.total, 2);
        assert_eq!(listing.unique_validators, 2);
        assert_eq!(listing.restakers[0].validator, Some(summary()));
        assert_eq!(listing.restakers[1].validator_address, ORPHAN);
        assert!(listing.restakers[1].validator.is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let db = Database::in_memory().await.unwrap();
        initialize_schema(&db).await.unwrap();
        insert(&db, USER, 10.0, KNOWN).await;

        let mut lookup = MockValidatorLookup::new();
        lookup
            .expect_lookup()
            .returning(|_| Err(RegistryError::Decode("bad row".into())));

        let repo = SqliteRestakerRepository::new(db, Arc::new(lookup));
        let err = repo
            .get_restaker_by_address(&USER.to_uppercase().replacen("0X", "0x", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Decode(_)));
    }

    #[tokio::test]
    async fn test_absent_restaker_skips_lookup() {
        let db = Database::in_memory().await.unwrap();
        initialize_schema(&db).await.unwrap();

        let mut lookup = MockValidatorLookup::new();
        lookup.expect_lookup().never();

        let repo = SqliteRestakerRepository::new(db, Arc::new(lookup));
        assert!(repo.get_restaker_by_address(USER).await.unwrap().is_none());
    }
}
