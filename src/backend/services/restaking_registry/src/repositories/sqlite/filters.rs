//! Filter composition and pagination shared by the SQLite repositories.
//!
//! Every listing issues two statements over the same predicate: one for the
//! aggregates, one for the ordered page. Both are built from the same
//! [`SqlFilter`] so totals always describe exactly the rows being paged.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use shared_models::PageRequest;
use sqlx::{QueryBuilder, Sqlite};

use crate::models::{RestakerFilters, ValidatorFilters};

pub(crate) trait SqlFilter {
    /// Appends ` WHERE ...` with every active predicate joined by `AND`.
    fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>);
}

pub(crate) fn push_page(qb: &mut QueryBuilder<'_, Sqlite>, page: PageRequest) {
    qb.push(" LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);
}

impl SqlFilter for RestakerFilters {
    fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE 1=1");
        if let Some(min_amount) = self.min_amount {
            qb.push(" AND amount_restaked >= ").push_bind(min_amount);
        }
        if let Some(validator) = &self.validator {
            qb.push(" AND validator_address = ").push_bind(validator.clone());
        }
    }
}

impl SqlFilter for ValidatorFilters {
    fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE 1=1");
        if let Some(status) = self.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(min_stake) = self.min_stake {
            qb.push(" AND total_delegated_stake >= ").push_bind(min_stake);
        }
    }
}

/// Reward rows of one user, optionally bounded in time and by validator.
#[derive(Debug, Clone)]
pub(crate) struct RewardScope {
    pub user_address: String,
    pub since: Option<DateTime<Utc>>,
    pub validator: Option<String>,
}

impl SqlFilter for RewardScope {
    fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE LOWER(user_address) = ")
            .push_bind(self.user_address.clone());
        if let Some(since) = self.since {
            qb.push(" AND julianday(received_at) >= julianday(")
                .push_bind(since)
                .push(")");
        }
        if let Some(validator) = &self.validator {
            qb.push(" AND validator_address = ").push_bind(validator.clone());
        }
    }
}

/// Renders the earliest and latest `received_at` of a group as RFC 3339 UTC.
///
/// Stored timestamps mix SQLite's `YYYY-MM-DD HH:MM:SS` with RFC 3339 text,
/// so extremes are taken over `julianday` instants rather than over strings.
pub(crate) const RECEIVED_RANGE: &str =
    "strftime('%Y-%m-%dT%H:%M:%fZ', MIN(julianday(received_at))) AS first_reward, \
     strftime('%Y-%m-%dT%H:%M:%fZ', MAX(julianday(received_at))) AS last_reward";

/// Distinct addresses in first-seen order, ready for a batch lookup.
pub(crate) fn distinct_addresses<'a, I>(addresses: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = BTreeSet::new();
    addresses
        .into_iter()
        .filter(|a| seen.insert(*a))
        .map(str::to_string)
        .collect()
}
