use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_models::{PageRequest, Paginated};

use crate::utils::RegistryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorStatus {
    Active,
    Jailed,
    Slashed,
    Inactive,
}

impl ValidatorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorStatus::Active => "active",
            ValidatorStatus::Jailed => "jailed",
            ValidatorStatus::Slashed => "slashed",
            ValidatorStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ValidatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidatorStatus {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ValidatorStatus::Active),
            "jailed" => Ok(ValidatorStatus::Jailed),
            "slashed" => Ok(ValidatorStatus::Slashed),
            "inactive" => Ok(ValidatorStatus::Inactive),
            other => Err(RegistryError::InvalidInput(format!(
                "unknown validator status `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ValidatorMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validator {
    pub operator_id: String,
    pub operator_address: String,
    pub total_delegated_stake: f64,
    pub status: ValidatorStatus,
    pub commission_rate: f64,
    pub created_at: DateTime<Utc>,
    pub metadata: ValidatorMetadata,
}

/// The slice of a validator that restaker and reward records are enriched with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSummary {
    pub operator_id: String,
    pub name: Option<String>,
    pub total_delegated_stake: f64,
    pub status: ValidatorStatus,
    pub commission_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatorFilters {
    pub page: PageRequest,
    pub status: Option<ValidatorStatus>,
    pub min_stake: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorListing {
    pub validators: Vec<Validator>,
    pub total: i64,
    pub total_delegated_stake: f64,
    pub status_breakdown: BTreeMap<ValidatorStatus, i64>,
}

impl Paginated for ValidatorListing {
    fn total(&self) -> i64 {
        self.total
    }
}

/// Per-status aggregate row over the filtered validator set.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusGroup {
    pub status: ValidatorStatus,
    pub count: i64,
    pub stake: Option<f64>,
}

/// Totals folded from the per-status groups of one filtered set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatorStats {
    pub total: i64,
    pub total_delegated_stake: f64,
    pub status_breakdown: BTreeMap<ValidatorStatus, i64>,
}

impl ValidatorStats {
    pub fn from_groups(groups: &[StatusGroup]) -> Self {
        groups.iter().fold(Self::default(), |mut acc, g| {
            acc.total += g.count;
            acc.total_delegated_stake += g.stake.unwrap_or(0.0);
            *acc.status_breakdown.entry(g.status).or_insert(0) += g.count;
            acc
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlashEvent {
    pub id: String,
    pub validator_operator_id: String,
    pub slashed_at: DateTime<Utc>,
    pub amount_slashed: f64,
    pub reason: Option<String>,
    pub block_number: Option<i64>,
    pub transaction_hash: Option<String>,
}
