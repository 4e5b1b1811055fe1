//! Raw query strings and their conversion into repository filters.
//!
//! Every field arrives as an optional string so a malformed page parameter
//! falls back to its default instead of rejecting the request.

use serde::Deserialize;
use shared_models::{PageLimits, PageRequest};

use super::error::ApiError;
use crate::models::{RestakerFilters, RewardFilters, Timeframe, ValidatorFilters, ValidatorStatus};

pub const RESTAKER_PAGE: PageLimits = PageLimits::new(50, 100);
pub const VALIDATOR_PAGE: PageLimits = PageLimits::new(50, 100);
pub const HISTORY_PAGE: PageLimits = PageLimits::new(100, 500);

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_int(raw: &Option<String>) -> Option<i64> {
    non_empty(raw).and_then(|s| s.parse().ok())
}

fn parse_amount(raw: &Option<String>, name: &str) -> Result<Option<f64>, ApiError> {
    match non_empty(raw) {
        None => Ok(None),
        Some(s) => match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(ApiError::InvalidFilter(format!(
                "{name} must be a number, got `{s}`"
            ))),
        },
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PageQuery {
    pub fn to_page(&self, limits: PageLimits) -> PageRequest {
        PageRequest::clamped(parse_int(&self.limit), parse_int(&self.offset), limits)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestakerQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub min_amount: Option<String>,
    pub validator: Option<String>,
}

impl RestakerQuery {
    pub fn to_filters(&self) -> Result<RestakerFilters, ApiError> {
        Ok(RestakerFilters {
            page: self.page.to_page(RESTAKER_PAGE),
            min_amount: parse_amount(&self.min_amount, "minAmount")?,
            validator: non_empty(&self.validator).map(str::to_string),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub status: Option<String>,
    pub min_stake: Option<String>,
}

impl ValidatorQuery {
    pub fn to_filters(&self) -> Result<ValidatorFilters, ApiError> {
        let status = non_empty(&self.status)
            .map(|s| s.parse::<ValidatorStatus>())
            .transpose()
            .map_err(|e| ApiError::InvalidFilter(e.to_string()))?;

        Ok(ValidatorFilters {
            page: self.page.to_page(VALIDATOR_PAGE),
            status,
            min_stake: parse_amount(&self.min_stake, "minStake")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RewardQuery {
    pub timeframe: Option<String>,
    pub validator: Option<String>,
}

impl RewardQuery {
    pub fn timeframe(&self) -> Timeframe {
        non_empty(&self.timeframe)
            .map(Timeframe::parse)
            .unwrap_or_default()
    }

    pub fn to_filters(&self) -> RewardFilters {
        RewardFilters {
            timeframe: self.timeframe(),
            validator: non_empty(&self.validator).map(str::to_string),
        }
    }
}
