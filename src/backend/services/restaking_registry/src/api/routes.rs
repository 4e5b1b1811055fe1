use actix_web::{web, HttpResponse, Scope};
use tracing::instrument;

use super::error::ApiError;
use super::params::{PageQuery, RestakerQuery, RewardQuery, ValidatorQuery, HISTORY_PAGE};
use super::response::{pagination, ApiResponse, RestakerMeta, ValidatorMeta};
use super::AppState;
use crate::utils::address;

pub fn api_routes() -> Scope {
    web::scope("/api")
        .service(restaker_routes())
        .service(validator_routes())
        .service(reward_routes())
}

pub fn restaker_routes() -> Scope {
    web::scope("/restakers")
        .route("", web::get().to(list_restakers))
        .route("/{address}", web::get().to(get_restaker))
}

pub fn validator_routes() -> Scope {
    web::scope("/validators")
        .route("", web::get().to(list_validators))
        .route("/{id}", web::get().to(get_validator))
        .route("/{id}/slash-history", web::get().to(get_slash_history))
}

pub fn reward_routes() -> Scope {
    web::scope("/rewards")
        .route("/{address}", web::get().to(get_rewards))
        .route("/{address}/breakdown", web::get().to(get_reward_breakdown))
        .route("/{address}/history", web::get().to(get_reward_history))
}

fn require_evm_address(raw: &str) -> Result<(), ApiError> {
    if address::is_evm_address(raw) {
        Ok(())
    } else {
        Err(ApiError::InvalidAddress("Invalid Ethereum address format"))
    }
}

#[instrument(skip(state))]
async fn list_restakers(
    state: web::Data<AppState>,
    query: web::Query<RestakerQuery>,
) -> Result<HttpResponse, ApiError> {
    let filters = query.to_filters()?;
    let listing = state.restakers.list_restakers(&filters).await?;

    let pagination = pagination(filters.page, &listing);
    let meta = RestakerMeta {
        total_staked: listing.total_staked,
        unique_validators: listing.unique_validators,
    };

    Ok(ApiResponse::page(listing.restakers, pagination)
        .with_meta(meta)
        .into_response())
}

#[instrument(skip(state))]
async fn get_restaker(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_address = path.into_inner();
    if !address::has_hex_prefix(&user_address) {
        return Err(ApiError::InvalidAddress(
            "Invalid address format (must start with 0x)",
        ));
    }

    let restaker = state
        .restakers
        .get_restaker_by_address(&user_address)
        .await?
        .ok_or(ApiError::RestakerNotFound)?;

    Ok(ApiResponse::ok(restaker).into_response())
}

#[instrument(skip(state))]
async fn list_validators(
    state: web::Data<AppState>,
    query: web::Query<ValidatorQuery>,
) -> Result<HttpResponse, ApiError> {
    let filters = query.to_filters()?;
    let listing = state.validators.list_validators(&filters).await?;

    let pagination = pagination(filters.page, &listing);
    let meta = ValidatorMeta {
        total_delegated_stake: listing.total_delegated_stake,
        status_breakdown: listing.status_breakdown,
    };

    Ok(ApiResponse::page(listing.validators, pagination)
        .with_meta(meta)
        .into_response())
}

#[instrument(skip(state))]
async fn get_validator(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let validator = state
        .validators
        .get_validator_by_id(&path)
        .await?
        .ok_or(ApiError::ValidatorNotFound)?;

    Ok(ApiResponse::ok(validator).into_response())
}

#[instrument(skip(state))]
async fn get_slash_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let events = state.validators.get_slash_history(&path).await?;
    Ok(ApiResponse::ok(events).into_response())
}

#[instrument(skip(state))]
async fn get_rewards(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<RewardQuery>,
) -> Result<HttpResponse, ApiError> {
    require_evm_address(&path)?;

    let summary = state
        .rewards
        .get_rewards_summary(&path, &query.to_filters())
        .await?
        .ok_or(ApiError::RewardsNotFound)?;

    Ok(ApiResponse::ok(summary).into_response())
}

#[instrument(skip(state))]
async fn get_reward_breakdown(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<RewardQuery>,
) -> Result<HttpResponse, ApiError> {
    require_evm_address(&path)?;

    let breakdown = state
        .rewards
        .get_reward_breakdown(&path, query.timeframe())
        .await?;

    Ok(ApiResponse::ok(breakdown).into_response())
}

#[instrument(skip(state))]
async fn get_reward_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ApiError> {
    require_evm_address(&path)?;

    let page = query.to_page(HISTORY_PAGE);
    let history = state.rewards.get_reward_history(&path, page).await?;

    let pagination = pagination(page, &history);
    Ok(ApiResponse::page(history.rewards, pagination).into_response())
}
