use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use mockall::mock;
use mockall::predicate::*;
use serde_json::Value;
use shared_models::PageRequest;

use restaking_registry::{
    api::{api_routes, AppState},
    models::*,
    repositories::sqlite::{initialize_schema, seed_initial_data, Database},
    repositories::traits::*,
    utils::{RegistryError, Result},
};

// Mock repositories
mock! {
    pub RestakerRepo {}
    #[async_trait]
    impl RestakerRepository for RestakerRepo {
        async fn list_restakers(&self, filters: &RestakerFilters) -> Result<RestakerListing>;
        async fn get_restaker_by_address(&self, address: &str) -> Result<Option<Restaker>>;
    }
}

mock! {
    pub ValidatorRepo {}
    #[async_trait]
    impl ValidatorRepository for ValidatorRepo {
        async fn list_validators(&self, filters: &ValidatorFilters) -> Result<ValidatorListing>;
        async fn get_validator_by_id(&self, id: &str) -> Result<Option<Validator>>;
        async fn get_slash_history(&self, operator_id: &str) -> Result<Vec<SlashEvent>>;
    }
}

mock! {
    pub RewardRepo {}
    #[async_trait]
    impl RewardRepository for RewardRepo {
        async fn get_rewards_summary(&self, address: &str, filters: &RewardFilters) -> Result<Option<RewardSummary>>;
        async fn get_reward_breakdown(&self, address: &str, timeframe: Timeframe) -> Result<Vec<RewardBreakdown>>;
        async fn get_reward_history(&self, address: &str, page: PageRequest) -> Result<RewardHistory>;
    }
}

const ADDRESS: &str = "0xabcdef1234567890abcdef1234567890abcdef12";

// Test helpers
fn state(restakers: MockRestakerRepo, validators: MockValidatorRepo, rewards: MockRewardRepo) -> AppState {
    AppState::new(Arc::new(restakers), Arc::new(validators), Arc::new(rewards))
}

async fn get(state: AppState, uri: &str) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(api_routes()),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

fn sample_restaker() -> Restaker {
    Restaker {
        user_address: ADDRESS.to_string(),
        amount_restaked: 750.25,
        validator_address: "0x1234567890abcdef1234567890abcdef12345678".to_string(),
        restaked_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        validator: None,
    }
}

#[actix_web::test]
async fn test_list_restakers_envelope() {
    let mut restakers = MockRestakerRepo::new();
    restakers
        .expect_list_restakers()
        .withf(|f| {
            f.page == PageRequest::new(100, 0)
                && f.min_amount == Some(600.0)
                && f.validator.is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(RestakerListing {
                restakers: vec![sample_restaker()],
                total: 101,
                total_staked: 750.25,
                unique_validators: 1,
            })
        });

    let (status, body) = get(
        state(restakers, MockValidatorRepo::new(), MockRewardRepo::new()),
        "/api/restakers?limit=1000&offset=-2&minAmount=600",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"][0]["amountRestaked"], 750.25);
    assert!(body["data"][0]["validator"].is_null());
    assert_eq!(body["pagination"]["limit"], 100);
    assert_eq!(body["pagination"]["offset"], 0);
    assert_eq!(body["pagination"]["hasMore"], true);
    assert_eq!(body["meta"]["totalStaked"], 750.25);
    assert_eq!(body["meta"]["uniqueValidators"], 1);
}

#[actix_web::test]
async fn test_malformed_limit_uses_default() {
    let mut restakers = MockRestakerRepo::new();
    restakers
        .expect_list_restakers()
        .withf(|f| f.page == PageRequest::new(50, 0))
        .returning(|_| {
            Ok(RestakerListing {
                restakers: vec![],
                total: 0,
                total_staked: 0.0,
                unique_validators: 0,
            })
        });

    let (status, body) = get(
        state(restakers, MockValidatorRepo::new(), MockRewardRepo::new()),
        "/api/restakers?limit=ten&offset=abc",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["hasMore"], false);
}

#[actix_web::test]
async fn test_bad_min_amount_is_rejected() {
    let mut restakers = MockRestakerRepo::new();
    restakers.expect_list_restakers().never();

    let (status, body) = get(
        state(restakers, MockValidatorRepo::new(), MockRewardRepo::new()),
        "/api/restakers?minAmount=plenty",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_FILTER");
    assert!(body["error"]["timestamp"].is_string());
}

#[actix_web::test]
async fn test_restaker_address_checks() {
    let mut restakers = MockRestakerRepo::new();
    restakers.expect_get_restaker_by_address().never();

    let (status, body) = get(
        state(restakers, MockValidatorRepo::new(), MockRewardRepo::new()),
        "/api/restakers/abc",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_ADDRESS");

    let mut restakers = MockRestakerRepo::new();
    restakers
        .expect_get_restaker_by_address()
        .with(eq("0xnobody"))
        .returning(|_| Ok(None));
    let (status, body) = get(
        state(restakers, MockValidatorRepo::new(), MockRewardRepo::new()),
        "/api/restakers/0xnobody",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESTAKER_NOT_FOUND");
}

#[actix_web::test]
async fn test_unknown_status_is_rejected() {
    let mut validators = MockValidatorRepo::new();
    validators.expect_list_validators().never();

    let (status, body) = get(
        state(MockRestakerRepo::new(), validators, MockRewardRepo::new()),
        "/api/validators?status=retired",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_FILTER");
}

#[actix_web::test]
async fn test_validator_meta_and_not_found() {
    let mut validators = MockValidatorRepo::new();
    validators
        .expect_list_validators()
        .withf(|f| f.status == Some(ValidatorStatus::Jailed))
        .returning(|_| {
            Ok(ValidatorListing {
                validators: vec![],
                total: 1,
                total_delegated_stake: 12300.75,
                status_breakdown: BTreeMap::from([(ValidatorStatus::Jailed, 1)]),
            })
        });
    validators
        .expect_get_validator_by_id()
        .with(eq("val_404"))
        .returning(|_| Ok(None));

    let state = state(MockRestakerRepo::new(), validators, MockRewardRepo::new());

    let (status, body) = get(state.clone(), "/api/validators?status=jailed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["statusBreakdown"]["jailed"], 1);
    assert_eq!(body["meta"]["totalDelegatedStake"], 12300.75);

    let (status, body) = get(state, "/api/validators/val_404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "VALIDATOR_NOT_FOUND");
}

#[actix_web::test]
async fn test_empty_slash_history_is_ok() {
    let mut validators = MockValidatorRepo::new();
    validators
        .expect_get_slash_history()
        .with(eq("val_001"))
        .returning(|_| Ok(vec![]));

    let (status, body) = get(
        state(MockRestakerRepo::new(), validators, MockRewardRepo::new()),
        "/api/validators/val_001/slash-history",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Array(vec![]));
}

#[actix_web::test]
async fn test_rewards_require_full_address() {
    let mut rewards = MockRewardRepo::new();
    rewards.expect_get_rewards_summary().never();
    rewards.expect_get_reward_breakdown().never();
    rewards.expect_get_reward_history().never();
    let state = state(MockRestakerRepo::new(), MockValidatorRepo::new(), rewards);

    for uri in [
        "/api/rewards/0x1234",
        "/api/rewards/0x1234/breakdown",
        "/api/rewards/abcdef1234567890abcdef1234567890abcdef12/history",
    ] {
        let (status, body) = get(state.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], "INVALID_ADDRESS");
    }
}

#[actix_web::test]
async fn test_no_reward_data_is_not_found() {
    let mut rewards = MockRewardRepo::new();
    rewards
        .expect_get_rewards_summary()
        .withf(|address, f| address == ADDRESS && f.timeframe == Timeframe::Month)
        .returning(|_, _| Ok(None));

    let (status, body) = get(
        state(MockRestakerRepo::new(), MockValidatorRepo::new(), rewards),
        &format!("/api/rewards/{ADDRESS}?timeframe=2w"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "REWARDS_NOT_FOUND");
}

#[actix_web::test]
async fn test_reward_history_pagination() {
    let mut rewards = MockRewardRepo::new();
    rewards
        .expect_get_reward_history()
        .withf(|_, page| *page == PageRequest::new(500, 10))
        .returning(|_, _| {
            Ok(RewardHistory {
                rewards: vec![],
                total: 12,
            })
        });

    let (status, body) = get(
        state(MockRestakerRepo::new(), MockValidatorRepo::new(), rewards),
        &format!("/api/rewards/{ADDRESS}/history?limit=9999&offset=10"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 12);
    assert_eq!(body["pagination"]["limit"], 500);
    assert_eq!(body["pagination"]["hasMore"], false);
}

#[actix_web::test]
async fn test_storage_failures_map_to_status() {
    let mut validators = MockValidatorRepo::new();
    validators
        .expect_get_validator_by_id()
        .returning(|_| Err(RegistryError::Database(sqlx::Error::PoolClosed)));
    validators.expect_get_slash_history().returning(|_| {
        Err(RegistryError::Timeout {
            operation: "get_slash_history",
            after: Duration::from_secs(10),
        })
    });
    let state = state(MockRestakerRepo::new(), validators, MockRewardRepo::new());

    let (status, body) = get(state.clone(), "/api/validators/val_001").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"]["message"], "Internal Server Error");

    let (status, body) = get(state, "/api/validators/val_001/slash-history").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "STORAGE_TIMEOUT");
}

#[actix_web::test]
async fn test_seeded_database_end_to_end() {
    let db = Database::in_memory().await.unwrap();
    initialize_schema(&db).await.unwrap();
    seed_initial_data(&db).await.unwrap();
    let state = AppState::from_database(db);

    let (status, body) = get(state.clone(), "/api/restakers?minAmount=600&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 5);
    assert_eq!(body["pagination"]["hasMore"], true);
    assert_eq!(body["data"][0]["amountRestaked"], 2000.0);
    assert_eq!(body["data"][0]["validator"]["operatorId"], "val_003");
    assert_eq!(body["data"][0]["validator"]["status"], "jailed");

    let (status, body) = get(state.clone(), "/api/validators/val_003/slash-history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["reason"], "Double signing violation");

    let (status, body) = get(state.clone(), &format!("/api/rewards/{ADDRESS}/breakdown?timeframe=7d")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["validatorName"], "EigenLayer Pro Validator");
    assert_eq!(body["data"][0]["operatorId"], "val_001");

    let (status, body) = get(state, &format!("/api/rewards/{ADDRESS}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalRewards"], 2.5);
    assert_eq!(body["data"]["timeframe"], "30d");
}
