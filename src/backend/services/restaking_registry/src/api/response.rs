use std::collections::BTreeMap;

use actix_web::HttpResponse;
use serde::Serialize;
use shared_models::{PageRequest, Paginated, PaginationMeta};

use crate::models::ValidatorStatus;

/// Pagination block for a listing served with `page`.
pub fn pagination(page: PageRequest, listing: &impl Paginated) -> PaginationMeta {
    PaginationMeta::new(page, listing.total())
}

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T, M = ()> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<M>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
            meta: None,
        }
    }

    pub fn page(data: T, pagination: PaginationMeta) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(data)
        }
    }
}

impl<T: Serialize, M: Serialize> ApiResponse<T, M> {
    pub fn with_meta<N: Serialize>(self, meta: N) -> ApiResponse<T, N> {
        ApiResponse {
            success: self.success,
            data: self.data,
            pagination: self.pagination,
            meta: Some(meta),
        }
    }

    pub fn into_response(self) -> HttpResponse {
        HttpResponse::Ok().json(self)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestakerMeta {
    pub total_staked: f64,
    pub unique_validators: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorMeta {
    pub total_delegated_stake: f64,
    pub status_breakdown: BTreeMap<ValidatorStatus, i64>,
}
