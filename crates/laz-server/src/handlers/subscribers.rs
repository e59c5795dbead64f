//! Newsletter handlers

use crate::error::{ApiError, ApiResult};
use crate::extractors::ClientIdentity;
use crate::validation::{is_valid_email, normalize_email};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use laz_types::{OkResponse, SubscribeRequest, Subscriber};
use tracing::{info, warn};

pub async fn subscribe(
    State(state): State<AppState>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> ApiResult<Json<OkResponse>> {
    let Json(req) = payload?;

    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        return Err(ApiError::bad_request("invalid email"));
    }

    if state.db.subscribe(&email, Utc::now()).await? {
        info!("New newsletter subscriber");
    }

    Ok(Json(OkResponse::default()))
}

/// Operator listing, served to loopback callers only
pub async fn list(
    State(state): State<AppState>,
    identity: ClientIdentity,
) -> ApiResult<Json<Vec<Subscriber>>> {
    if !identity.is_loopback() {
        warn!("Rejected subscriber listing from non-loopback caller");
        return Err(ApiError::Forbidden);
    }

    let subscribers = state.db.list_subscribers().await?;
    Ok(Json(subscribers))
}
