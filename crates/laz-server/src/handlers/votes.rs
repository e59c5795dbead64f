//! Vote handlers

use crate::error::{ApiError, ApiResult};
use crate::extractors::ClientIdentity;
use crate::validation::is_valid_slug;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use chrono::Utc;
use laz_types::{Direction, VoteCounts, VoteRequest, VoteSummary};

pub async fn cast(
    State(state): State<AppState>,
    identity: ClientIdentity,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> ApiResult<Json<VoteCounts>> {
    let Json(req) = payload?;

    let direction: Direction = req
        .direction
        .parse()
        .map_err(|_| ApiError::bad_request("direction must be 'up' or 'down'"))?;
    if !is_valid_slug(&req.slug) {
        return Err(ApiError::bad_request("invalid slug"));
    }

    let counts = state
        .db
        .cast_vote(&req.slug, &identity.voter_hash(), direction, Utc::now())
        .await?;

    Ok(Json(counts))
}

pub async fn get(
    State(state): State<AppState>,
    identity: ClientIdentity,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<VoteSummary>> {
    let Path(slug) = path?;
    if !is_valid_slug(&slug) {
        return Err(ApiError::bad_request("invalid slug"));
    }

    let summary = state
        .db
        .get_summary(&slug, &identity.voter_hash())
        .await?;

    Ok(Json(summary))
}
