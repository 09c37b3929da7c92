use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use tracing::warn;

use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidateResponse, NewCandidate, ReasonUpdate};
use crate::state::AppState;
use crate::submissions::StoreError;

const NAME_REQUIRED: &str = "Candidate object with `name` is required";

/// GET /api/submissions
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Candidate>>, AppError> {
    let candidates = state
        .store
        .list()
        .await
        .map_err(|e| AppError::storage("Failed to read submissions file", e))?;
    Ok(Json(candidates))
}

/// POST /api/submissions
pub async fn handle_create(
    State(state): State<AppState>,
    body: Result<Json<NewCandidate>, JsonRejection>,
) -> Result<Json<CandidateResponse>, AppError> {
    let Json(new_candidate) = body.map_err(|rejection| {
        warn!("POST /api/submissions rejected body: {rejection}");
        AppError::Validation(NAME_REQUIRED.to_string())
    })?;

    let candidate = state.store.create(new_candidate).await.map_err(|e| match e {
        StoreError::InvalidInput => AppError::Validation(NAME_REQUIRED.to_string()),
        other => AppError::storage("Failed to save candidate", other),
    })?;

    Ok(Json(CandidateResponse {
        message: "Candidate added successfully".to_string(),
        candidate,
    }))
}

/// PUT /api/submissions/:id
pub async fn handle_update_reason(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ReasonUpdate>, JsonRejection>,
) -> Result<Json<CandidateResponse>, AppError> {
    let Json(update) = body.map_err(|rejection| {
        warn!("PUT /api/submissions/{id} rejected body: {rejection}");
        AppError::Validation("Request body must be JSON with a `reason` string".to_string())
    })?;

    let candidate = state
        .store
        .update_reason(&id, update.reason)
        .await
        .map_err(|e| match e {
            StoreError::NotFound(_) => AppError::NotFound("Candidate not found".to_string()),
            other => AppError::storage("Failed to update reason", other),
        })?;

    Ok(Json(CandidateResponse {
        message: "Reason updated".to_string(),
        candidate,
    }))
}
