use axum::extract::{Path, State};
use axum::Json;
use clienttrack_core::models::{CreateLeadInput, Lead};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{ApiError, AppState, AuthUser};

pub async fn create_lead(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateLeadInput>,
) -> Result<Json<Lead>, ApiError> {
    let lead = state.db.create_lead(user.id, input)?;
    Ok(Json(lead))
}

pub async fn get_leads(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    Ok(Json(state.db.get_leads(user.id)?))
}

pub async fn delete_lead(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.db.delete_lead(user.id, id)? {
        return Err(ApiError::NotFound("Lead not found"));
    }
    Ok(Json(json!({ "message": "Lead deleted" })))
}
