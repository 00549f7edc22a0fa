use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use clienttrack_core::dashboard;
use clienttrack_core::models::{
    CreateFollowUpNoteInput, CreateProjectInput, DashboardSummary, ProjectWithNotes,
    UpdateProjectInput,
};
use uuid::Uuid;

use super::{ApiError, AppState, AuthUser};

pub async fn create_project(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProjectInput>,
) -> Result<Json<ProjectWithNotes>, ApiError> {
    let project = state.db.create_project(user.id, input)?;
    Ok(Json(project))
}

pub async fn get_projects(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectWithNotes>>, ApiError> {
    Ok(Json(state.db.get_projects(user.id)?))
}

pub async fn update_project(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateProjectInput>,
) -> Result<Json<ProjectWithNotes>, ApiError> {
    let project = state
        .db
        .update_project(user.id, id, input)?
        .ok_or(ApiError::NotFound("Project not found"))?;
    Ok(Json(project))
}

pub async fn add_follow_up_note(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateFollowUpNoteInput>,
) -> Result<Json<ProjectWithNotes>, ApiError> {
    let project = state
        .db
        .create_note_for_project(user.id, id, &input.note)?
        .ok_or(ApiError::NotFound("Project not found"))?;
    Ok(Json(project))
}

/// Consume a lead: copy it into a fresh in-progress project and delete it.
pub async fn convert_lead(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
) -> Result<Json<ProjectWithNotes>, ApiError> {
    let project = state
        .db
        .convert_lead(user.id, lead_id)?
        .ok_or(ApiError::NotFound("Lead not found"))?;
    Ok(Json(project))
}

pub async fn get_dashboard(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let leads = state.db.get_leads(user.id)?;
    let projects = state.db.get_projects(user.id)?;
    Ok(Json(dashboard::aggregate(&leads, &projects, Utc::now())))
}
