//! Signup, login and the bearer-token extractor.

use axum::extract::{FromRequestParts, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use chrono::Utc;
use clienttrack_core::models::{AuthResponse, LoginInput, SignupInput, User, UserProfile};

use super::{ApiError, AppState};
use crate::jwt::AuthToken;

pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupInput>,
) -> Result<Json<AuthResponse>, ApiError> {
    User::validate_name(&input.name).map_err(|e| ApiError::BadRequest(e.into()))?;
    User::validate_email(&input.email).map_err(|e| ApiError::BadRequest(e.into()))?;
    User::validate_password(&input.password).map_err(|e| ApiError::BadRequest(e.into()))?;

    if state.db.get_user_by_email(&input.email)?.is_some() {
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let password_hash = User::hash_password(&input.password);
    let user = state.db.create_user(&input.name, &input.email, &password_hash)?;
    tracing::info!(user = %user.id, "new signup");

    respond(&state, user)
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<AuthResponse>, ApiError> {
    // One message for both failure modes; don't reveal which emails exist
    let invalid = || ApiError::Unauthorized("Invalid email or password".into());

    let user = state.db.get_user_by_email(&input.email)?.ok_or_else(invalid)?;
    if !user.verify_password(&input.password) {
        return Err(invalid());
    }

    respond(&state, user)
}

fn respond(state: &AppState, user: User) -> Result<Json<AuthResponse>, ApiError> {
    let token = AuthToken::issue(user.id, Utc::now())
        .sign(&state.keys)
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("failed to sign token")))?;

    Ok(Json(AuthResponse {
        token,
        user: UserProfile::from(user),
    }))
}

/// The authenticated caller, resolved from the `Authorization` header.
/// Every lead/project handler takes this as its first extractor.
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthorized("not logged in".into()))?;

        let token = header
            .to_str()
            .map_err(|_| ApiError::Unauthorized("token must be ascii only".into()))?
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("token must be a bearer token".into()))?;

        let auth = AuthToken::verify(&state.keys, token)
            .ok_or_else(|| ApiError::Unauthorized("invalid token".into()))?;

        // A token whose subject no longer exists reads the same as a bad one
        let user = state
            .db
            .get_user(auth.user_id)?
            .ok_or_else(|| ApiError::Unauthorized("invalid token".into()))?;

        Ok(Self(user))
    }
}
