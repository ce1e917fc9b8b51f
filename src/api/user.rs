//! User resource endpoints. Deletion is restricted to the account's owner.

use crate::auth::{models::UserResponse, middleware::SecurityContext, user_store::UserRepository};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Clone)]
pub struct UserState {
    pub users: Arc<dyn UserRepository>,
}

fn parse_id(raw: &str) -> Result<i64, StatusCode> {
    raw.parse::<i64>().map_err(|_| StatusCode::BAD_REQUEST)
}

/// GET /api/user/:id
pub async fn find_by_id(
    State(state): State<UserState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, StatusCode> {
    let id = parse_id(&id)?;

    let user = state.users.find_by_id(id).map_err(|e| {
        error!("User lookup failed for {id}: {e:#}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    user.map(|u| Json(UserResponse::from_user(&u)))
        .ok_or(StatusCode::NOT_FOUND)
}

/// DELETE /api/user/:id - owner only
pub async fn delete(
    State(state): State<UserState>,
    Extension(context): Extension<SecurityContext>,
    Path(id): Path<String>,
) -> StatusCode {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(status) => return status,
    };

    let user = match state.users.find_by_id(id) {
        Ok(Some(user)) => user,
        Ok(None) => return StatusCode::NOT_FOUND,
        Err(e) => {
            error!("User lookup failed for {id}: {e:#}");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    let owner = context
        .principal()
        .is_some_and(|principal| principal.username == user.email);
    if !owner {
        warn!("Refused deletion of user {id}: caller is not the owner");
        return StatusCode::UNAUTHORIZED;
    }

    match state.users.delete_by_id(id) {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            error!("Failed to delete user {id}: {e:#}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
