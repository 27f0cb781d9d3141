use axum::{extract::State, routing::get, Router};
use tracing::{info, instrument, warn};

use super::{
    dto::{UpdateProfileRequest, UserProfile},
    repo_types::User,
};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    extract::Json,
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/auth/user/", get(get_profile).patch(update_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let user = User::find_by_id(&state.db, user_id).await?.ok_or_else(|| {
        warn!(%user_id, "token for unknown user");
        ApiError::unauthorized("User not found")
    })?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    let changes = payload.into_changes()?;
    let user = User::update_profile(&state.db, user_id, changes)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;
    info!(%user_id, "profile updated");
    Ok(Json(user.into()))
}
