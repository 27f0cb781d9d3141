use axum::{extract::State, routing::post, Router};
use tracing::{info, instrument};

use super::{
    dto::{QuizQuery, QuizRequest, QuizResponse},
    services::{rank, Preferences},
};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    extract::{Json, Query},
    sessions::{repo, repo_types::SessionFilter},
    state::AppState,
    users::repo_types::User,
};

pub fn quiz_routes() -> Router<AppState> {
    Router::new().route(
        "/quiz-responses/",
        post(submit_quiz).get(preview_recommendations),
    )
}

/// Stores the answers on the caller's profile and returns matching sessions.
#[instrument(skip(state, payload))]
pub async fn submit_quiz(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<QuizRequest>,
) -> ApiResult<Json<QuizResponse>> {
    let changes = payload.profile_changes()?;

    let found = if changes.is_empty() {
        User::find_by_id(&state.db, user_id).await?
    } else {
        User::update_profile(&state.db, user_id, changes).await?
    };
    let user = found.ok_or_else(|| ApiError::unauthorized("User not found"))?;

    let prefs = Preferences::resolve(
        payload.favourite_sports.as_ref(),
        payload.location(),
        &user.favourite_sports.0,
        &user.location,
        payload.include_other_sports,
    );

    let response = recommend(&state, &prefs).await?;
    info!(
        %user_id,
        sports = ?prefs.sports,
        location = ?prefs.location,
        count = response.recommendations.len(),
        "quiz answered"
    );
    Ok(Json(response))
}

/// Recommendations from query parameters alone; nothing is stored.
#[instrument(skip(state))]
pub async fn preview_recommendations(
    State(state): State<AppState>,
    Query(query): Query<QuizQuery>,
) -> ApiResult<Json<QuizResponse>> {
    let prefs = query.preferences()?;
    Ok(Json(recommend(&state, &prefs).await?))
}

async fn recommend(state: &AppState, prefs: &Preferences) -> anyhow::Result<QuizResponse> {
    let filter = SessionFilter {
        location: prefs.location.clone(),
        sports: None,
        only_available: true,
    };
    let candidates = repo::list(&state.db, &filter).await?;
    Ok(QuizResponse {
        recommendations: rank(candidates, prefs),
    })
}
