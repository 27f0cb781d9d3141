use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{SessionPatch, SessionPayload, SessionQuery, SessionResponse},
    repo::{self, UpdateOutcome},
    repo_types::SessionChanges,
};
use crate::{
    auth::extractors::StaffUser,
    error::{ApiError, ApiResult},
    extract::{Json, Path, Query},
    state::AppState,
};

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions/", get(list_sessions).post(create_session))
        .route(
            "/sessions/:id/",
            get(get_session)
                .put(replace_session)
                .patch(patch_session)
                .delete(delete_session),
        )
}

#[instrument(skip(state))]
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> ApiResult<Json<Vec<SessionResponse>>> {
    let filter = query.into_filter()?;
    let sessions = repo::list(&state.db, &filter).await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    let session = repo::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Session not found"))?;
    Ok(Json(session.into()))
}

#[instrument(skip(state, staff, payload))]
pub async fn create_session(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Json(payload): Json<SessionPayload>,
) -> ApiResult<impl IntoResponse> {
    let changes = SessionChanges::from(payload).validated()?;
    let session = repo::create(&state.db, &changes).await?;
    info!(session_id = %session.id, staff_id = %staff.id, sport = %session.sport, "session created");

    let location = format!("/api/sessions/{}/", session.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(SessionResponse::from(session)),
    ))
}

#[instrument(skip(state, _staff, payload))]
pub async fn replace_session(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SessionPayload>,
) -> ApiResult<Json<SessionResponse>> {
    apply_update(&state, id, SessionChanges::from(payload)).await
}

#[instrument(skip(state, _staff, payload))]
pub async fn patch_session(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SessionPatch>,
) -> ApiResult<Json<SessionResponse>> {
    apply_update(&state, id, SessionChanges::from(payload)).await
}

#[instrument(skip(state, _staff))]
pub async fn delete_session(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Session not found"));
    }
    info!(session_id = %id, "session deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn apply_update(
    state: &AppState,
    id: Uuid,
    changes: SessionChanges,
) -> ApiResult<Json<SessionResponse>> {
    let changes = changes.validated()?;
    match repo::update(&state.db, id, &changes).await? {
        UpdateOutcome::Updated(session) => {
            info!(session_id = %id, "session updated");
            Ok(Json(session.into()))
        }
        UpdateOutcome::NotFound => Err(ApiError::not_found("Session not found")),
        UpdateOutcome::OverCapacity => {
            warn!(session_id = %id, "update would overbook session");
            Err(ApiError::bad_request("booked_slots cannot exceed total_slots"))
        }
    }
}
