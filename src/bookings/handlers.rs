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
    dto::{BookingResponse, CreateBookingRequest},
    repo,
    repo_types::BookOutcome,
};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
    state::AppState,
};

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings/", get(list_bookings).post(create_booking))
        .route("/bookings/:id/", get(get_booking).delete(cancel_booking))
}

#[instrument(skip(state))]
pub async fn list_bookings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<BookingResponse>>> {
    let rows = repo::list_for_user(&state.db, user_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_booking(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BookingResponse>> {
    let row = repo::find_for_user(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;
    Ok(Json(row.into()))
}

#[instrument(skip(state))]
pub async fn create_booking(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> ApiResult<impl IntoResponse> {
    let session_id = payload.session_id;
    match repo::book(&state.db, user_id, session_id).await? {
        BookOutcome::Booked(booking, session) => {
            info!(booking_id = %booking.id, %user_id, %session_id, "session booked");
            let location = format!("/api/bookings/{}/", booking.id);
            Ok((
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(BookingResponse::from((booking, session))),
            ))
        }
        BookOutcome::SessionNotFound => Err(ApiError::not_found("Session not found")),
        BookOutcome::SessionFull => {
            warn!(%user_id, %session_id, "session full");
            Err(ApiError::conflict("Session is fully booked"))
        }
        BookOutcome::AlreadyBooked => Err(ApiError::conflict("You have already booked this session")),
    }
}

#[instrument(skip(state))]
pub async fn cancel_booking(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !repo::cancel(&state.db, user_id, id).await? {
        return Err(ApiError::not_found("Booking not found"));
    }
    info!(booking_id = %id, %user_id, "booking cancelled");
    Ok(StatusCode::NO_CONTENT)
}
