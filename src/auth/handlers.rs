use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    services::{normalize_email, validate_registration},
};
use crate::{
    error::{is_unique_violation, ApiError, ApiResult},
    extract::Json,
    state::AppState,
    users::repo_types::{NewUser, User},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register/", post(register))
        .route("/auth/login/", post(login))
        .route("/auth/refresh/", post(refresh))
}

fn respond(keys: &JwtKeys, user: User) -> ApiResult<Json<AuthResponse>> {
    let pair = keys.issue_pair(user.id)?;
    Ok(Json(AuthResponse {
        access_token: pair.access,
        refresh_token: pair.refresh,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    if let Err(e) = validate_registration(&mut payload) {
        warn!(error = %e, "registration rejected");
        return Err(e);
    }

    if User::username_or_email_taken(&state.db, &payload.username, &payload.email).await? {
        warn!(username = %payload.username, email = %payload.email, "account already registered");
        return Err(ApiError::conflict("Username or email already registered"));
    }

    let hash = hash_password(&payload.password)?;
    let new_user = NewUser {
        username: &payload.username,
        email: &payload.email,
        password_hash: &hash,
        first_name: &payload.first_name,
        last_name: &payload.last_name,
        phone_number: &payload.phone_number,
        date_of_birth: payload.date_of_birth,
        location: &payload.location,
        favourite_sports: payload.favourite_sports.as_slice(),
        is_staff: false,
        is_superuser: false,
    };

    let user = match User::create(&state.db, &new_user).await {
        Ok(u) => u,
        // lost a race against a concurrent registration
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("Username or email already registered"));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.id, username = %user.username, "user registered");
    let body = respond(&JwtKeys::from_ref(&state), user)?;
    Ok((StatusCode::CREATED, body))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let identifier = payload.email.trim();
    if identifier.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let Some(user) = User::find_by_login(&state.db, identifier).await? else {
        warn!(login = %normalize_email(identifier), "login unknown account");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !user.is_active || !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login refused");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    info!(user_id = %user.id, "user logged in");
    respond(&JwtKeys::from_ref(&state), user)
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    respond(&keys, user)
}
