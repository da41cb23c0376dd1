use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::CookieJar;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::auth::dto::{LoginRequest, UserResponse};
use crate::auth::extractors::CurrentUser;
use crate::auth::{password, session};
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<UserResponse>), ApiError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Email and password required".into()));
    }
    payload.email = payload.email.trim().to_lowercase();

    // A malformed address gets the same generic failure as a wrong password;
    // this endpoint never confirms whether an account exists.
    if !password::is_valid_email(&payload.email) {
        warn!("login with malformed email");
        return Err(ApiError::Authentication("Invalid credentials".into()));
    }

    let Some(user) = repo::find_by_email(&state.db, &payload.email).await? else {
        warn!("login unknown email");
        return Err(ApiError::Authentication("Invalid credentials".into()));
    };

    let ok = password::verify_password(&payload.password, &user.password_hash)?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::Authentication("Invalid credentials".into()));
    }

    let token = session::issue(&state.db, user.id).await?;
    let jar = jar.add(session::session_cookie(token, state.config.production));

    info!(user_id = user.id, "user logged in");
    Ok((jar, Json(UserResponse { user: user.into() })))
}

#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    if let Some(cookie) = jar.get(session::SESSION_COOKIE) {
        session::revoke(&state.db, cookie.value()).await?;
    }
    let jar = jar.add(session::clear_session_cookie());
    Ok((jar, Json(json!({ "success": true }))))
}

#[instrument(skip_all)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse { user: user.into() })
}
