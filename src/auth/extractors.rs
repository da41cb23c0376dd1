//! Request gating. `CurrentUser` resolves the session cookie to a user and
//! fails closed; `AdminUser` layers the role check on top. Neither mutates
//! anything beyond clearing a cookie that turned out to be stale.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::CookieJar;
use serde_json::json;
use tracing::{error, warn};

use crate::auth::session;
use crate::state::AppState;
use crate::users::repo::User;

/// Authenticated caller, resolved from the session cookie.
#[derive(Debug)]
pub struct CurrentUser(pub User);

/// Authenticated caller with the admin flag set. Always check this after
/// authentication, never instead of it.
#[derive(Debug)]
pub struct AdminUser(pub User);

/// Rejection for the auth extractors. Invalid-session failures also push an
/// expired cookie so the client drops its stale token.
#[derive(Debug)]
pub struct AuthRejection {
    status: StatusCode,
    message: &'static str,
    clear_cookie: bool,
}

impl AuthRejection {
    fn unauthenticated() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Not authenticated",
            clear_cookie: false,
        }
    }

    fn expired() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Session expired",
            clear_cookie: true,
        }
    }

    fn not_admin() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: "Admin access required",
            clear_cookie: false,
        }
    }

    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error",
            clear_cookie: false,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        if self.clear_cookie {
            let jar = CookieJar::new().add(session::clear_session_cookie());
            (self.status, jar, body).into_response()
        } else {
            (self.status, body).into_response()
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(session::SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(AuthRejection::unauthenticated)?;

        match session::validate(&state.db, &token).await {
            Ok(Some(user)) => Ok(Self(user)),
            Ok(None) => {
                warn!("invalid or expired session");
                Err(AuthRejection::expired())
            }
            Err(e) => {
                error!(error = %e, "session lookup failed");
                Err(AuthRejection::internal())
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            warn!(user_id = user.id, "admin route denied");
            return Err(AuthRejection::not_admin());
        }
        Ok(Self(user))
    }
}
