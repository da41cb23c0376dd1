use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{error, info, instrument};

use crate::auth::extractors::AdminUser;
use crate::auth::{password, session};
use crate::email::Contact;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::dto::{
    CreateUserRequest, CreatedUserResponse, PasswordResponse, UpdateUserRequest, UsersResponse,
};
use crate::users::repo;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/:id", put(update_user).delete(delete_user))
        .route("/admin/users/:id/reset-password", put(reset_password))
}

#[instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = repo::list_all(&state.db).await?;
    Ok(Json(UsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    let email = payload.email.trim().to_lowercase();
    let name = payload.name.trim().to_string();

    if email.is_empty() || name.is_empty() {
        return Err(ApiError::Validation("Email and name required".into()));
    }
    if !password::is_valid_email(&email) {
        return Err(ApiError::Validation("Invalid email format".into()));
    }
    if repo::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists".into()));
    }

    let plaintext = payload.password.unwrap_or_else(password::generate_password);
    let hash = password::hash_password(&plaintext)?;
    let user = repo::create(&state.db, &email, &name, &hash, payload.is_admin).await?;

    info!(user_id = user.id, "user created");

    // Welcome mail goes out after the response; a failed send is only logged.
    let notifier = state.notifier.clone();
    let contact = Contact {
        name: user.name.clone(),
        email: user.email.clone(),
    };
    let mailed_password = plaintext.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.welcome(&contact, Some(&mailed_password)).await {
            error!(error = %e, "welcome notification failed");
        }
    });

    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            user: user.into(),
            password: plaintext,
        }),
    ))
}

#[instrument(skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<crate::auth::dto::UserResponse>, ApiError> {
    let user_id: i64 = id
        .parse()
        .map_err(|_| ApiError::Validation("Invalid user ID".into()))?;

    let Some(user) = repo::find_by_id(&state.db, user_id).await? else {
        return Err(ApiError::NotFound("User not found".into()));
    };

    if payload.name.is_none() && payload.email.is_none() {
        return Err(ApiError::Validation(
            "At least one field (name or email) is required".into(),
        ));
    }

    let name = payload.name.as_deref().map(str::trim);
    if name == Some("") {
        return Err(ApiError::Validation("Name cannot be empty".into()));
    }

    let email = payload
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase());
    if let Some(email) = email.as_deref() {
        if !password::is_valid_email(email) {
            return Err(ApiError::Validation("Invalid email format".into()));
        }
        if email != user.email && repo::email_taken_by_other(&state.db, email, user_id).await? {
            return Err(ApiError::Conflict("Email already exists".into()));
        }
    }

    let updated = repo::update_profile(&state.db, user_id, name, email.as_deref()).await?;
    info!(user_id, "user updated");
    Ok(Json(crate::auth::dto::UserResponse {
        user: updated.into(),
    }))
}

#[instrument(skip_all)]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id: i64 = id
        .parse()
        .map_err(|_| ApiError::Validation("Invalid user ID".into()))?;

    if user_id == admin.id {
        return Err(ApiError::Validation(
            "Cannot delete your own account".into(),
        ));
    }
    if repo::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".into()));
    }

    repo::delete_cascade(&state.db, user_id).await?;
    info!(user_id, "user deleted");
    Ok(Json(json!({ "success": true })))
}

#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<PasswordResponse>, ApiError> {
    let user_id: i64 = id
        .parse()
        .map_err(|_| ApiError::Validation("Invalid user ID".into()))?;

    if repo::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".into()));
    }

    let plaintext = password::generate_password();
    let hash = password::hash_password(&plaintext)?;
    repo::set_password_hash(&state.db, user_id, &hash).await?;

    // Every existing session dies with the old credential. The reveal flag
    // is left alone; only assignment changes touch it.
    session::revoke_all(&state.db, user_id).await?;

    info!(user_id, "password reset");
    Ok(Json(PasswordResponse {
        password: plaintext,
    }))
}
