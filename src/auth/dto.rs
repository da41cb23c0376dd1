use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::users::repo::User;

/// Request body for login. Fields default to empty so a missing field is
/// reported as a 400, not a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public part of a user returned to the client. The credential hash never
/// leaves the repo layer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub has_seen_reveal: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            is_admin: u.is_admin,
            has_seen_reveal: u.has_seen_reveal,
            created_at: u.created_at,
        }
    }
}

/// Envelope used by login, `/auth/me` and the admin user endpoints.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: PublicUser,
}
