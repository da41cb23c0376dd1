use serde::{Deserialize, Serialize};

use crate::auth::dto::PublicUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    /// Explicit password; a passphrase is generated when omitted.
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<PublicUser>,
}

/// Creation response: the plaintext password appears here exactly once and
/// is never persisted or retrievable again.
#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub user: PublicUser,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct PasswordResponse {
    pub password: String,
}
