//! Database-backed sessions. The opaque token is the sole bearer credential
//! and travels in an HttpOnly cookie; rows expire lazily and a periodic
//! sweep handles hygiene.

use axum_extra::extract::cookie::{Cookie, SameSite};
use sqlx::{FromRow, SqlitePool};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::users::repo::{self, User};

/// Sessions live for seven days from issue.
pub const SESSION_DURATION: Duration = Duration::days(7);

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_id";

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    pub expires_at: OffsetDateTime,
}

/// Create a session row and return its opaque token.
pub async fn issue(db: &SqlitePool, user_id: i64) -> anyhow::Result<String> {
    let token = Uuid::new_v4().to_string();
    let expires_at = OffsetDateTime::now_utc() + SESSION_DURATION;
    sqlx::query("INSERT INTO sessions (id, user_id, expires_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(user_id)
        .bind(expires_at)
        .execute(db)
        .await?;
    Ok(token)
}

/// Resolve a token to its user. Expiry is checked against the wall clock at
/// lookup time, so a stale row the sweep has not reached yet is still
/// invalid. A session whose user no longer exists is purged on sight.
pub async fn validate(db: &SqlitePool, token: &str) -> anyhow::Result<Option<User>> {
    let session = sqlx::query_as::<_, Session>(
        "SELECT id, user_id, expires_at FROM sessions WHERE id = ?",
    )
    .bind(token)
    .fetch_optional(db)
    .await?;

    let Some(session) = session else {
        return Ok(None);
    };
    if session.expires_at <= OffsetDateTime::now_utc() {
        return Ok(None);
    }

    let user = repo::find_by_id(db, session.user_id).await?;
    if user.is_none() {
        revoke(db, token).await?;
    }
    Ok(user)
}

/// Idempotent delete of a single session.
pub async fn revoke(db: &SqlitePool, token: &str) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(token)
        .execute(db)
        .await?;
    Ok(())
}

/// Drop every session owned by a user (credential reset, user deletion).
pub async fn revoke_all(db: &SqlitePool, user_id: i64) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}

/// Delete all expired rows; returns how many went away.
pub async fn sweep(db: &SqlitePool) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(OffsetDateTime::now_utc())
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Build the session cookie for a freshly issued token.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(SESSION_DURATION)
        .build()
}

/// Expired cookie that clears a stale token from the client.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod session_tests {
    use super::*;
    use crate::test_util::{insert_user, memory_pool};

    #[tokio::test]
    async fn issue_then_validate_resolves_user() {
        let pool = memory_pool().await;
        let user = insert_user(&pool, "elf@example.com", "Elf", false).await;

        let token = issue(&pool, user.id).await.expect("issue");
        let resolved = validate(&pool, &token).await.expect("validate");
        assert_eq!(resolved.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn unknown_token_is_unauthenticated() {
        let pool = memory_pool().await;
        let resolved = validate(&pool, "no-such-token").await.expect("validate");
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn expired_row_is_invalid_even_before_sweep() {
        let pool = memory_pool().await;
        let user = insert_user(&pool, "elf@example.com", "Elf", false).await;

        let expired = OffsetDateTime::now_utc() - Duration::hours(1);
        sqlx::query("INSERT INTO sessions (id, user_id, expires_at) VALUES (?, ?, ?)")
            .bind("stale-token")
            .bind(user.id)
            .bind(expired)
            .execute(&pool)
            .await
            .expect("insert stale session");

        assert!(validate(&pool, "stale-token")
            .await
            .expect("validate")
            .is_none());

        // Lazy expiry: the row is still physically present until the sweep.
        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(rows, 1);

        let deleted = sweep(&pool).await.expect("sweep");
        assert_eq!(deleted, 1);
    }

    #[tokio::test]
    async fn sweep_keeps_live_sessions() {
        let pool = memory_pool().await;
        let user = insert_user(&pool, "elf@example.com", "Elf", false).await;
        let token = issue(&pool, user.id).await.expect("issue");

        assert_eq!(sweep(&pool).await.expect("sweep"), 0);
        assert!(validate(&pool, &token).await.expect("validate").is_some());
    }

    #[tokio::test]
    async fn revoke_is_idempotent() {
        let pool = memory_pool().await;
        let user = insert_user(&pool, "elf@example.com", "Elf", false).await;
        let token = issue(&pool, user.id).await.expect("issue");

        revoke(&pool, &token).await.expect("first revoke");
        revoke(&pool, &token).await.expect("second revoke");
        assert!(validate(&pool, &token).await.expect("validate").is_none());
    }

    #[tokio::test]
    async fn revoke_all_clears_every_session_of_the_user() {
        let pool = memory_pool().await;
        let user = insert_user(&pool, "elf@example.com", "Elf", false).await;
        let other = insert_user(&pool, "rudolph@example.com", "Rudolph", false).await;

        let t1 = issue(&pool, user.id).await.expect("issue");
        let t2 = issue(&pool, user.id).await.expect("issue");
        let keep = issue(&pool, other.id).await.expect("issue");

        revoke_all(&pool, user.id).await.expect("revoke_all");

        assert!(validate(&pool, &t1).await.expect("validate").is_none());
        assert!(validate(&pool, &t2).await.expect("validate").is_none());
        assert!(validate(&pool, &keep).await.expect("validate").is_some());
    }

    #[tokio::test]
    async fn session_of_deleted_user_is_purged_on_lookup() {
        let pool = memory_pool().await;
        let user = insert_user(&pool, "elf@example.com", "Elf", false).await;
        let token = issue(&pool, user.id).await.expect("issue");

        // Remove the user out from under the session.
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user.id)
            .execute(&pool)
            .await
            .expect("delete user");

        assert!(validate(&pool, &token).await.expect("validate").is_none());
        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(rows, 0);
    }
}
