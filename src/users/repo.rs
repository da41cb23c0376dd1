use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// Identity record, the root entity of the data model. Sessions, wishlist
/// items and matches all reference it by id and are cleaned up by
/// [`delete_cascade`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub is_admin: bool,
    pub has_seen_reveal: bool,
    pub created_at: OffsetDateTime,
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, name, is_admin, has_seen_reveal, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Lookup by normalized (trimmed, lower-cased) email.
pub async fn find_by_email(db: &SqlitePool, email: &str) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, name, is_admin, has_seen_reveal, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Is this email already owned by a user other than `user_id`?
pub async fn email_taken_by_other(
    db: &SqlitePool,
    email: &str,
    user_id: i64,
) -> anyhow::Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? AND id != ?")
            .bind(email)
            .bind(user_id)
            .fetch_one(db)
            .await?;
    Ok(count > 0)
}

pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, name, is_admin, has_seen_reveal, created_at
        FROM users
        ORDER BY name
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(users)
}

pub async fn create(
    db: &SqlitePool,
    email: &str,
    name: &str,
    password_hash: &str,
    is_admin: bool,
) -> anyhow::Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash, name, is_admin, has_seen_reveal, created_at)
        VALUES (?, ?, ?, ?, 0, ?)
        RETURNING id, email, password_hash, name, is_admin, has_seen_reveal, created_at
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(is_admin)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await?;
    Ok(user)
}

/// Partial profile update: only the supplied fields change.
pub async fn update_profile(
    db: &SqlitePool,
    id: i64,
    name: Option<&str>,
    email: Option<&str>,
) -> anyhow::Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = COALESCE(?, name), email = COALESCE(?, email)
        WHERE id = ?
        RETURNING id, email, password_hash, name, is_admin, has_seen_reveal, created_at
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(user)
}

pub async fn set_password_hash(db: &SqlitePool, id: i64, password_hash: &str) -> anyhow::Result<()> {
    sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

/// Delete a user and everything that references them, in one transaction:
/// wishlist items, matches where they give or receive, and their sessions.
/// The store does not cascade on its own.
pub async fn delete_cascade(db: &SqlitePool, user_id: i64) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM wishlist_items WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM matches WHERE giver_id = ? OR receiver_id = ?")
        .bind(user_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
