//! Shared fixtures for the repository tests.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::users::repo::{self, User};

/// Fresh in-memory database with the schema applied. A single connection
/// keeps every query in the same memory store.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

/// Insert a user with a placeholder hash. Tests that exercise login go
/// through the admin endpoint instead, so real argon2 work stays out of
/// the repository tests.
pub async fn insert_user(pool: &SqlitePool, email: &str, name: &str, is_admin: bool) -> User {
    repo::create(pool, email, name, "unverifiable-test-hash", is_admin)
        .await
        .expect("insert user")
}
