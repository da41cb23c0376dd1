use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

use crate::products::ProductInfo;

#[derive(Debug, Clone, FromRow)]
pub struct WishlistItem {
    pub id: i64,
    pub user_id: i64,
    pub amazon_url: String,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub added_at: OffsetDateTime,
}

/// A user's items, newest first.
pub async fn list_for_user(db: &SqlitePool, user_id: i64) -> anyhow::Result<Vec<WishlistItem>> {
    let items = sqlx::query_as::<_, WishlistItem>(
        r#"
        SELECT id, user_id, amazon_url, title, image_url, price, added_at
        FROM wishlist_items
        WHERE user_id = ?
        ORDER BY added_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(items)
}

pub async fn insert(
    db: &SqlitePool,
    user_id: i64,
    url: &str,
    info: &ProductInfo,
) -> anyhow::Result<WishlistItem> {
    let item = sqlx::query_as::<_, WishlistItem>(
        r#"
        INSERT INTO wishlist_items (user_id, amazon_url, title, image_url, price, added_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, user_id, amazon_url, title, image_url, price, added_at
        "#,
    )
    .bind(user_id)
    .bind(url)
    .bind(info.title.as_deref())
    .bind(info.image_url.as_deref())
    .bind(info.price.as_deref())
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await?;
    Ok(item)
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> anyhow::Result<Option<WishlistItem>> {
    let item = sqlx::query_as::<_, WishlistItem>(
        r#"
        SELECT id, user_id, amazon_url, title, image_url, price, added_at
        FROM wishlist_items
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(item)
}

pub async fn delete(db: &SqlitePool, id: i64) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM wishlist_items WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
