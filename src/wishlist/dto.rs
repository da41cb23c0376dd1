use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::wishlist::repo::WishlistItem;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    #[serde(default)]
    pub amazon_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: i64,
    pub user_id: i64,
    pub amazon_url: String,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
}

impl From<WishlistItem> for ItemDto {
    fn from(item: WishlistItem) -> Self {
        Self {
            id: item.id,
            user_id: item.user_id,
            amazon_url: item.amazon_url,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
            added_at: item.added_at,
        }
    }
}

/// The assigned recipient's list, exposed only to their giver. Only the
/// display name of the recipient is included here.
#[derive(Debug, Serialize)]
pub struct RecipientWishlistResponse {
    pub recipient: RecipientName,
    pub items: Vec<ItemDto>,
}

#[derive(Debug, Serialize)]
pub struct RecipientName {
    pub name: String,
}
