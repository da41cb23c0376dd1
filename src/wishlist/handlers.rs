use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tracing::{error, info, instrument, warn};

use crate::auth::extractors::CurrentUser;
use crate::email::{Contact, Notifier};
use crate::error::ApiError;
use crate::matches::{self, current_year};
use crate::products::{self, ProductInfo};
use crate::state::AppState;
use crate::users;
use crate::users::repo::User;
use crate::wishlist::dto::{AddItemRequest, ItemDto, RecipientName, RecipientWishlistResponse};
use crate::wishlist::repo;

/// Upper bound on a product-page fetch; expiry means null enrichment, not a
/// failed add.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/wishlist", get(list_own).post(add_item))
        .route("/wishlist/recipient", get(recipient_wishlist))
        .route("/wishlist/:id", delete(remove_item))
}

#[instrument(skip_all)]
pub async fn list_own(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ItemDto>>, ApiError> {
    let items = repo::list_for_user(&state.db, user.id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[instrument(skip_all)]
pub async fn add_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<ItemDto>), ApiError> {
    if payload.amazon_url.trim().is_empty() {
        return Err(ApiError::Validation("Amazon URL required".into()));
    }
    let url = products::validate_wishlist_url(&payload.amazon_url)?;
    let year = current_year();

    // Enrichment is best-effort: a slow or failing product page means null
    // fields, never a failed add.
    let info = match tokio::time::timeout(FETCH_TIMEOUT, state.fetcher.fetch(&url)).await {
        Ok(Ok(info)) => info,
        Ok(Err(e)) => {
            warn!(error = %e, "product enrichment failed");
            ProductInfo::default()
        }
        Err(_) => {
            warn!("product enrichment timed out");
            ProductInfo::default()
        }
    };

    let item = repo::insert(&state.db, user.id, url.as_str(), &info).await?;
    info!(item_id = item.id, user_id = user.id, "wishlist item added");

    // The adder's santa hears about the new item after the response.
    let db = state.db.clone();
    let notifier = state.notifier.clone();
    let title = item.title.clone();
    tokio::spawn(async move {
        if let Err(e) = notify_santa(db, notifier, user, title, year).await {
            error!(error = %e, "wishlist notification failed");
        }
    });

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// Resolve who gives to `giftee` this year and tell them about the new
/// item. Quietly done if no assignment exists.
async fn notify_santa(
    db: SqlitePool,
    notifier: Arc<dyn Notifier>,
    giftee: User,
    item_title: Option<String>,
    year: i64,
) -> anyhow::Result<()> {
    let Some(m) = matches::repo::find_by_receiver(&db, giftee.id, year).await? else {
        return Ok(());
    };
    let Some(santa) = users::repo::find_by_id(&db, m.giver_id).await? else {
        return Ok(());
    };
    let contact = Contact {
        name: santa.name,
        email: santa.email,
    };
    let title = item_title.as_deref().unwrap_or("New Item");
    notifier.wishlist_updated(&contact, &giftee.name, title).await
}

#[instrument(skip_all)]
pub async fn recipient_wishlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<RecipientWishlistResponse>, ApiError> {
    let year = current_year();
    let Some(m) = matches::repo::find_by_giver(&state.db, user.id, year).await? else {
        return Err(ApiError::NotFound("No match assigned yet".into()));
    };
    let Some(recipient) = users::repo::find_by_id(&state.db, m.receiver_id).await? else {
        return Err(ApiError::Internal(anyhow::anyhow!(
            "match {} references missing recipient {}",
            m.id,
            m.receiver_id
        )));
    };

    let items = repo::list_for_user(&state.db, m.receiver_id).await?;
    Ok(Json(RecipientWishlistResponse {
        recipient: RecipientName {
            name: recipient.name,
        },
        items: items.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip_all)]
pub async fn remove_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let item_id: i64 = id
        .parse()
        .map_err(|_| ApiError::Validation("Invalid item ID".into()))?;

    let Some(item) = repo::find_by_id(&state.db, item_id).await? else {
        return Err(ApiError::NotFound("Item not found".into()));
    };
    if item.user_id != user.id {
        return Err(ApiError::Authorization(
            "Cannot delete another user's item".into(),
        ));
    }

    repo::delete(&state.db, item_id).await?;
    info!(item_id, user_id = user.id, "wishlist item removed");
    Ok(Json(json!({ "success": true })))
}
