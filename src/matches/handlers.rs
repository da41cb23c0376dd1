use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use rand::seq::SliceRandom;
use tracing::{error, info, instrument};

use crate::auth::extractors::{AdminUser, CurrentUser};
use crate::email::Contact;
use crate::error::ApiError;
use crate::matches::dto::{MatchListResponse, MatchPair, MatchReveal};
use crate::matches::repo::MatchWithNames;
use crate::matches::{current_year, engine, repo};
use crate::state::AppState;
use crate::users;

pub fn match_routes() -> Router<AppState> {
    Router::new()
        .route("/match", get(my_match))
        .route("/admin/matches", get(list_matches).put(update_matches))
        .route("/admin/matches/generate", post(generate_matches))
}

#[instrument(skip_all)]
pub async fn my_match(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MatchReveal>, ApiError> {
    let year = current_year();
    let Some((recipient, first_time)) = repo::reveal_for_giver(&state.db, &user, year).await?
    else {
        return Err(ApiError::NotFound("No match assigned yet".into()));
    };
    Ok(Json(MatchReveal {
        first_time,
        recipient,
    }))
}

#[instrument(skip_all)]
pub async fn list_matches(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<MatchListResponse>, ApiError> {
    let year = current_year();
    let matches = repo::list_for_year(&state.db, year).await?;
    Ok(Json(MatchListResponse {
        year,
        matches: matches.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip_all)]
pub async fn generate_matches(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<MatchListResponse>, ApiError> {
    let year = current_year();

    let participants = users::repo::list_all(&state.db).await?;
    if participants.len() < 2 {
        return Err(ApiError::Validation(
            "Need at least 2 users to generate matches".into(),
        ));
    }

    let mut order: Vec<i64> = participants.iter().map(|u| u.id).collect();
    order.shuffle(&mut rand::thread_rng());
    let pairs = engine::circular_pairs(&order);

    repo::replace_for_year(&state.db, year, &pairs).await?;
    let created = repo::list_for_year(&state.db, year).await?;

    info!(year, count = created.len(), "matches generated");
    notify_givers(&state, created.clone());

    Ok(Json(MatchListResponse {
        year,
        matches: created.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip_all)]
pub async fn update_matches(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<MatchListResponse>, ApiError> {
    let year = current_year();

    let entries = match payload.get("matches").and_then(|m| m.as_array()) {
        Some(entries) if !entries.is_empty() => entries,
        _ => return Err(ApiError::Validation("Invalid matches data".into())),
    };

    // Structural check only: both ids must be present, nothing more. The
    // admin's list is applied verbatim, duplicates and all.
    let mut pairs = Vec::with_capacity(entries.len());
    for entry in entries {
        let Ok(pair) = serde_json::from_value::<MatchPair>(entry.clone()) else {
            return Err(ApiError::Validation("Invalid match structure".into()));
        };
        pairs.push((pair.giver_id, pair.receiver_id));
    }

    repo::replace_for_year(&state.db, year, &pairs).await?;
    let updated = repo::list_for_year(&state.db, year).await?;

    info!(year, count = updated.len(), "matches updated manually");

    // Unlike generation, a manual edit sends no notifications.
    Ok(Json(MatchListResponse {
        year,
        matches: updated.into_iter().map(Into::into).collect(),
    }))
}

/// Email every giver their recipient's name, detached from the response
/// path. The assignment is already committed; a dead mail path only logs.
fn notify_givers(state: &AppState, matches: Vec<MatchWithNames>) {
    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        for m in matches {
            let giver = Contact {
                name: m.giver_name,
                email: m.giver_email,
            };
            if let Err(e) = notifier.match_assigned(&giver, &m.receiver_name).await {
                error!(error = %e, giver_id = m.giver_id, "match notification failed");
            }
        }
    });
}
