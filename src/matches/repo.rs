use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::users::repo::User;

#[derive(Debug, Clone, FromRow)]
pub struct Match {
    pub id: i64,
    pub giver_id: i64,
    pub receiver_id: i64,
    pub year: i64,
}

/// Public identity of a match participant as exposed over the API.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Participant {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Match row joined with both participants' public identity.
#[derive(Debug, Clone, FromRow)]
pub struct MatchWithNames {
    pub id: i64,
    pub giver_id: i64,
    pub receiver_id: i64,
    pub year: i64,
    pub giver_name: String,
    pub giver_email: String,
    pub receiver_name: String,
    pub receiver_email: String,
}

/// All matches for a year with participant identity, ordered by giver name.
pub async fn list_for_year(db: &SqlitePool, year: i64) -> anyhow::Result<Vec<MatchWithNames>> {
    let rows = sqlx::query_as::<_, MatchWithNames>(
        r#"
        SELECT
            m.id,
            m.giver_id,
            m.receiver_id,
            m.year,
            g.name AS giver_name,
            g.email AS giver_email,
            r.name AS receiver_name,
            r.email AS receiver_email
        FROM matches m
        JOIN users g ON m.giver_id = g.id
        JOIN users r ON m.receiver_id = r.id
        WHERE m.year = ?
        ORDER BY g.name
        "#,
    )
    .bind(year)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_giver(
    db: &SqlitePool,
    giver_id: i64,
    year: i64,
) -> anyhow::Result<Option<Match>> {
    let row = sqlx::query_as::<_, Match>(
        "SELECT id, giver_id, receiver_id, year FROM matches WHERE giver_id = ? AND year = ?",
    )
    .bind(giver_id)
    .bind(year)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// The match in which `receiver_id` is the giftee, i.e. who their santa is.
pub async fn find_by_receiver(
    db: &SqlitePool,
    receiver_id: i64,
    year: i64,
) -> anyhow::Result<Option<Match>> {
    let row = sqlx::query_as::<_, Match>(
        "SELECT id, giver_id, receiver_id, year FROM matches WHERE receiver_id = ? AND year = ?",
    )
    .bind(receiver_id)
    .bind(year)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Atomically replace the year's assignment set: delete the old rows, reset
/// every user's reveal flag, insert the new pairs. All or nothing; readers
/// never observe an empty year or a mix of old and new rows.
pub async fn replace_for_year(
    db: &SqlitePool,
    year: i64,
    pairs: &[(i64, i64)],
) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM matches WHERE year = ?")
        .bind(year)
        .execute(&mut *tx)
        .await?;
    // A new set means everyone gets the reveal again, even users whose own
    // target happens to repeat.
    sqlx::query("UPDATE users SET has_seen_reveal = 0")
        .execute(&mut *tx)
        .await?;
    for &(giver_id, receiver_id) in pairs {
        sqlx::query("INSERT INTO matches (giver_id, receiver_id, year) VALUES (?, ?, ?)")
            .bind(giver_id)
            .bind(receiver_id)
            .bind(year)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Look up the caller's assignment and mark the reveal as seen, as one
/// atomic read-then-conditionally-write step. The first successful fetch
/// counts as having seen the reveal whether or not the client renders it;
/// `None` means no assignment exists yet for the year.
pub async fn reveal_for_giver(
    db: &SqlitePool,
    user: &User,
    year: i64,
) -> anyhow::Result<Option<(Participant, bool)>> {
    let mut tx = db.begin().await?;

    let row = sqlx::query_as::<_, Match>(
        "SELECT id, giver_id, receiver_id, year FROM matches WHERE giver_id = ? AND year = ?",
    )
    .bind(user.id)
    .bind(year)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(m) = row else {
        return Ok(None);
    };

    let recipient =
        sqlx::query_as::<_, Participant>("SELECT id, name, email FROM users WHERE id = ?")
            .bind(m.receiver_id)
            .fetch_one(&mut *tx)
            .await?;

    let first_time = !user.has_seen_reveal;
    if first_time {
        sqlx::query("UPDATE users SET has_seen_reveal = 1 WHERE id = ?")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(Some((recipient, first_time)))
}
