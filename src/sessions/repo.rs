use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Session, SessionChanges, SessionFilter};

pub(crate) const SESSION_COLUMNS: &str = "id, sport, date_time, location, game_size, \
     price::float8 AS price, total_slots, booked_slots, created_at";

/// Outcome of an update guarded by the capacity invariant.
#[derive(Debug)]
pub enum UpdateOutcome {
    Updated(Session),
    NotFound,
    OverCapacity,
}

pub async fn list(db: &PgPool, filter: &SessionFilter) -> anyhow::Result<Vec<Session>> {
    let sql = format!(
        "SELECT {SESSION_COLUMNS} FROM sessions \
         WHERE ($1::text IS NULL OR lower(location) = lower($1)) \
           AND ($2::text[] IS NULL OR sport = ANY($2)) \
           AND (NOT $3 OR booked_slots < total_slots) \
         ORDER BY date_time ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, Session>(&sql)
        .bind(filter.location.as_deref())
        .bind(filter.sports.as_deref())
        .bind(filter.only_available)
        .fetch_all(db)
        .await
        .context("list sessions")?;
    Ok(rows)
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Session>> {
    let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1");
    let row = sqlx::query_as::<_, Session>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find session")?;
    Ok(row)
}

/// Inserts a session; every field of `new` except `booked_slots` must be set.
pub async fn create(db: &PgPool, new: &SessionChanges) -> anyhow::Result<Session> {
    let sql = format!(
        "INSERT INTO sessions (id, sport, date_time, location, game_size, price, \
                               total_slots, booked_slots) \
         VALUES ($1, $2, $3, $4, $5, $6::float8::numeric, $7, COALESCE($8, 0)) \
         RETURNING {SESSION_COLUMNS}"
    );
    let row = sqlx::query_as::<_, Session>(&sql)
        .bind(Uuid::new_v4())
        .bind(new.sport.map(|s| s.as_str()))
        .bind(new.date_time)
        .bind(new.location.as_deref())
        .bind(new.game_size.as_deref())
        .bind(new.price)
        .bind(new.total_slots)
        .bind(new.booked_slots)
        .fetch_one(db)
        .await
        .context("insert session")?;
    Ok(row)
}

/// Applies `changes` in one statement, refusing any result with
/// `booked_slots > total_slots` so concurrent bookings are never overwritten
/// into an invalid state.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    changes: &SessionChanges,
) -> anyhow::Result<UpdateOutcome> {
    let sql = format!(
        "UPDATE sessions SET \
             sport        = COALESCE($2, sport), \
             date_time    = COALESCE($3, date_time), \
             location     = COALESCE($4, location), \
             game_size    = COALESCE($5, game_size), \
             price        = COALESCE($6::float8::numeric, price), \
             total_slots  = COALESCE($7, total_slots), \
             booked_slots = COALESCE($8, booked_slots) \
         WHERE id = $1 \
           AND COALESCE($8, booked_slots) <= COALESCE($7, total_slots) \
         RETURNING {SESSION_COLUMNS}"
    );
    let row = sqlx::query_as::<_, Session>(&sql)
        .bind(id)
        .bind(changes.sport.map(|s| s.as_str()))
        .bind(changes.date_time)
        .bind(changes.location.as_deref())
        .bind(changes.game_size.as_deref())
        .bind(changes.price)
        .bind(changes.total_slots)
        .bind(changes.booked_slots)
        .fetch_optional(db)
        .await
        .context("update session")?;

    match row {
        Some(session) => Ok(UpdateOutcome::Updated(session)),
        None if exists(db, id).await? => Ok(UpdateOutcome::OverCapacity),
        None => Ok(UpdateOutcome::NotFound),
    }
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete session")?;
    Ok(res.rows_affected() > 0)
}

async fn exists(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let found: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM sessions WHERE id = $1)")
        .bind(id)
        .fetch_one(db)
        .await
        .context("check session exists")?;
    Ok(found)
}
