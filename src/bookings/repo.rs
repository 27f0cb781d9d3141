use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{BookOutcome, Booking, BookingWithSession};
use crate::sessions::{repo::SESSION_COLUMNS, repo_types::Session};

const JOINED_COLUMNS: &str = "b.id AS booking_id, b.created_at AS booked_at, \
     s.id, s.sport, s.date_time, s.location, s.game_size, s.price::float8 AS price, \
     s.total_slots, s.booked_slots, s.created_at";

/// Claims one slot and records the booking in a single transaction.
pub async fn book(db: &PgPool, user_id: Uuid, session_id: Uuid) -> anyhow::Result<BookOutcome> {
    let mut tx = db.begin().await.context("begin tx")?;

    let claim = format!(
        "UPDATE sessions SET booked_slots = booked_slots + 1 \
         WHERE id = $1 AND booked_slots < total_slots \
         RETURNING {SESSION_COLUMNS}"
    );
    let claimed = sqlx::query_as::<_, Session>(&claim)
        .bind(session_id)
        .fetch_optional(&mut *tx)
        .await
        .context("claim session slot")?;

    let Some(session) = claimed else {
        let (session_exists, already_booked): (bool, bool) = sqlx::query_as(
            r#"
            SELECT EXISTS (SELECT 1 FROM sessions WHERE id = $1),
                   EXISTS (SELECT 1 FROM bookings WHERE session_id = $1 AND user_id = $2)
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .context("explain refused claim")?;
        return Ok(BookOutcome::refused(session_exists, already_booked));
    };

    let inserted = sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings (id, user_id, session_id)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, session_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(session_id)
    .fetch_one(&mut *tx)
    .await;

    let booking = match inserted {
        Ok(b) => b,
        // dropping the transaction releases the claimed slot
        Err(e) if e.as_database_error().is_some_and(|d| d.is_unique_violation()) => {
            return Ok(BookOutcome::AlreadyBooked);
        }
        Err(e) => return Err(anyhow::Error::from(e).context("insert booking")),
    };

    tx.commit().await.context("commit tx")?;
    Ok(BookOutcome::Booked(booking, session))
}

/// Deletes the caller's booking and gives its slot back.
pub async fn cancel(db: &PgPool, user_id: Uuid, booking_id: Uuid) -> anyhow::Result<bool> {
    let mut tx = db.begin().await.context("begin tx")?;

    let session_id: Option<Uuid> = sqlx::query_scalar(
        r#"DELETE FROM bookings WHERE id = $1 AND user_id = $2 RETURNING session_id"#,
    )
    .bind(booking_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await
    .context("delete booking")?;

    let Some(session_id) = session_id else {
        return Ok(false);
    };

    sqlx::query(
        r#"UPDATE sessions SET booked_slots = GREATEST(booked_slots - 1, 0) WHERE id = $1"#,
    )
    .bind(session_id)
    .execute(&mut *tx)
    .await
    .context("release session slot")?;

    tx.commit().await.context("commit tx")?;
    Ok(true)
}

pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<BookingWithSession>> {
    let sql = format!(
        "SELECT {JOINED_COLUMNS} \
         FROM bookings b JOIN sessions s ON s.id = b.session_id \
         WHERE b.user_id = $1 \
         ORDER BY s.date_time ASC, b.created_at ASC"
    );
    let rows = sqlx::query_as::<_, BookingWithSession>(&sql)
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list bookings")?;
    Ok(rows)
}

pub async fn find_for_user(
    db: &PgPool,
    user_id: Uuid,
    booking_id: Uuid,
) -> anyhow::Result<Option<BookingWithSession>> {
    let sql = format!(
        "SELECT {JOINED_COLUMNS} \
         FROM bookings b JOIN sessions s ON s.id = b.session_id \
         WHERE b.id = $1 AND b.user_id = $2"
    );
    let row = sqlx::query_as::<_, BookingWithSession>(&sql)
        .bind(booking_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("find booking")?;
    Ok(row)
}
