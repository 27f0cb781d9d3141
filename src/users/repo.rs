use anyhow::Context;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::repo_types::{NewUser, ProfileChanges, User};

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
     phone_number, date_of_birth, location, favourite_sports, is_staff, is_superuser, \
     is_active, created_at";

impl User {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
            .context("find user by id")?;
        Ok(user)
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(db)
            .await
            .context("find user by username")?;
        Ok(user)
    }

    /// Login lookup: `identifier` may be an email (case-insensitive) or a username.
    pub async fn find_by_login(db: &PgPool, identifier: &str) -> anyhow::Result<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE email = lower($1) OR username = $1 \
             ORDER BY (email = lower($1)) DESC \
             LIMIT 1"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(identifier)
            .fetch_optional(db)
            .await
            .context("find user by login")?;
        Ok(user)
    }

    pub async fn username_or_email_taken(
        db: &PgPool,
        username: &str,
        email: &str,
    ) -> anyhow::Result<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)"#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(db)
        .await
        .context("check username/email availability")?;
        Ok(taken)
    }

    pub async fn create(db: &PgPool, new: &NewUser<'_>) -> anyhow::Result<User> {
        let sql = format!(
            "INSERT INTO users (id, username, email, password_hash, first_name, last_name, \
                                phone_number, date_of_birth, location, favourite_sports, \
                                is_staff, is_superuser) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.username)
            .bind(new.email)
            .bind(new.password_hash)
            .bind(new.first_name)
            .bind(new.last_name)
            .bind(new.phone_number)
            .bind(new.date_of_birth)
            .bind(new.location)
            .bind(Json(new.favourite_sports))
            .bind(new.is_staff)
            .bind(new.is_superuser)
            .fetch_one(db)
            .await
            .context("insert user")?;
        Ok(user)
    }

    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        changes: ProfileChanges,
    ) -> anyhow::Result<Option<User>> {
        let sql = format!(
            "UPDATE users SET \
                 first_name       = COALESCE($2, first_name), \
                 last_name        = COALESCE($3, last_name), \
                 phone_number     = COALESCE($4, phone_number), \
                 date_of_birth    = CASE WHEN $8 THEN $5 ELSE date_of_birth END, \
                 location         = COALESCE($6, location), \
                 favourite_sports = COALESCE($7, favourite_sports) \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        let set_date_of_birth = changes.date_of_birth.is_some();
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.first_name)
            .bind(changes.last_name)
            .bind(changes.phone_number)
            .bind(changes.date_of_birth.flatten())
            .bind(changes.location)
            .bind(changes.favourite_sports.map(Json))
            .bind(set_date_of_birth)
            .fetch_optional(db)
            .await
            .context("update user profile")?;
        Ok(user)
    }
}
