use sqlx::PgPool;
use tracing::{info, warn};

use crate::{
    auth::{password::hash_password, services::normalize_email},
    config::AdminConfig,
    error::is_unique_violation,
    users::repo_types::{NewUser, User},
};

#[derive(Debug, PartialEq, Eq)]
pub enum SuperuserOutcome {
    Created,
    AlreadyExists,
}

/// Creates the administrative account unless a user with its username exists.
pub async fn ensure_superuser(db: &PgPool, admin: &AdminConfig) -> anyhow::Result<SuperuserOutcome> {
    if User::find_by_username(db, &admin.username).await?.is_some() {
        info!(username = %admin.username, "superuser already exists");
        return Ok(SuperuserOutcome::AlreadyExists);
    }

    let hash = hash_password(&admin.password)?;
    let email = normalize_email(&admin.email);
    let new_user = NewUser {
        username: &admin.username,
        email: &email,
        password_hash: &hash,
        first_name: "",
        last_name: "",
        phone_number: "",
        date_of_birth: None,
        location: "",
        favourite_sports: &[],
        is_staff: true,
        is_superuser: true,
    };

    match User::create(db, &new_user).await {
        Ok(user) => {
            info!(user_id = %user.id, username = %user.username, "superuser created");
            Ok(SuperuserOutcome::Created)
        }
        Err(e) if is_unique_violation(&e) => {
            warn!(error = %e, username = %admin.username, "superuser insert conflicted");
            Ok(SuperuserOutcome::AlreadyExists)
        }
        Err(e) => Err(e),
    }
}
