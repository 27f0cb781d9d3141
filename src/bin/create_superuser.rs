use arena::{
    bootstrap::{ensure_superuser, SuperuserOutcome},
    config::AdminConfig,
    state::AppState,
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("arena=info,sqlx=warn");

    let state = AppState::init().await?;
    state.migrate().await;

    let admin = AdminConfig::from_env();
    match ensure_superuser(&state.db, &admin).await? {
        SuperuserOutcome::Created => tracing::info!("done: superuser created"),
        SuperuserOutcome::AlreadyExists => tracing::info!("done: nothing to do"),
    }
    Ok(())
}
