use arena::{app, state::AppState, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("arena=debug,axum=info,tower_http=info");

    let app_state = AppState::init().await?;
    app_state.migrate().await;

    app::serve(app::build_app(app_state)).await
}
