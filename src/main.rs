use std::time::Duration;

use santa::app::{build_app, serve};
use santa::auth::session;
use santa::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "santa=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init().await?;
    sqlx::migrate!("./migrations").run(&state.db).await?;

    // Expired-session sweep: once at startup, then hourly. Failures are
    // logged and never take the server down.
    let sweep_db = state.db.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60 * 60));
        loop {
            ticker.tick().await;
            match session::sweep(&sweep_db).await {
                Ok(0) => {}
                Ok(n) => tracing::info!(deleted = n, "cleaned up expired sessions"),
                Err(e) => tracing::error!(error = %e, "session sweep failed"),
            }
        }
    });

    let app = build_app(state);
    serve(app).await
}
