//! mathtermind daemon
//!
//! HTTP API over the Mathtermind course catalogue, backed by PostgreSQL

use std::sync::Arc;

use color_eyre::Result;
use eyre::WrapErr;
use mathtermind_db::{Database, PgCourseRepository};
use tokio::net::TcpListener;
use tracing::info;

mod api;
mod config;
mod logging;
mod middleware;
mod router;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load()?;
    logging::init(&config.log)?;

    info!(port = config.server.port, "mathtermind daemon starting");

    let db = Database::connect(&config.database.url, config.database.max_connections)
        .await
        .wrap_err("failed to connect to database")?;
    if config.database.migrate {
        db.migrate().await.wrap_err("failed to run migrations")?;
    }

    let courses = Arc::new(PgCourseRepository::new(db.pool().clone()));
    let app = router::create_router(Arc::new(AppState::new(courses)));

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server error")?;

    db.pool().close().await;
    info!("mathtermind daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}
