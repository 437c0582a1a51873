//! Clinic backend
//!
//! Account registration, bearer-token login and patient records.
//!
//! ## Architecture
//!
//! - Routes: HTTP handlers and middleware
//! - Services: validation and business rules
//! - Repositories: storage traits with PostgreSQL and in-memory backends

use anyhow::Result;
use clinic_backend::{
    config::{self, StorageBackend},
    db, routes,
    state::AppState,
};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;
    let production = config::AppConfig::is_production();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if production { "production" } else { "development" },
        role = ?config.server.role,
        "Starting clinic backend"
    );

    if production {
        let problems = config.production_problems();
        if !problems.is_empty() {
            for problem in &problems {
                error!("Configuration error: {}", problem);
            }
            anyhow::bail!("Invalid production configuration");
        }
    }

    let state = match config.database.backend {
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let pool =
                db::create_pool(&config.database.url, config.database.max_connections).await?;

            // Production deploys run migrations as a separate job
            if !production {
                info!("Running database migrations...");
                db::run_migrations(&pool).await?;
            }

            AppState::new(pool, config.clone())
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; records are lost on shutdown");
            AppState::in_memory(config.clone())
        }
    };

    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// JSON logs in production, pretty logs otherwise; RUST_LOG overrides the filter
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "clinic_backend=info,tower_http=info".into()
        } else {
            "clinic_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
