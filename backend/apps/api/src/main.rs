//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level failures are handled by
//! the crates as flash messages on redirects.

mod config;

use auth::{AuthConfig, InMemoryUserRepository, PgAuthRepository, UserRepository};
use axum::Router;
use membership::{InMemoryContactRepository, OperatorMailer, PgContactRepository};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,membership=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let mailer = OperatorMailer::from_config(&config.membership)?;
    if mailer.is_smtp() {
        tracing::info!("Feedback mail goes through the SMTP relay");
    } else {
        tracing::warn!("SMTP_URL not set, feedback mail is only logged");
    }

    let app = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let users = PgAuthRepository::new(pool.clone());
            let routes = auth::auth_router(users.clone(), config.auth.clone()).merge(
                membership::membership_router(
                    users.clone(),
                    PgContactRepository::new(pool),
                    mailer,
                    config.membership.clone(),
                ),
            );
            with_sessions(routes, users, config.auth.clone())
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores; data is lost on exit");

            let users = InMemoryUserRepository::new();
            let routes = auth::auth_router_generic(users.clone(), config.auth.clone()).merge(
                membership::membership_router_generic(
                    users.clone(),
                    InMemoryContactRepository::new(),
                    mailer,
                    config.membership.clone(),
                ),
            );
            with_sessions(routes, users, config.auth.clone())
        }
    };

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Resolve sessions for every route and trace every request
fn with_sessions<R>(routes: Router, users: R, auth_config: AuthConfig) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    auth::with_session_resolution(routes, users, auth_config).layer(TraceLayer::new_for_http())
}
