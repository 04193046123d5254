mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use courier_api::{AppState, AppStateInner, auth, messages, users};
use courier_api::middleware::require_auth;
use courier_auth::CredentialService;
use courier_notify::dispatcher::Dispatcher;
use courier_notify::sms::SmsGateway;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = courier_db::Database::open(&PathBuf::from(&config.db_path))?;

    // Shared state
    let dispatcher = Dispatcher::new();
    let state: AppState = Arc::new(AppStateInner {
        db,
        creds: CredentialService::new(&config.secret_key),
        dispatcher: dispatcher.clone(),
    });

    // SMS notifier: detached listener, skipped entirely when the
    // provider is not configured.
    match config.sms {
        Some(sms) => {
            tokio::spawn(courier_notify::run(dispatcher, SmsGateway::new(sms)));
        }
        None => info!("SMS provider not configured, running without notifications"),
    }

    // Routes
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{username}", get(users::get_user))
        .route("/users/{username}/from", get(users::messages_from))
        .route("/users/{username}/to", get(users::messages_to))
        .route("/messages", post(messages::send_message))
        .route("/messages/{id}", get(messages::get_message))
        .route("/messages/{id}/read", post(messages::mark_read))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Courier server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
