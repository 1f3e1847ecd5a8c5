mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use ohmage_provider::OhmageProvider;
use routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ohmage=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("OHMAGE_DB_PATH").unwrap_or_else(|_| "ohmage.db".into());
    let host = std::env::var("OHMAGE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("OHMAGE_PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()?;

    // Init database and the resource provider over it
    let db = Arc::new(ohmage_db::Database::open(&PathBuf::from(&db_path))?);
    let provider = Arc::new(OhmageProvider::new(db.clone()));

    let state = AppState { db, provider };

    let app = Router::new()
        .route(
            "/resource/{*path}",
            get(routes::query)
                .post(routes::insert)
                .put(routes::update)
                .delete(routes::delete),
        )
        .route("/resource-type/{*path}", get(routes::content_type))
        .route(
            "/surveys/{id}/{version}/definition",
            get(routes::survey_definition),
        )
        .route("/changes", get(routes::ws_changes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("ohmage provider listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
