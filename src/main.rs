mod collections;
mod config;
mod db;
mod error;
mod models;
mod routes;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: mongodb::Database,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,mflix=debug".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::connect(&config.mongodb_uri, &config.mongodb_db).await?;

    let state = Arc::new(AppState { config: config.clone(), db });

    let api = Router::new()
        .route("/api/config", get(routes::api_config))
        .route("/movies", get(routes::list_movies).post(routes::create_movie))
        .route(
            "/movies/{id}",
            get(routes::get_movie).put(routes::update_movie).delete(routes::delete_movie),
        )
        .route(
            "/comments/movie/{id}",
            get(routes::list_comments)
                .post(routes::create_comment)
                .put(routes::update_comment)
                .delete(routes::delete_comment),
        )
        .route("/{collection}", get(collections::list_documents).post(collections::create_document))
        .route(
            "/{collection}/{id}",
            get(collections::get_document)
                .put(collections::update_document)
                .delete(collections::delete_document),
        )
        .with_state(state);

    // Static files are tried first and anything the client directory cannot
    // answer falls through to the API; the wildcard collection routes would
    // otherwise shadow /styles.css and friends.
    let app = Router::new()
        .fallback_service(
            ServeDir::new(&config.public_dir)
                .call_fallback_on_method_not_allowed(true)
                .fallback(api),
        )
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
