use axum::Router;
use ridelog_rs::{config, routes, state, store};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ridelog_rs=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();

    let pool = match store::init_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Cannot open database {}: {}", config.database_url, e);
            std::process::exit(1);
        }
    };
    let state = state::AppState::new(config.clone(), pool);

    // Drop expired logins every 5 minutes
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
            sessions.evict_expired();
        }
    });

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::users::router())
        .merge(routes::sessions::router())
        .merge(routes::tracks::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(config.max_file_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("RideLog listening on {}", addr);
    tracing::info!("Register: POST http://{}/api/users", addr);
    tracing::info!("Login: POST http://{}/api/sessions", addr);
    tracing::info!("Load GPX: POST http://{}/api/tracks", addr);

    axum::serve(listener, app).await.unwrap();
}
