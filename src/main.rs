use campus_care_api::{config, routes, state::AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up JWT_SECRET, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Campus Care API in {:?} mode", config.environment);

    let app = routes::app(AppState::new());

    // Allow tests or deployments to override port via env
    let port = std::env::var("CAMPUS_CARE_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Campus Care API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
