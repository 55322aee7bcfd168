//! Mock backend entry point.

use mock_backend::{AppConfig, AppState, router};
use tracing::info;

#[tokio::main]
async fn main() {
    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let listen_port = config.listen_port;
    let state = AppState::seeded(config);

    info!(
        email = mock_backend::state::DEMO_EMAIL,
        project = mock_backend::state::DEMO_PROJECT_ID,
        "demo account seeded"
    );

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", listen_port))
        .await
        .unwrap();
    info!(port = listen_port, "mock backend listening");
    axum::serve(listener, app).await.unwrap();
}
