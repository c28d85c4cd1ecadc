use cine_reservation::{create_router, db, AppConfig};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cine_reservation=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cinema reservation server");

    let config = AppConfig::from_env();

    let app_state = match db::build_state(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to create application state: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app_state
        .user_service()
        .seed_default_admin(&config.default_admin_username, &config.default_admin_password)
        .await
    {
        error!("Failed to seed default admin: {}", e);
        std::process::exit(1);
    }

    let app = create_router(app_state).layer(CorsLayer::permissive());

    let listener = match tokio::net::TcpListener::bind(&config.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind_address, e);
            std::process::exit(1);
        }
    };
    info!("Server running on http://{}", config.bind_address);
    info!("API docs at http://{}/apidocs/", config.bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}
