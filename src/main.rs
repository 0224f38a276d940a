use std::sync::Arc;

use mongodb::{Client, bson::doc};
use scholar_stream::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    payments::{PaymentState, StripeClient},
    repository::{MongoRepository, RepositoryState},
};
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: configuration, logging, the document store, the payment
/// gateway, then the HTTP server with graceful shutdown.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load()?;

    // 2. Logging Filter Setup
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "scholar_stream=debug,tower_http=info".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            // LOCAL: pretty output for humans.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON lines for the log aggregator.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Document Store Initialization (MongoDB)
    let client = Client::with_uri_str(&config.mongo_uri).await?;
    let db = client.database(&config.db_name);
    db.run_command(doc! { "ping": 1 }).await?;
    tracing::info!(database = %config.db_name, "connected to MongoDB");

    let mongo = MongoRepository::new(&db);
    mongo.ensure_indexes().await?;
    let repo = Arc::new(mongo) as RepositoryState;

    // 5. Payment Gateway
    if config.stripe_secret_key.is_empty() {
        tracing::warn!("STRIPE_SECRET_KEY is not set; payment intents will fail");
    }
    let payments = Arc::new(StripeClient::new(&config.stripe_secret_key)) as PaymentState;

    // 6. Unified State Assembly
    let port = config.port;
    let app_state = AppState {
        repo,
        payments,
        config,
    };

    // 7. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Listening on 0.0.0.0:{port}");
    tracing::info!("API Documentation (Swagger UI) available at: http://localhost:{port}/swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
