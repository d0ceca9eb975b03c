use anyhow::Result;
use clap::Parser;
use config::Config;
use handlers::AppState;
use identity::TraceIdentityService;
use registry::FormRegistry;
use signin::{config, handlers, identity, registry, sweep};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signin=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Parse configuration from CLI args and environment variables
    let config = Config::parse();

    // Form instances hand valid credentials to the identity service
    let registry = FormRegistry::new(
        Arc::new(TraceIdentityService),
        config.get_notification_timeout(),
    );
    tracing::info!(
        "Notifications auto-dismiss after {}s",
        config.notification_timeout_secs
    );

    // Start idle sweep
    let sweep_service = Arc::new(sweep::SweepService::new(
        registry.clone(),
        sweep::SweepConfig {
            idle_timeout_secs: config.form_idle_timeout_secs,
            check_interval_secs: config.sweep_interval_secs,
        },
    ));

    tokio::spawn(async move {
        sweep_service.start().await;
    });

    tracing::info!(
        "Idle sweep started: forms expire after {}s, checked every {}s",
        config.form_idle_timeout_secs,
        config.sweep_interval_secs
    );

    let app_state = Arc::new(AppState { registry });
    let app = handlers::router(app_state);

    // Start server
    let addr = config.get_bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Sign-in service listening on http://{}/login", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
