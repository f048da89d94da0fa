use std::sync::Arc;

use anyhow::Error;
use api_gateway::config::Config;
use api_gateway::inbound::http::create_router;
use api_gateway::outbound::grpc::GrpcAuthServiceClient;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "api-gateway",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        auth_service_grpc_url = %config.auth_service.grpc_url,
        validate_timeout_ms = config.auth_service.validate_timeout_ms,
        request_timeout_ms = config.auth_service.request_timeout_ms,
        "Configuration loaded"
    );

    let auth_service = Arc::new(GrpcAuthServiceClient::new(&config.auth_service)?);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Server Listening"
    );

    axum::serve(listener, create_router(auth_service)).await?;

    Ok(())
}
