use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth_service::config::Config;
use auth_service::domain::user::service::AuthService;
use auth_service::inbound::grpc::AuthGrpcService;
use auth_service::inbound::jobs;
use auth_service::outbound::repositories::PostgresRefreshTokenRepository;
use auth_service::outbound::repositories::PostgresUserRepository;
use auth_service::proto::auth::auth_service_server::AuthServiceServer;
use sqlx::postgres::PgPoolOptions;
use tonic::transport::Server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        grpc_port = config.server.grpc_port,
        access_token_hours = config.jwt.expiration_hours,
        refresh_token_days = config.refresh_token.expiration_days,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes()));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let refresh_token_repository = Arc::new(PostgresRefreshTokenRepository::new(pg_pool));

    let auth_service = Arc::new(AuthService::new(
        user_repository,
        refresh_token_repository,
        authenticator,
        &config.token_policy(),
    ));

    let purge_interval = Duration::from_secs(config.refresh_token.purge_interval_secs);
    tokio::spawn(jobs::purge_expired_refresh_tokens(
        Arc::clone(&auth_service),
        purge_interval,
    ));
    tracing::info!(
        interval_secs = purge_interval.as_secs(),
        "Refresh token purge scheduled"
    );

    let grpc_address = format!("0.0.0.0:{}", config.server.grpc_port).parse()?;
    let grpc_service = AuthGrpcService::new(auth_service);
    tracing::info!(
        address = %grpc_address,
        port = config.server.grpc_port,
        protocol = "grpc",
        "gRpc server listening"
    );

    Server::builder()
        .add_service(AuthServiceServer::new(grpc_service))
        .serve(grpc_address)
        .await?;

    tracing::info!("Server exited");

    Ok(())
}
