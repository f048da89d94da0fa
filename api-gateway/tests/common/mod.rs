use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use api_gateway::config::AuthServiceConfig;
use api_gateway::inbound::http::create_router;
use api_gateway::outbound::grpc::GrpcAuthServiceClient;
use auth::Authenticator;
use auth_service::domain::user::models::TokenPolicy;
use auth_service::domain::user::models::UserId;
use auth_service::domain::user::service::AuthService;
use auth_service::inbound::grpc::AuthGrpcService;
use auth_service::outbound::repositories::InMemoryCredentialStore;
use auth_service::proto::auth::auth_service_server::AuthServiceServer;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;
use tonic::transport::Server;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Gateway in front of a real auth service backed by the in-memory store
pub struct TestApp {
    pub address: String,
    pub store: Option<Arc<InMemoryCredentialStore>>,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemoryCredentialStore::new());
        let service = Arc::new(AuthService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::new(Authenticator::new(JWT_SECRET)),
            &TokenPolicy::default(),
        ));

        let port = reserve_port();
        let socket = SocketAddr::from(([127, 0, 0, 1], port));
        let grpc_service = AuthGrpcService::new(service);
        tokio::spawn(async move {
            Server::builder()
                .add_service(AuthServiceServer::new(grpc_service))
                .serve(socket)
                .await
                .expect("gRPC server error");
        });
        wait_for(socket).await;

        let mut app = Self::spawn_gateway(&format!("http://127.0.0.1:{}", port)).await;
        app.store = Some(store);
        app
    }

    /// Gateway whose auth service is not running
    pub async fn spawn_without_upstream() -> Self {
        let port = reserve_port();
        Self::spawn_gateway(&format!("http://127.0.0.1:{}", port)).await
    }

    async fn spawn_gateway(grpc_url: &str) -> Self {
        let config = AuthServiceConfig {
            grpc_url: grpc_url.to_string(),
            validate_timeout_ms: 5000,
            request_timeout_ms: 10000,
        };
        let auth_service =
            Arc::new(GrpcAuthServiceClient::new(&config).expect("Failed to build client"));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = format!(
            "http://{}",
            listener.local_addr().expect("Failed to read local address")
        );

        tokio::spawn(async move {
            axum::serve(listener, create_router(auth_service))
                .await
                .expect("HTTP server error");
        });

        Self {
            address,
            store: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn store(&self) -> &InMemoryCredentialStore {
        self.store.as_deref().expect("no auth service behind this gateway")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut request = self.client.get(format!("{}{}", self.address, path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        read(request.send().await.expect("Failed to execute request")).await
    }

    pub async fn post(&self, path: &str, body: Value, token: Option<&str>) -> (StatusCode, Value) {
        let mut request = self
            .client
            .post(format!("{}{}", self.address, path))
            .json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        read(request.send().await.expect("Failed to execute request")).await
    }

    pub async fn put(&self, path: &str, body: Value, token: &str) -> (StatusCode, Value) {
        let request = self
            .client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .json(&body);
        read(request.send().await.expect("Failed to execute request")).await
    }

    /// Send a raw, possibly invalid, JSON body
    pub async fn post_raw(&self, path: &str, body: &str) -> (StatusCode, Value) {
        let request = self
            .client
            .post(format!("{}{}", self.address, path))
            .header("content-type", "application/json")
            .body(body.to_string());
        read(request.send().await.expect("Failed to execute request")).await
    }

    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> (StatusCode, Value) {
        self.post(
            "/api/auth/register",
            json!({
                "email": email,
                "username": username,
                "password": password,
                "first_name": "Test",
                "last_name": "User",
            }),
            None,
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/login",
            json!({ "email": email, "password": password }),
            None,
        )
        .await
    }

    /// Register and return `(user_id, access_token)`
    pub async fn registered_user(&self, email: &str, username: &str) -> (String, String) {
        let (status, body) = self.register(email, username, "secret1").await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        (
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
            body["data"]["access_token"].as_str().unwrap().to_string(),
        )
    }

    pub fn user_id(id: &str) -> UserId {
        UserId::from_string(id).expect("valid user id")
    }
}

async fn read(response: reqwest::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = response.json().await.expect("Response body is not JSON");
    (status, body)
}

fn reserve_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port")
        .local_addr()
        .expect("Failed to read local address")
        .port()
}

async fn wait_for(socket: SocketAddr) {
    for _ in 0..100 {
        if tokio::net::TcpStream::connect(socket).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("auth service did not start at {}", socket);
}
