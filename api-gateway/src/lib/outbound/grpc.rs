pub mod auth;

pub use auth::GrpcAuthServiceClient;
