pub mod grpc;
pub mod jobs;
