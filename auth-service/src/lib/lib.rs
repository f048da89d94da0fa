pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::user;
pub use outbound::repositories;

pub mod proto {
    pub mod common {
        tonic::include_proto!("common");
    }

    pub mod auth {
        tonic::include_proto!("auth");
    }
}
