pub mod auth;
pub mod config;
pub mod error;
pub mod types;

pub use auth::{Principal, Role};
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use types::{new_id, now_millis, parse_date};
