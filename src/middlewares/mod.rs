pub mod auth;

pub use auth::{backend_token_middleware, BackendToken};
