pub mod auth;

pub use auth::{admin_token_middleware, ADMIN_TOKEN_HEADER};
