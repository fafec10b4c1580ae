use std::sync::Arc;

use axum::http::HeaderValue;
use vino_core::{Clock, ProductRepository};

#[derive(Clone, Default)]
pub struct AdminAuth {
    /// Expected `X-Admin-Token` value; `None` disables the admin routes.
    pub token: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
    pub clock: Arc<dyn Clock>,
    pub admin: AdminAuth,
    /// Single origin allowed by CORS. Any origin when `None`.
    pub frontend_origin: Option<HeaderValue>,
}
