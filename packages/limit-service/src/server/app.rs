//! Application setup and error mapping for the read API.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::common::{report, ServiceError};
use crate::domains::user_limits::service::UserLimitService;
use crate::server::routes::{
    get_all_user_limits, get_user_limit, get_user_limits_by_user_id, health_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub service: Arc<UserLimitService>,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/user-limit", get(get_all_user_limits))
        .route("/user-limit/:user_limit_id", get(get_user_limit))
        .route("/user-limit/user/:user_id", get(get_user_limits_by_user_id))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// Centralized error mapping: every handler failure funnels through here so
/// all errors get reported and rendered the same way.
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        report(&self);
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}
