//! Read-only user limit endpoints. Mutations arrive via the stream, never
//! through this surface.

use axum::{
    extract::{Extension, Path},
    Json,
};
use tracing::info;

use crate::common::ServiceError;
use crate::domains::user_limits::models::UserLimit;
use crate::server::app::AppState;

pub async fn get_all_user_limits(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<UserLimit>>, ServiceError> {
    info!("listing all user limits");
    Ok(Json(state.service.get_all_user_limits().await?))
}

pub async fn get_user_limit(
    Extension(state): Extension<AppState>,
    Path(user_limit_id): Path<String>,
) -> Result<Json<UserLimit>, ServiceError> {
    info!(user_limit_id = %user_limit_id, "fetching user limit");
    Ok(Json(state.service.get_user_limit(&user_limit_id).await?))
}

pub async fn get_user_limits_by_user_id(
    Extension(state): Extension<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserLimit>>, ServiceError> {
    info!(user_id = %user_id, "fetching user limits for user");
    Ok(Json(
        state.service.get_user_limits_by_user_id(&user_id).await?,
    ))
}
