//! 用户处理器
//!
//! 每个请求依次经过 id 解析、字段校验、持久化，任何一步失败都以
//! [`AppError`](crate::core::error::AppError) 返回，由错误转换层生成响应。

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::Json,
};
use tracing::info;

use super::model::User;
use super::validator::{parse_id, validate_for_create, validate_for_update};
use crate::app::AppState;
use crate::core::error::{AppError, AppResult};
use crate::core::extract::JsonObject;

/// 路径中的用户 id
///
/// 无法解码的路径段（例如非法 UTF-8）同样按 "Invalid id" 处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub u64);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation("Invalid id".to_string()))?;
        parse_id(&raw_id).map(UserId)
    }
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    JsonObject(input): JsonObject,
) -> AppResult<(StatusCode, Json<User>)> {
    let new_user = validate_for_create(&input)?;
    let user = state.users.insert(new_user).await?;

    info!(id = user.id, "Created user");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.users.list_all().await?;
    Ok(Json(users))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> AppResult<Json<User>> {
    let user = state.users.find_by_id(id).await?;
    Ok(Json(user))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    JsonObject(input): JsonObject,
) -> AppResult<Json<User>> {
    let changes = validate_for_update(&input)?;
    let user = state.users.update(id, changes).await?;

    info!(id, "Updated user");
    Ok(Json(user))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> AppResult<StatusCode> {
    state.users.delete(id).await?;

    info!(id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}
