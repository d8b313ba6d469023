//! 核心错误处理模块
//!
//! 所有处理器的失败都汇聚到 [`AppError`]，由 `IntoResponse` 统一转换为
//! `{ "error": <message> }` 形式的 JSON 响应。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::config::ConfigError;

/// 核心错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 缺失或非法的数据库配置
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 请求参数校验失败
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Request body too large")]
    PayloadTooLarge,

    /// 唯一约束冲突
    #[error("Duplicate value")]
    Duplicate,

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Duplicate => StatusCode::CONFLICT,
            AppError::Config(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 返回给客户端的消息，不包含内部细节
    pub fn public_message(&self) -> String {
        match self {
            AppError::Config(ConfigError::Missing { name }) => format!(
                "Server DB config missing. Set the DB_* environment variables. Missing: {}",
                name
            ),
            AppError::Config(ConfigError::Invalid { name, .. }) => format!(
                "Server DB config invalid. Check the DB_* environment variables. Invalid: {}",
                name
            ),
            AppError::Validation(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::MethodNotAllowed | AppError::PayloadTooLarge => self.to_string(),
            AppError::Duplicate => "Duplicate value".to_string(),
            AppError::Database(_) | AppError::Internal(_) => "Internal Server Error".to_string(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::Duplicate,
            _ => AppError::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), "request failed: {}", self);
        } else {
            warn!(status = status.as_u16(), "request rejected: {}", self);
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
