//! 路由表

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::app::{
    client::index,
    health::{database_check, health_check},
    users::{
        handler::{create_user, delete_user, get_user, list_users, update_user},
        UserRepository,
    },
    AppState,
};
use crate::core::{error::AppError, middleware::request_logging_middleware};

/// 使用给定的用户存储创建完整路由
pub fn create_router(users: Arc<dyn UserRepository>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index).fallback(method_not_allowed))
        .route("/health", get(health_check).fallback(method_not_allowed))
        .route("/health/db", get(database_check).fallback(method_not_allowed))
        .route(
            "/api/users",
            get(list_users).post(create_user).fallback(method_not_allowed),
        )
        .route(
            "/api/users/:id",
            get(get_user)
                .put(update_user)
                .delete(delete_user)
                .fallback(method_not_allowed),
        )
        .fallback(fallback)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(users))
}

async fn fallback() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

// 路径存在但方法不支持
async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
