//! 用户 CRUD API 服务入口

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use user_crud_api::{
    app::users::MySqlUserRepository,
    config::AppConfig,
    infrastructure::{database::DatabaseManager, logger::Logger},
    routes::create_router,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    Logger::init("info");

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid server configuration: {}", e);
        e
    })?;

    // 连接池在第一次访问 /api/users 时才创建，缺少 DB_* 变量时服务仍可启动
    let database = Arc::new(DatabaseManager::from_env());
    let users = Arc::new(MySqlUserRepository::new(database));
    let app = create_router(users);

    let listener = TcpListener::bind(config.listen_address()).await?;
    let addr = listener.local_addr()?;

    info!("🚀 API listening on http://{}", addr);
    info!("📖 Endpoints:");
    info!("   GET    /                 - Users form");
    info!("   GET    /health           - Health check");
    info!("   GET    /health/db        - Database check");
    info!("   GET    /api/users        - List users");
    info!("   POST   /api/users        - Create user");
    info!("   GET    /api/users/:id    - Get user by id");
    info!("   PUT    /api/users/:id    - Update user");
    info!("   DELETE /api/users/:id    - Delete user");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
