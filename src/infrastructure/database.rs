//! 数据库基础设施
//!
//! [`DatabaseManager`] 在启动时显式构造并注入仓储层；连接池在第一次使用时才根据
//! 配置创建，配置缺失时每次访问都会返回错误，直到配置可用为止。

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::{ConfigError, DbConfig};
use crate::core::error::AppResult;

/// 连接池上限
pub const MAX_CONNECTIONS: u32 = 10;

type ConfigSource = Box<dyn Fn() -> Result<DbConfig, ConfigError> + Send + Sync>;

pub struct DatabaseManager {
    config_source: ConfigSource,
    pool: OnceCell<MySqlPool>,
}

impl DatabaseManager {
    /// 使用自定义配置来源构造
    pub fn new<F>(config_source: F) -> Self
    where
        F: Fn() -> Result<DbConfig, ConfigError> + Send + Sync + 'static,
    {
        Self {
            config_source: Box::new(config_source),
            pool: OnceCell::new(),
        }
    }

    /// 从进程环境变量读取配置
    pub fn from_env() -> Self {
        Self::new(DbConfig::from_env)
    }

    pub fn with_config(config: DbConfig) -> Self {
        Self::new(move || Ok(config.clone()))
    }

    /// 获取连接池，首次调用时创建
    pub async fn get_pool(&self) -> Result<&MySqlPool, ConfigError> {
        self.pool
            .get_or_try_init(|| async {
                let config = (self.config_source)()?;
                info!(
                    host = %config.host,
                    port = config.port,
                    database = %config.database,
                    "Initializing MySQL connection pool"
                );

                Ok::<_, ConfigError>(
                    MySqlPoolOptions::new()
                        .max_connections(MAX_CONNECTIONS)
                        .connect_lazy_with(config.connect_options()),
                )
            })
            .await
    }

    /// 连通性检查
    pub async fn ping(&self) -> AppResult<()> {
        let pool = self.get_pool().await?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
