//! 环境变量配置
//!
//! 服务监听配置在启动时读取；数据库配置在第一次访问存储时才解析，
//! 缺失的必填项以 [`ConfigError`] 的形式交给错误转换层。

use sqlx::mysql::MySqlConnectOptions;
use thiserror::Error;

/// 默认监听端口
pub const DEFAULT_PORT: u16 = 3001;
/// 默认 MySQL 端口
pub const DEFAULT_DB_PORT: u16 = 3306;

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {name}")]
    Missing { name: &'static str },
    #[error("invalid value for environment variable {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl ConfigError {
    /// 出错的环境变量名
    pub fn name(&self) -> &'static str {
        match self {
            ConfigError::Missing { name } | ConfigError::Invalid { name, .. } => name,
        }
    }
}

/// HTTP 服务配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 绑定地址
    pub bind_address: String,
    /// 监听端口
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            bind_address: optional(&lookup, "BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_port(&lookup, "PORT", DEFAULT_PORT)?,
        })
    }

    /// `host:port` 形式的监听地址
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// 数据库连接配置
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl DbConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// 按 DB_HOST、DB_PORT、DB_USER、DB_PASSWORD、DB_NAME 的顺序解析，
    /// 返回遇到的第一个错误
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = required(&lookup, "DB_HOST")?;
        let port = parse_port(&lookup, "DB_PORT", DEFAULT_DB_PORT)?;
        let user = required(&lookup, "DB_USER")?;
        let password = lookup("DB_PASSWORD").unwrap_or_default();
        let database = required(&lookup, "DB_NAME")?;

        Ok(Self {
            host,
            port,
            user,
            password,
            database,
        })
    }

    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

// 空字符串与未设置同等对待
fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or(ConfigError::Missing { name })
}

fn parse_port<F>(lookup: &F, name: &'static str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match optional(lookup, name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
