//! # 用户资源 CRUD API
//!
//! 单一 `users` 资源的增删改查服务：
//! - `config`: 环境变量配置
//! - `core`: 统一错误转换、请求提取器、中间件
//! - `infrastructure`: MySQL 连接池句柄、日志初始化
//! - `app`: 用户校验、持久化与 HTTP 处理器，以及浏览器表单页面
//! - `routes`: 路由表

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod routes;

pub use crate::core::error::{AppError, AppResult};
