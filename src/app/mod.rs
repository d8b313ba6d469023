//! 应用层

pub mod client;
pub mod health;
pub mod users;

use std::sync::Arc;

use users::UserRepository;

/// 处理器共享状态
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}
