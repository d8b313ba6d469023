//! 用户持久化
//!
//! 所有语句都使用参数绑定，不拼接 SQL。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::model::{NewUser, User, UserChanges};
use crate::core::error::{AppError, AppResult};
use crate::infrastructure::database::DatabaseManager;

/// 用户存储接口
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// 插入新用户并返回完整记录
    async fn insert(&self, user: NewUser) -> AppResult<User>;

    /// 按 id 倒序返回全部用户
    async fn list_all(&self) -> AppResult<Vec<User>>;

    async fn find_by_id(&self, id: u64) -> AppResult<User>;

    /// 只修改提供的字段，并刷新 updated_at
    async fn update(&self, id: u64, changes: UserChanges) -> AppResult<User>;

    async fn delete(&self, id: u64) -> AppResult<()>;

    /// 存储是否可用
    async fn ping(&self) -> AppResult<()>;
}

pub(crate) fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

const INSERT_USER: &str = "INSERT INTO users (name, email, age) VALUES (?, ?, ?)";

const SELECT_ALL: &str =
    "SELECT id, name, email, age, created_at, updated_at FROM users ORDER BY id DESC";

const SELECT_BY_ID: &str =
    "SELECT id, name, email, age, created_at, updated_at FROM users WHERE id = ?";

const UPDATE_BY_ID: &str = r#"
    UPDATE users
    SET
        name = COALESCE(?, name),
        email = COALESCE(?, email),
        age = IF(?, ?, age),
        updated_at = CURRENT_TIMESTAMP
    WHERE id = ?
"#;

const DELETE_BY_ID: &str = "DELETE FROM users WHERE id = ?";

/// MySQL 实现
#[derive(Clone)]
pub struct MySqlUserRepository {
    db: Arc<DatabaseManager>,
}

impl MySqlUserRepository {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let pool = self.db.get_pool().await?;
        let result = sqlx::query(INSERT_USER)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.age)
            .execute(pool)
            .await?;

        let id = result.last_insert_id();
        debug!(id, "inserted user row");
        self.find_by_id(id).await
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        let pool = self.db.get_pool().await?;
        let users = sqlx::query_as::<_, User>(SELECT_ALL)
            .fetch_all(pool)
            .await?;
        Ok(users)
    }

    async fn find_by_id(&self, id: u64) -> AppResult<User> {
        let pool = self.db.get_pool().await?;
        sqlx::query_as::<_, User>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(user_not_found)
    }

    async fn update(&self, id: u64, changes: UserChanges) -> AppResult<User> {
        let pool = self.db.get_pool().await?;
        let (age_supplied, age) = changes.age.as_params();
        let result = sqlx::query(UPDATE_BY_ID)
            .bind(changes.name)
            .bind(changes.email)
            .bind(age_supplied)
            .bind(age)
            .bind(id)
            .execute(pool)
            .await?;

        // 同一秒内的重复更新可能不改变任何列，此时由 find_by_id 判断行是否存在
        if result.rows_affected() == 0 {
            debug!(id, "update affected no rows");
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: u64) -> AppResult<()> {
        let pool = self.db.get_pool().await?;
        let result = sqlx::query(DELETE_BY_ID).bind(id).execute(pool).await?;

        if result.rows_affected() == 0 {
            return Err(user_not_found());
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        self.db.ping().await
    }
}
