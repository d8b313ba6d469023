//! 用户数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `users` 表中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 通过创建校验的字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
}

/// 更新时对 age 的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgeChange {
    /// 请求中未出现，保持原值
    #[default]
    Keep,
    /// 显式传入 null
    Clear,
    Set(u32),
}

impl AgeChange {
    pub fn is_keep(&self) -> bool {
        matches!(self, AgeChange::Keep)
    }

    /// 拆成 (是否修改, 新值)，用于参数化 SQL
    pub fn as_params(&self) -> (bool, Option<u32>) {
        match *self {
            AgeChange::Keep => (false, None),
            AgeChange::Clear => (true, None),
            AgeChange::Set(age) => (true, Some(age)),
        }
    }

    pub fn apply(&self, current: Option<u32>) -> Option<u32> {
        match *self {
            AgeChange::Keep => current,
            AgeChange::Clear => None,
            AgeChange::Set(age) => Some(age),
        }
    }
}

/// 部分更新：`None` 表示字段不变
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: AgeChange,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_keep()
    }
}
