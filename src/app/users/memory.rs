//! 内存版用户存储，语义与 MySQL 实现一致，用于测试与本地演示

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::RwLock;

use super::model::{NewUser, User, UserChanges};
use super::repository::{user_not_found, UserRepository};
use crate::core::error::{AppError, AppResult};

#[derive(Default)]
struct MemoryState {
    last_id: u64,
    rows: BTreeMap<u64, User>,
}

impl MemoryState {
    // 对应 MySQL 默认排序规则下大小写不敏感的唯一索引
    fn email_taken(&self, email: &str, except: Option<u64>) -> bool {
        self.rows
            .values()
            .any(|user| Some(user.id) != except && user.email.eq_ignore_ascii_case(email))
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    state: RwLock<MemoryState>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| AppError::Internal("Failed to acquire write lock".into()))
    }

    fn read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| AppError::Internal("Failed to acquire read lock".into()))
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let mut state = self.write()?;
        if state.email_taken(&user.email, None) {
            return Err(AppError::Duplicate);
        }

        state.last_id += 1;
        let now = Utc::now();
        let row = User {
            id: state.last_id,
            name: user.name,
            email: user.email,
            age: user.age,
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        let state = self.read()?;
        Ok(state.rows.values().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: u64) -> AppResult<User> {
        let state = self.read()?;
        state.rows.get(&id).cloned().ok_or_else(user_not_found)
    }

    async fn update(&self, id: u64, changes: UserChanges) -> AppResult<User> {
        let mut state = self.write()?;
        if !state.rows.contains_key(&id) {
            return Err(user_not_found());
        }
        if let Some(email) = changes.email.as_deref() {
            if state.email_taken(email, Some(id)) {
                return Err(AppError::Duplicate);
            }
        }

        let row = state.rows.get_mut(&id).ok_or_else(user_not_found)?;
        if let Some(name) = changes.name {
            row.name = name;
        }
        if let Some(email) = changes.email {
            row.email = email;
        }
        row.age = changes.age.apply(row.age);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: u64) -> AppResult<()> {
        let mut state = self.write()?;
        state.rows.remove(&id).map(|_| ()).ok_or_else(user_not_found)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::users::model::AgeChange;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            age: None,
        }
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let repo = MemoryUserRepository::new();
        let first = repo.insert(new_user("A", "a@example.com")).await.unwrap();
        repo.delete(first.id).await.unwrap();
        let second = repo.insert(new_user("B", "b@example.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = MemoryUserRepository::new();
        for i in 0..3 {
            repo.insert(new_user("U", &format!("u{}@example.com", i)))
                .await
                .unwrap();
        }

        let ids: Vec<u64> = repo.list_all().await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_unique_email() {
        let repo = MemoryUserRepository::new();
        let a = repo.insert(new_user("A", "a@example.com")).await.unwrap();
        repo.insert(new_user("B", "b@example.com")).await.unwrap();

        assert!(matches!(
            repo.insert(new_user("C", "A@Example.com")).await,
            Err(AppError::Duplicate)
        ));

        let changes = UserChanges {
            email: Some("b@example.com".into()),
            ..Default::default()
        };
        assert!(matches!(repo.update(a.id, changes).await, Err(AppError::Duplicate)));

        // 保持自身邮箱不算冲突
        let changes = UserChanges {
            email: Some("a@example.com".into()),
            ..Default::default()
        };
        assert!(repo.update(a.id, changes).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_age_tri_state() {
        let repo = MemoryUserRepository::new();
        let user = repo.insert(new_user("A", "a@example.com")).await.unwrap();

        let set = UserChanges {
            age: AgeChange::Set(40),
            ..Default::default()
        };
        assert_eq!(repo.update(user.id, set).await.unwrap().age, Some(40));

        let keep = UserChanges {
            name: Some("Alice".into()),
            ..Default::default()
        };
        let updated = repo.update(user.id, keep).await.unwrap();
        assert_eq!(updated.age, Some(40));
        assert_eq!(updated.name, "Alice");

        let clear = UserChanges {
            age: AgeChange::Clear,
            ..Default::default()
        };
        assert_eq!(repo.update(user.id, clear).await.unwrap().age, None);
    }

    #[tokio::test]
    async fn test_missing_rows() {
        let repo = MemoryUserRepository::new();
        assert!(matches!(repo.find_by_id(9).await, Err(AppError::NotFound(_))));
        assert!(matches!(repo.delete(9).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            repo.update(9, UserChanges::default()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
