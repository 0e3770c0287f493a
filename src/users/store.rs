//! In-memory user store.
//!
//! Users live for the lifetime of the process. Ids come from an atomic
//! counter starting at 1 and are never reused, even after a delete.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use super::models::{NewUser, UpdateUserRequest, User};
use crate::rpc::handlers::timestamp;

/// Thread-safe, cloneable handle to the user collection.
#[derive(Clone)]
pub struct UserStore {
    users: Arc<RwLock<Vec<User>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub async fn create(&self, new_user: NewUser) -> User {
        let mut users = self.users.write().await;
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            username: new_user.username,
            email: new_user.email,
            full_name: new_user.full_name,
            created_at: timestamp(),
        };
        users.push(user.clone());
        user
    }

    /// All users in creation order.
    pub async fn list(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    pub async fn get(&self, id: u64) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|u| u.id == id).cloned()
    }

    /// Update email and full name in place. Returns `None` if no such user.
    pub async fn update(&self, id: u64, changes: UpdateUserRequest) -> Option<User> {
        let mut users = self.users.write().await;
        let user = users.iter_mut().find(|u| u.id == id)?;

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(full_name) = changes.full_name {
            user.full_name = full_name;
        }
        Some(user.clone())
    }

    /// Returns `true` if a user was removed.
    pub async fn delete(&self, id: u64) -> bool {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        users.len() != before
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            full_name: name.to_uppercase(),
        }
    }

    #[tokio::test]
    async fn test_user_store_basic_operations() {
        let store = UserStore::new();

        assert_eq!(store.count().await, 0);
        assert!(store.get(1).await.is_none());

        let created = store.create(new_user("alice")).await;
        assert_eq!(created.id, 1);
        assert!(!created.created_at.is_empty());
        assert_eq!(store.get(1).await.unwrap(), created);

        assert!(store.delete(1).await);
        assert!(!store.delete(1).await);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let store = UserStore::new();

        let a = store.create(new_user("alice")).await;
        store.delete(a.id).await;
        let b = store.create(new_user("bob")).await;

        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_update_preserves_identity() {
        let store = UserStore::new();
        store.create(new_user("alice")).await;
        let bob = store.create(new_user("bob")).await;
        store.create(new_user("carol")).await;

        let updated = store
            .update(
                bob.id,
                UpdateUserRequest {
                    email: Some("robert@example.com".into()),
                    full_name: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, bob.id);
        assert_eq!(updated.username, "bob");
        assert_eq!(updated.created_at, bob.created_at);
        assert_eq!(updated.email, "robert@example.com");
        assert_eq!(updated.full_name, "BOB");

        // Position in the listing is unchanged.
        let names: Vec<String> = store.list().await.into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);

        assert!(store.update(99, UpdateUserRequest::default()).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let store = UserStore::new();

        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.create(new_user(&format!("user{}", i))).await.id
            }));
        }

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 16);
        assert_eq!(store.count().await, 16);
    }
}
