// src/users/repository.rs
use super::entity::User;
use super::service::UserError;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn add(&self, user: User) -> Result<(), UserError>;

    /// All users in insertion order.
    async fn list(&self) -> Vec<User>;

    async fn get(&self, id: Uuid) -> Option<User>;

    async fn get_by_email(&self, email: &str) -> Option<User>;
}

/// Users keyed by email; the sequence number keeps listing stable.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, (u64, User)>,
    next_seq: AtomicU64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn add(&self, user: User) -> Result<(), UserError> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(UserError::Duplicate(user.email)),
            Entry::Vacant(slot) => {
                let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
                tracing::debug!("Stored user {} ({})", user.id, user.email);
                slot.insert((seq, user));
                Ok(())
            }
        }
    }

    async fn list(&self) -> Vec<User> {
        let mut entries: Vec<(u64, User)> = self
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, user)| user).collect()
    }

    async fn get(&self, id: Uuid) -> Option<User> {
        self.users
            .iter()
            .find(|entry| entry.value().1.id == id)
            .map(|entry| entry.value().1.clone())
    }

    async fn get_by_email(&self, email: &str) -> Option<User> {
        self.users.get(email).map(|entry| entry.value().1.clone())
    }
}
